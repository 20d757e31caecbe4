use thiserror::Error;

/// Errors that can occur while building a citation graph.
#[derive(Error, Debug)]
pub enum CiteGraphError {
    #[error("data load error: {message} (path: {path})")]
    DataLoad { message: String, path: String },

    #[error("document parse error: {message} (path: {path})")]
    DocumentParse { message: String, path: String },

    #[error("write error: {message} (path: {path})")]
    Write { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("graph format error: {message}")]
    GraphFormat { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl CiteGraphError {
    /// Returns `true` for errors that must abort the run.
    ///
    /// A broken document only costs the references of one paper, so the
    /// pipeline downgrades it instead of stopping.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CiteGraphError::DocumentParse { .. })
    }
}

/// Convenience alias for results using `CiteGraphError`.
pub type Result<T> = std::result::Result<T, CiteGraphError>;
