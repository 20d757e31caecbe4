use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CiteGraphError, Result};
use crate::types::{NodeInclusion, OutputFormat, ResolutionPolicy};

/// Default name of the configuration file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "citegraph.json";

/// Default graph output path. Never the same file as [`CONFIG_FILENAME`].
pub const DEFAULT_OUTPUT_PATH: &str = "citation-graph.json";

/// Default root of the dataset release.
pub const DEFAULT_DATA_ROOT: &str = "cord-19";

/// Column layout and row filters for the metadata table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataOptions {
    /// Column holding the primary identifier.
    pub id_column: String,
    /// Column holding the paper title.
    pub title_column: String,
    /// Optional columns holding secondary identifiers. Cells may list
    /// several values separated by `;`.
    pub alias_columns: Vec<String>,
    /// Optional columns listing document paths, in preference order.
    pub document_columns: Vec<String>,
    /// Rows whose trimmed title is shorter than this are skipped.
    pub min_title_length: usize,
    /// When set, rows whose `publish_time` does not sort after this
    /// ISO-8601 date are skipped.
    pub published_after: Option<String>,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            id_column: "cord_uid".to_string(),
            title_column: "title".to_string(),
            alias_columns: vec![
                "doi".to_string(),
                "pmcid".to_string(),
                "pubmed_id".to_string(),
                "sha".to_string(),
            ],
            document_columns: vec!["pmc_json_files".to_string(), "pdf_json_files".to_string()],
            min_title_length: 0,
            published_after: None,
        }
    }
}

/// Configuration for one citation-graph build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CiteGraphConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Path of the comma-separated metadata table.
    pub metadata_path: PathBuf,
    /// Root directory holding the `pmc_json` and `pdf_json` subdirectories.
    pub document_root: PathBuf,
    /// Path of the graph file to write.
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub resolution_policy: ResolutionPolicy,
    pub node_inclusion: NodeInclusion,
    /// Keep only the largest weakly connected component.
    pub largest_component: bool,
    pub metadata: MetadataOptions,
}

impl Default for CiteGraphConfig {
    fn default() -> Self {
        let root = PathBuf::from(DEFAULT_DATA_ROOT);
        Self {
            version: 1,
            metadata_path: root.join("metadata.csv"),
            document_root: root,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            output_format: OutputFormat::Json,
            resolution_policy: ResolutionPolicy::IdentifierThenTitle,
            node_inclusion: NodeInclusion::Connected,
            largest_component: false,
            metadata: MetadataOptions::default(),
        }
    }
}

impl CiteGraphConfig {
    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.metadata_path.as_os_str().is_empty() {
            return Err(config_error("metadata path must not be empty"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(config_error("output path must not be empty"));
        }
        if self.metadata.id_column.trim().is_empty() {
            return Err(config_error("id column name must not be empty"));
        }
        if self.metadata.title_column.trim().is_empty() {
            return Err(config_error("title column name must not be empty"));
        }
        if self.metadata.id_column == self.metadata.title_column {
            return Err(config_error(&format!(
                "id and title columns must differ (both are '{}')",
                self.metadata.id_column
            )));
        }
        if let Some(date) = &self.metadata.published_after {
            if date.trim().is_empty() {
                return Err(config_error("published_after must not be blank when set"));
            }
        }
        Ok(())
    }
}

fn config_error(message: &str) -> CiteGraphError {
    CiteGraphError::Config {
        message: message.to_string(),
    }
}

/// Loads the configuration from disk.
///
/// Missing fields fall back to their defaults.
pub fn load_config(path: &Path) -> Result<CiteGraphConfig> {
    let contents = fs::read_to_string(path).map_err(|e| CiteGraphError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    let config: CiteGraphConfig =
        serde_json::from_str(&contents).map_err(|e| CiteGraphError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?;

    Ok(config)
}

/// Loads `path` if given, otherwise `citegraph.json` in `dir` when present,
/// otherwise the defaults.
pub fn load_config_or_default(path: Option<&Path>, dir: &Path) -> Result<CiteGraphConfig> {
    match path {
        Some(p) => load_config(p),
        None => {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.exists() {
                load_config(&candidate)
            } else {
                Ok(CiteGraphConfig::default())
            }
        }
    }
}

/// Saves the configuration to disk using an atomic write.
pub fn save_config(path: &Path, config: &CiteGraphConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CiteGraphError::Config {
            message: format!("failed to create directory '{}': {}", parent.display(), e),
        })?;
    }

    let tmp_path = path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| CiteGraphError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| CiteGraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, path).map_err(|e| CiteGraphError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            path.display(),
            e
        ),
    })?;

    Ok(())
}
