use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single publication record from the metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// Primary identifier (e.g. `cord_uid`).
    pub id: String,
    pub title: String,
    /// Secondary identifiers taken from the alias columns, as they appear in
    /// the table (not canonicalized).
    pub aliases: BTreeSet<String>,
    pub doi: Option<String>,
    pub publish_time: Option<String>,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub url: Option<String>,
    /// Document paths listed on the metadata row, relative to the document
    /// root, in preference order.
    pub document_paths: Vec<String>,
}

impl Paper {
    /// Creates a paper with only an identifier and a title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            aliases: BTreeSet::new(),
            doi: None,
            publish_time: None,
            authors: None,
            journal: None,
            url: None,
            document_paths: Vec::new(),
        }
    }

    /// The primary identifier followed by every alias.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// A raw citation mention extracted from one paper's bibliography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub source_id: String,
    /// External identifiers carried by the bibliography entry.
    pub identifiers: Vec<String>,
    pub title: Option<String>,
}

/// How a reference was matched to a known paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    Identifier,
    Title,
}

impl ResolvedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedBy::Identifier => "identifier",
            ResolvedBy::Title => "title",
        }
    }
}

/// A reference that has been resolved to a known target paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRef {
    pub source_id: String,
    pub target_id: String,
    pub resolved_by: ResolvedBy,
}

/// A directed "cites" relationship between two known papers.
///
/// Ordering is `(source, target)`, which is also the output order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A paper as it appears in the output graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Paper> for GraphNode {
    fn from(paper: &Paper) -> Self {
        Self {
            id: paper.id.clone(),
            label: paper.title.clone(),
            title: paper.title.clone(),
            doi: paper.doi.clone(),
            publish_time: paper.publish_time.clone(),
            authors: paper.authors.clone(),
            journal: paper.journal.clone(),
            url: paper.url.clone(),
        }
    }
}

/// The assembled citation graph.
///
/// Nodes are sorted by id and edges by `(source, target)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

/// Summary statistics about a citation graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Nodes with neither incoming nor outgoing edges.
    pub isolated_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
}

/// Order in which the resolver tries its matching strategies.
///
/// Serialized with the same names the command line accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPolicy {
    #[default]
    #[serde(rename = "id-then-title")]
    IdentifierThenTitle,
    #[serde(rename = "id-only")]
    IdentifierOnly,
    #[serde(rename = "title-only")]
    TitleOnly,
    #[serde(rename = "title-then-id")]
    TitleThenIdentifier,
}

#[allow(clippy::should_implement_trait)]
impl ResolutionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPolicy::IdentifierThenTitle => "id-then-title",
            ResolutionPolicy::IdentifierOnly => "id-only",
            ResolutionPolicy::TitleOnly => "title-only",
            ResolutionPolicy::TitleThenIdentifier => "title-then-id",
        }
    }

    /// Parses a policy name, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<ResolutionPolicy> {
        match s {
            "id-then-title" => Some(ResolutionPolicy::IdentifierThenTitle),
            "id-only" => Some(ResolutionPolicy::IdentifierOnly),
            "title-only" => Some(ResolutionPolicy::TitleOnly),
            "title-then-id" => Some(ResolutionPolicy::TitleThenIdentifier),
            _ => None,
        }
    }

    /// The matching strategies in the order they are tried.
    pub fn steps(&self) -> &'static [ResolvedBy] {
        match self {
            ResolutionPolicy::IdentifierThenTitle => &[ResolvedBy::Identifier, ResolvedBy::Title],
            ResolutionPolicy::IdentifierOnly => &[ResolvedBy::Identifier],
            ResolutionPolicy::TitleOnly => &[ResolvedBy::Title],
            ResolutionPolicy::TitleThenIdentifier => &[ResolvedBy::Title, ResolvedBy::Identifier],
        }
    }
}

/// Which papers become nodes of the output graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeInclusion {
    /// Only papers that take part in at least one edge.
    #[default]
    Connected,
    /// Every paper in the metadata index.
    All,
}

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Node-link JSON: `{"nodes": [...], "edges": [...]}`.
    #[default]
    #[serde(rename = "json")]
    Json,
    /// GEXF 1.2, as read by Gephi.
    #[serde(rename = "gexf")]
    Gexf,
}

#[allow(clippy::should_implement_trait)]
impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Gexf => "gexf",
        }
    }

    /// Parses a format name, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "gexf" => Some(OutputFormat::Gexf),
            _ => None,
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path(path: &std::path::Path) -> Option<OutputFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(OutputFormat::from_str)
    }
}

/// Counters collected over one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub paper_count: usize,
    pub documents_found: usize,
    pub documents_failed: usize,
    pub reference_count: usize,
    pub resolved_by_identifier: usize,
    pub resolved_by_title: usize,
    pub unresolved_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub duration_ms: u64,
}

impl BuildReport {
    /// Pretty-printed JSON form of the report, as printed by `--json`.
    pub fn to_json(&self) -> crate::errors::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
