use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{trace, warn};

use super::DocumentRegistry;
use crate::errors::{CiteGraphError, Result};
use crate::types::{Paper, Reference};

/// Deserializes `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The part of a parsed full-text document this crate reads.
///
/// Unknown fields are ignored and every known field may be missing or
/// `null`, since the field set drifts between dataset releases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedDocument {
    #[serde(default)]
    pub paper_id: Option<String>,
    /// Bibliography keyed by internal citation key (`BIBREF0`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub bib_entries: BTreeMap<String, BibEntry>,
}

/// One bibliography entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BibEntry {
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// External identifiers keyed by scheme (`DOI`, `PMID`, `PMCID`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub other_ids: BTreeMap<String, IdValue>,
}

/// Value of one `other_ids` scheme.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Many(Vec<String>),
    One(String),
    /// Anything else (numbers, nulls, nested lists); carries no identifier.
    Other(serde_json::Value),
}

impl IdValue {
    fn values(&self) -> Vec<&str> {
        match self {
            IdValue::Many(list) => list.iter().map(String::as_str).collect(),
            IdValue::One(s) => vec![s.as_str()],
            IdValue::Other(_) => Vec::new(),
        }
    }
}

impl BibEntry {
    /// Non-empty external identifiers in scheme order.
    pub fn identifiers(&self) -> Vec<String> {
        self.other_ids
            .values()
            .flat_map(IdValue::values)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Converts the entry into a reference from `source_id`.
    ///
    /// Returns `None` when the entry has neither an identifier nor a title.
    pub fn into_reference(self, source_id: &str) -> Option<Reference> {
        let identifiers = self.identifiers();
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if identifiers.is_empty() && title.is_none() {
            return None;
        }
        Some(Reference {
            source_id: source_id.to_string(),
            identifiers,
            title,
        })
    }
}

impl ParsedDocument {
    /// Parses a document from JSON text.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

/// Lazy sequence of the references found in one document.
///
/// Consumed once; asking the parser again re-reads the file.
pub struct References {
    source_id: String,
    entries: btree_map::IntoValues<String, BibEntry>,
}

impl References {
    fn new(source_id: &str, entries: BTreeMap<String, BibEntry>) -> Self {
        Self {
            source_id: source_id.to_string(),
            entries: entries.into_values(),
        }
    }

    /// A sequence that yields nothing.
    pub fn empty(source_id: &str) -> Self {
        Self::new(source_id, BTreeMap::new())
    }

    /// The paper these references were cited by.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

impl Iterator for References {
    type Item = Reference;

    fn next(&mut self) -> Option<Reference> {
        loop {
            let entry = self.entries.next()?;
            if let Some(reference) = entry.into_reference(&self.source_id) {
                return Some(reference);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.entries.size_hint().1)
    }
}

/// Outcome of looking up one paper's document.
pub enum DocumentLookup {
    /// No document file exists for the paper.
    Missing,
    /// The document was read and parsed.
    Parsed { path: PathBuf, references: References },
    /// The document exists but could not be read or parsed.
    Failed(CiteGraphError),
}

/// Locates and parses per-paper documents under a document root.
pub struct DocumentParser {
    root: PathBuf,
    registry: DocumentRegistry,
}

impl DocumentParser {
    /// Creates a parser over `root` with the built-in layouts.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_registry(root, DocumentRegistry::new())
    }

    pub fn with_registry(root: impl Into<PathBuf>, registry: DocumentRegistry) -> Self {
        Self {
            root: root.into(),
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the document file for `paper`.
    ///
    /// Paths listed on the metadata row are tried first, then each layout
    /// under the primary id followed by every alias.
    pub fn locate(&self, paper: &Paper) -> Option<PathBuf> {
        for listed in &paper.document_paths {
            let path = self.root.join(listed);
            if path.is_file() {
                return Some(path);
            }
            trace!(id = %paper.id, path = %path.display(), "listed document not found");
        }

        let identifiers: Vec<&str> = paper.identifiers().collect();
        self.registry
            .find(&self.root, &identifiers)
            .map(|(path, layout)| {
                trace!(id = %paper.id, layout = layout.name(), path = %path.display(), "document located");
                path
            })
    }

    /// Reads and parses the document at `path`.
    pub fn parse_file(path: &Path) -> Result<ParsedDocument> {
        let source = fs::read_to_string(path).map_err(|e| CiteGraphError::DocumentParse {
            message: format!("failed to read document: {}", e),
            path: path.display().to_string(),
        })?;
        ParsedDocument::from_json(&source).map_err(|e| CiteGraphError::DocumentParse {
            message: format!("malformed document JSON: {}", e),
            path: path.display().to_string(),
        })
    }

    /// Looks up and parses the document of `paper`.
    pub fn lookup(&self, paper: &Paper) -> DocumentLookup {
        let Some(path) = self.locate(paper) else {
            trace!(id = %paper.id, "no document for paper");
            return DocumentLookup::Missing;
        };
        match Self::parse_file(&path) {
            Ok(doc) => DocumentLookup::Parsed {
                references: References::new(&paper.id, doc.bib_entries),
                path,
            },
            Err(e) => DocumentLookup::Failed(e),
        }
    }

    /// The references cited by `paper`.
    ///
    /// A paper without a document yields an empty sequence. A document that
    /// cannot be parsed is a `DocumentParse` error.
    pub fn references(&self, paper: &Paper) -> Result<References> {
        match self.lookup(paper) {
            DocumentLookup::Missing => Ok(References::empty(&paper.id)),
            DocumentLookup::Parsed { references, .. } => Ok(references),
            DocumentLookup::Failed(e) => Err(e),
        }
    }

    /// Like [`references`](Self::references), but a broken document is
    /// logged and treated as having no references.
    pub fn references_or_empty(&self, paper: &Paper) -> References {
        self.references(paper).unwrap_or_else(|e| {
            warn!(id = %paper.id, error = %e, "skipping unparseable document");
            References::empty(&paper.id)
        })
    }
}
