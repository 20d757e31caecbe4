//! Parsed full-text document access.
//!
//! The dataset ships full text in two JSON layouts, one derived from PMC XML
//! and one from PDF extraction. Each layout knows where its files live; the
//! parser turns whichever file is found into a stream of references.

mod parser;
mod pdf_json;
mod pmc_json;

pub use parser::{BibEntry, DocumentLookup, DocumentParser, IdValue, ParsedDocument, References};
pub use pdf_json::PdfJsonLayout;
pub use pmc_json::PmcJsonLayout;

use std::path::{Path, PathBuf};

/// One on-disk layout of parsed documents.
pub trait DocumentLayout: Send + Sync {
    /// Human-readable layout name, used in logs.
    fn name(&self) -> &str;

    /// Subdirectory of the document root holding this layout's files.
    fn subdirectory(&self) -> &str;

    /// File name suffix appended to the identifier, including the leading dot.
    fn extension(&self) -> &str;

    /// Path the document for `identifier` would have under `root`.
    fn candidate_path(&self, root: &Path, identifier: &str) -> PathBuf {
        root.join(self.subdirectory())
            .join(format!("{}{}", identifier, self.extension()))
    }
}

/// Ordered set of document layouts.
///
/// Earlier layouts win when a paper has documents in several of them.
pub struct DocumentRegistry {
    layouts: Vec<Box<dyn DocumentLayout>>,
}

impl DocumentRegistry {
    /// Creates a registry with the built-in layouts, PMC first.
    pub fn new() -> Self {
        Self {
            layouts: vec![Box::new(PmcJsonLayout), Box::new(PdfJsonLayout)],
        }
    }

    /// Creates a registry with a custom layout order.
    pub fn with_layouts(layouts: Vec<Box<dyn DocumentLayout>>) -> Self {
        Self { layouts }
    }

    /// Finds the first existing document for any of `identifiers`.
    ///
    /// Layouts are tried in priority order, and within a layout the
    /// identifiers are tried in the order given.
    pub fn find(&self, root: &Path, identifiers: &[&str]) -> Option<(PathBuf, &dyn DocumentLayout)> {
        for layout in &self.layouts {
            for identifier in identifiers.iter().copied() {
                if identifier.is_empty() || identifier.contains(['/', '\\']) {
                    continue;
                }
                let path = layout.candidate_path(root, identifier);
                if path.is_file() {
                    return Some((path, layout.as_ref()));
                }
            }
        }
        None
    }

    /// Names of the registered layouts, in priority order.
    pub fn layout_names(&self) -> Vec<&str> {
        self.layouts.iter().map(|l| l.name()).collect()
    }
}

impl Default for DocumentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
