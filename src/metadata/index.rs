use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use super::normalize::{normalize_identifier, normalize_title};
use crate::types::Paper;

/// In-memory lookup from identifiers and normalized titles to papers.
///
/// Built once from the metadata table and read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct MetadataIndex {
    /// Papers keyed by primary id.
    papers: BTreeMap<String, Paper>,
    /// Canonical identifier (primary or alias) to primary id.
    identifiers: HashMap<String, String>,
    /// Normalized title to primary id, unambiguous titles only.
    titles: HashMap<String, String>,
    /// Normalized titles shared by more than one paper.
    ambiguous_titles: HashSet<String>,
}

impl MetadataIndex {
    /// Builds an index from already-loaded papers.
    ///
    /// The first paper with a given primary id wins. Primary ids take
    /// precedence over aliases, and the first paper to claim an alias keeps it.
    pub fn from_papers(papers: impl IntoIterator<Item = Paper>) -> Self {
        let mut index = Self::default();

        for paper in papers {
            if index.papers.contains_key(&paper.id) {
                warn!(id = %paper.id, "duplicate paper id in metadata; keeping first row");
                continue;
            }
            let key = normalize_identifier(&paper.id);
            if let Some(existing) = index.identifiers.get(&key) {
                warn!(
                    id = %paper.id,
                    existing = %existing,
                    "paper id collides with another id after canonicalization; keeping first row"
                );
                continue;
            }
            index.identifiers.insert(key, paper.id.clone());
            index.papers.insert(paper.id.clone(), paper);
        }

        for paper in index.papers.values() {
            for alias in &paper.aliases {
                let key = normalize_identifier(alias);
                if key.is_empty() {
                    continue;
                }
                match index.identifiers.get(&key) {
                    Some(owner) if owner != &paper.id => {
                        debug!(alias = %alias, owner = %owner, id = %paper.id, "alias already taken");
                    }
                    Some(_) => {}
                    None => {
                        index.identifiers.insert(key, paper.id.clone());
                    }
                }
            }

            let title_key = normalize_title(&paper.title);
            if title_key.is_empty() || index.ambiguous_titles.contains(&title_key) {
                continue;
            }
            match index.titles.get(&title_key) {
                Some(owner) if owner != &paper.id => {
                    debug!(title = %paper.title, "title shared by several papers; excluded from title matching");
                    index.titles.remove(&title_key);
                    index.ambiguous_titles.insert(title_key);
                }
                Some(_) => {}
                None => {
                    index.titles.insert(title_key, paper.id.clone());
                }
            }
        }

        index
    }

    /// Returns the paper with the given primary id.
    pub fn get(&self, id: &str) -> Option<&Paper> {
        self.papers.get(id)
    }

    /// Returns `true` if `id` is the primary id of a known paper.
    pub fn contains(&self, id: &str) -> bool {
        self.papers.contains_key(id)
    }

    /// Maps any known identifier (primary or alias) to its primary id.
    pub fn resolve_identifier(&self, raw: &str) -> Option<&str> {
        let key = normalize_identifier(raw);
        if key.is_empty() {
            return None;
        }
        self.identifiers.get(&key).map(String::as_str)
    }

    /// Maps a title to a primary id by exact normalized-title equality.
    ///
    /// Titles shared by several papers never match.
    pub fn resolve_title(&self, raw: &str) -> Option<&str> {
        let key = normalize_title(raw);
        if key.is_empty() {
            return None;
        }
        self.titles.get(&key).map(String::as_str)
    }

    /// Returns `true` if the normalized form of `raw` names more than one paper.
    pub fn is_ambiguous_title(&self, raw: &str) -> bool {
        self.ambiguous_titles.contains(&normalize_title(raw))
    }

    /// All papers, ordered by primary id.
    pub fn papers(&self) -> impl Iterator<Item = &Paper> {
        self.papers.values()
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Number of distinct identifier keys, aliases included.
    pub fn identifier_count(&self) -> usize {
        self.identifiers.len()
    }
}
