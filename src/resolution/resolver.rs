use tracing::trace;

use crate::metadata::MetadataIndex;
use crate::types::*;

/// Summary of resolving a batch of references.
#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    pub resolved: Vec<ResolvedRef>,
    pub total: usize,
    pub unresolved_count: usize,
    pub by_identifier: usize,
    pub by_title: usize,
}

/// Resolves references against a read-only metadata index.
///
/// Matching is exact: an identifier must canonicalize to a known key, and a
/// title must normalize to an unambiguous known title. There is no partial
/// or fuzzy scoring.
pub struct ReferenceResolver<'a> {
    index: &'a MetadataIndex,
    policy: ResolutionPolicy,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(index: &'a MetadataIndex, policy: ResolutionPolicy) -> Self {
        Self { index, policy }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Attempts to resolve a single reference.
    ///
    /// The policy's strategies are tried in order and the first hit wins.
    /// Returns `None` if no strategy matches; unknown identifiers are not an
    /// error.
    pub fn resolve_one(&self, reference: &Reference) -> Option<ResolvedRef> {
        for step in self.policy.steps() {
            let target = match step {
                ResolvedBy::Identifier => self.try_identifier_match(reference),
                ResolvedBy::Title => self.try_title_match(reference),
            };
            if let Some(target_id) = target {
                return Some(ResolvedRef {
                    source_id: reference.source_id.clone(),
                    target_id: target_id.to_string(),
                    resolved_by: *step,
                });
            }
        }
        trace!(source = %reference.source_id, title = ?reference.title, "reference unresolved");
        None
    }

    /// Resolves a batch of references, returning the matches and counters.
    pub fn resolve_all(&self, references: impl IntoIterator<Item = Reference>) -> ResolutionResult {
        let mut result = ResolutionResult::default();

        for reference in references {
            result.total += 1;
            match self.resolve_one(&reference) {
                Some(r) => {
                    match r.resolved_by {
                        ResolvedBy::Identifier => result.by_identifier += 1,
                        ResolvedBy::Title => result.by_title += 1,
                    }
                    result.resolved.push(r);
                }
                None => result.unresolved_count += 1,
            }
        }

        result
    }

    /// First embedded identifier that names a known paper.
    fn try_identifier_match(&self, reference: &Reference) -> Option<&'a str> {
        reference
            .identifiers
            .iter()
            .find_map(|id| self.index.resolve_identifier(id))
    }

    fn try_title_match(&self, reference: &Reference) -> Option<&'a str> {
        let title = reference.title.as_deref()?;
        self.index.resolve_title(title)
    }
}
