use std::collections::{BTreeSet, HashSet};

use tracing::trace;

use crate::metadata::MetadataIndex;
use crate::types::*;

/// Folds resolved references into a deduplicated citation graph.
///
/// Every stored edge connects two distinct papers of the index; duplicate
/// pairs collapse into one edge. The final graph does not depend on the
/// order in which references were added.
pub struct GraphAssembler<'a> {
    index: &'a MetadataIndex,
    edges: BTreeSet<Edge>,
    self_loops: usize,
    unknown_endpoints: usize,
}

impl<'a> GraphAssembler<'a> {
    pub fn new(index: &'a MetadataIndex) -> Self {
        Self {
            index,
            edges: BTreeSet::new(),
            self_loops: 0,
            unknown_endpoints: 0,
        }
    }

    /// Adds the edge for one resolved reference.
    ///
    /// Returns `true` only when a new edge was inserted. Self-citations,
    /// endpoints missing from the index and repeats are discarded.
    pub fn add(&mut self, resolved: &ResolvedRef) -> bool {
        self.add_pair(&resolved.source_id, &resolved.target_id)
    }

    /// Adds a `(source, target)` pair under the same rules as [`add`](Self::add).
    pub fn add_pair(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            trace!(id = source, "self-citation dropped");
            self.self_loops += 1;
            return false;
        }
        if !self.index.contains(source) || !self.index.contains(target) {
            trace!(source, target, "edge endpoint not in metadata index");
            self.unknown_endpoints += 1;
            return false;
        }
        self.edges.insert(Edge::new(source, target))
    }

    /// Adds every resolved reference, returning how many new edges were created.
    pub fn add_all<'r>(&mut self, resolved: impl IntoIterator<Item = &'r ResolvedRef>) -> usize {
        resolved.into_iter().filter(|r| self.add(r)).count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of self-citations discarded so far.
    pub fn self_loop_count(&self) -> usize {
        self.self_loops
    }

    /// Number of pairs discarded because an endpoint was unknown.
    pub fn unknown_endpoint_count(&self) -> usize {
        self.unknown_endpoints
    }

    /// Builds the final graph.
    ///
    /// Nodes are sorted by id and edges by `(source, target)`.
    pub fn finish(self, inclusion: NodeInclusion) -> CitationGraph {
        let nodes: Vec<GraphNode> = match inclusion {
            NodeInclusion::All => self.index.papers().map(GraphNode::from).collect(),
            NodeInclusion::Connected => {
                let ids: BTreeSet<&str> = self
                    .edges
                    .iter()
                    .flat_map(|e| [e.source.as_str(), e.target.as_str()])
                    .collect();
                ids.into_iter()
                    .filter_map(|id| self.index.get(id))
                    .map(GraphNode::from)
                    .collect()
            }
        };

        CitationGraph {
            nodes,
            edges: self.edges.into_iter().collect(),
        }
    }
}

impl CitationGraph {
    /// Returns `true` if every edge endpoint is a node of the graph.
    pub fn is_closed(&self) -> bool {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .all(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
    }
}
