use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::types::*;

impl CitationGraph {
    /// Number of incoming edges per node id.
    pub fn in_degrees(&self) -> HashMap<&str, usize> {
        let mut degrees: HashMap<&str, usize> =
            self.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
        for edge in &self.edges {
            *degrees.entry(edge.target.as_str()).or_default() += 1;
        }
        degrees
    }

    /// Number of outgoing edges per node id.
    pub fn out_degrees(&self) -> HashMap<&str, usize> {
        let mut degrees: HashMap<&str, usize> =
            self.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
        for edge in &self.edges {
            *degrees.entry(edge.source.as_str()).or_default() += 1;
        }
        degrees
    }

    /// Returns aggregate statistics about the graph.
    pub fn stats(&self) -> GraphStats {
        let in_degrees = self.in_degrees();
        let out_degrees = self.out_degrees();
        let isolated_count = self
            .nodes
            .iter()
            .filter(|n| {
                in_degrees.get(n.id.as_str()).copied().unwrap_or(0) == 0
                    && out_degrees.get(n.id.as_str()).copied().unwrap_or(0) == 0
            })
            .count();

        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            isolated_count,
            max_in_degree: in_degrees.values().copied().max().unwrap_or(0),
            max_out_degree: out_degrees.values().copied().max().unwrap_or(0),
        }
    }

    /// Splits the node set into weakly connected components.
    ///
    /// Components are returned in order of their smallest node id.
    pub fn weak_components(&self) -> Vec<BTreeSet<String>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
            adjacency
                .entry(edge.target.as_str())
                .or_default()
                .push(edge.source.as_str());
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut components = Vec::new();

        for node in &self.nodes {
            let start = node.id.as_str();
            if !visited.insert(start) {
                continue;
            }
            let mut component = BTreeSet::new();
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                component.insert(current.to_string());
                for &next in adjacency.get(current).map(Vec::as_slice).unwrap_or(&[]) {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Keeps only the largest weakly connected component.
    ///
    /// On a tie the component containing the smallest node id wins.
    pub fn largest_component(&self) -> CitationGraph {
        let mut best: Option<BTreeSet<String>> = None;
        for component in self.weak_components() {
            if best.as_ref().map_or(true, |b| component.len() > b.len()) {
                best = Some(component);
            }
        }
        let Some(keep) = best else {
            return CitationGraph::default();
        };

        CitationGraph {
            nodes: self
                .nodes
                .iter()
                .filter(|n| keep.contains(&n.id))
                .cloned()
                .collect(),
            edges: self
                .edges
                .iter()
                .filter(|e| keep.contains(&e.source) && keep.contains(&e.target))
                .cloned()
                .collect(),
        }
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes
            .binary_search_by(|n| n.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.nodes[i])
    }

    /// Ids of the papers `id` cites.
    pub fn citations_of(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .map(|e| e.target.as_str())
            .collect()
    }
}
