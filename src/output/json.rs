use crate::errors::Result;
use crate::types::CitationGraph;

/// Formats the graph as pretty-printed node-link JSON.
///
/// ```json
/// {"nodes": [{"id": "P1", "label": "...", "title": "..."}],
///  "edges": [{"source": "P1", "target": "P2"}]}
/// ```
///
/// Optional node attributes are left out when absent.
pub fn to_json(graph: &CitationGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}

/// Parses node-link JSON produced by [`to_json`].
pub fn from_json(source: &str) -> Result<CitationGraph> {
    Ok(serde_json::from_str(source)?)
}
