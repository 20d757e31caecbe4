/// GEXF 1.2 serialization, read by Gephi.
pub mod gexf;

/// Node-link JSON serialization.
pub mod json;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::errors::{CiteGraphError, Result};
use crate::types::{CitationGraph, OutputFormat};

/// Renders the graph in the given format.
pub fn render_graph(graph: &CitationGraph, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(graph),
        OutputFormat::Gexf => gexf::to_gexf(graph),
    }
}

/// Parses a graph previously written in the given format.
///
/// Nodes and edges come back sorted, whatever order the file used.
pub fn parse_graph(source: &str, format: OutputFormat) -> Result<CitationGraph> {
    let mut graph = match format {
        OutputFormat::Json => json::from_json(source)?,
        OutputFormat::Gexf => gexf::from_gexf(source)?,
    };
    graph.nodes.sort_by(|a, b| a.id.cmp(&b.id));
    graph.edges.sort();
    graph.edges.dedup();
    Ok(graph)
}

/// Writes the graph to `path`.
///
/// The file is written next to its destination and renamed into place, so a
/// failed run never leaves a truncated graph behind. Any failure is a
/// `Write` error.
pub fn write_graph(graph: &CitationGraph, path: &Path, format: OutputFormat) -> Result<()> {
    let write_error = |message: String| CiteGraphError::Write {
        message,
        path: path.display().to_string(),
    };

    let rendered = render_graph(graph, format)
        .map_err(|e| write_error(format!("failed to render {}: {}", format.as_str(), e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            write_error(format!(
                "failed to create output directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    fs::write(tmp_path, rendered.as_bytes()).map_err(|e| {
        write_error(format!(
            "failed to write temporary file '{}': {}",
            tmp_path.display(),
            e
        ))
    })?;

    fs::rename(tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(tmp_path);
        write_error(format!(
            "failed to rename temporary file '{}' into place: {}",
            tmp_path.display(),
            e
        ))
    })?;

    info!(
        path = %path.display(),
        format = format.as_str(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "graph written"
    );
    Ok(())
}

/// Reads a graph file written by [`write_graph`].
pub fn read_graph(path: &Path, format: OutputFormat) -> Result<CitationGraph> {
    let source = fs::read_to_string(path).map_err(|e| CiteGraphError::DataLoad {
        message: format!("failed to read graph file: {}", e),
        path: path.display().to_string(),
    })?;
    parse_graph(&source, format).map_err(|e| CiteGraphError::DataLoad {
        message: format!("failed to parse {} graph: {}", format.as_str(), e),
        path: path.display().to_string(),
    })
}
