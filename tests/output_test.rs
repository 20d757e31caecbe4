use citegraph::errors::CiteGraphError;
use citegraph::output::*;
use citegraph::types::*;
use std::collections::BTreeSet;
use tempfile::TempDir;

fn sample_graph() -> CitationGraph {
    let mut p1 = GraphNode::from(&Paper::new("P1", "Title A & friends <draft>"));
    p1.doi = Some("10.1000/a".to_string());
    p1.authors = Some("Doe, J.; Roe, \"R\"".to_string());
    p1.publish_time = Some("2020-03-01".to_string());
    let p2 = GraphNode::from(&Paper::new("P2", "Title B"));
    let p3 = GraphNode::from(&Paper::new("P3", "Título C"));
    CitationGraph {
        nodes: vec![p1, p2, p3],
        edges: vec![Edge::new("P1", "P2"), Edge::new("P3", "P1"), Edge::new("P3", "P2")],
    }
}

fn node_ids(graph: &CitationGraph) -> BTreeSet<String> {
    graph.nodes.iter().map(|n| n.id.clone()).collect()
}

fn edge_set(graph: &CitationGraph) -> BTreeSet<Edge> {
    graph.edges.iter().cloned().collect()
}

#[test]
fn test_json_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    let graph = sample_graph();
    write_graph(&graph, &path, OutputFormat::Json).unwrap();

    let back = read_graph(&path, OutputFormat::Json).unwrap();
    assert_eq!(back, graph);
}

#[test]
fn test_gexf_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.gexf");
    let graph = sample_graph();
    write_graph(&graph, &path, OutputFormat::Gexf).unwrap();

    let back = read_graph(&path, OutputFormat::Gexf).unwrap();
    assert_eq!(node_ids(&back), node_ids(&graph));
    assert_eq!(edge_set(&back), edge_set(&graph));
    assert_eq!(back, graph, "attributes survive the round trip too");
}

#[test]
fn test_json_shape() {
    let rendered = render_graph(&sample_graph(), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    let nodes = value["nodes"].as_array().unwrap();
    let edges = value["edges"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(edges.len(), 3);
    assert_eq!(nodes[1]["id"], "P2");
    assert_eq!(nodes[1]["label"], "Title B");
    assert!(nodes[1].get("doi").is_none(), "absent attributes are omitted");
    assert_eq!(edges[0]["source"], "P1");
    assert_eq!(edges[0]["target"], "P2");
}

#[test]
fn test_gexf_shape() {
    let rendered = render_graph(&sample_graph(), OutputFormat::Gexf).unwrap();
    assert!(rendered.starts_with("<?xml"));
    assert!(rendered.contains(r#"defaultedgetype="directed""#));
    assert!(rendered.contains(r#"<edge id="0" source="P1" target="P2"/>"#));
    assert!(rendered.contains("&amp;"), "attribute values are escaped");
}

#[test]
fn test_parse_sorts_any_order() {
    let source = r#"{"nodes": [{"id": "b", "label": "B", "title": "B"}, {"id": "a", "label": "A", "title": "A"}],
                    "edges": [{"source": "b", "target": "a"}, {"source": "a", "target": "b"}]}"#;
    let graph = parse_graph(source, OutputFormat::Json).unwrap();
    assert_eq!(graph.nodes[0].id, "a");
    assert_eq!(graph.edges[0], Edge::new("a", "b"));
}

#[test]
fn test_empty_graph_roundtrip() {
    for format in [OutputFormat::Json, OutputFormat::Gexf] {
        let rendered = render_graph(&CitationGraph::default(), format).unwrap();
        let back = parse_graph(&rendered, format).unwrap();
        assert_eq!(back, CitationGraph::default(), "format {}", format.as_str());
    }
}

#[test]
fn test_unwritable_path_is_write_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "file").unwrap();
    let path = blocker.join("graph.json");

    match write_graph(&sample_graph(), &path, OutputFormat::Json) {
        Err(e @ CiteGraphError::Write { .. }) => assert!(e.is_fatal()),
        other => panic!("expected Write error, got {:?}", other),
    }
}

#[test]
fn test_creates_missing_output_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("deep").join("graph.gexf");
    write_graph(&sample_graph(), &path, OutputFormat::Gexf).unwrap();
    assert!(path.is_file());
}

#[test]
fn test_format_from_path() {
    assert_eq!(
        OutputFormat::from_path(std::path::Path::new("x/cord19.GEXF")),
        Some(OutputFormat::Gexf)
    );
    assert_eq!(
        OutputFormat::from_path(std::path::Path::new("graph.json")),
        Some(OutputFormat::Json)
    );
    assert_eq!(OutputFormat::from_path(std::path::Path::new("graph")), None);
}

#[test]
fn test_malformed_graph_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.gexf");
    std::fs::write(&path, "<gexf><graph><nodes><node label=\"x\"/></nodes></graph></gexf>").unwrap();
    assert!(read_graph(&path, OutputFormat::Gexf).is_err(), "node without id");
}

#[test]
fn test_parse_errors_are_typed() {
    let missing_id = "<gexf><graph><nodes><node label=\"x\"/></nodes></graph></gexf>";
    assert!(matches!(
        parse_graph(missing_id, OutputFormat::Gexf),
        Err(CiteGraphError::GraphFormat { .. })
    ));

    let mismatched = "<gexf><nodes></edges></gexf>";
    assert!(matches!(
        parse_graph(mismatched, OutputFormat::Gexf),
        Err(CiteGraphError::Xml(_))
    ));

    assert!(matches!(
        parse_graph("{\"nodes\": [", OutputFormat::Json),
        Err(CiteGraphError::Json(_))
    ));
}

#[test]
fn test_gexf_drops_characters_invalid_in_xml() {
    let mut node = GraphNode::from(&Paper::new("P1", "Broken\u{1} title\u{b}"));
    node.journal = Some("Journal\u{0}\u{1f} of Things".to_string());
    let graph = CitationGraph {
        nodes: vec![node, GraphNode::from(&Paper::new("P2", "Fine"))],
        edges: vec![Edge::new("P1", "P2")],
    };

    let rendered = render_graph(&graph, OutputFormat::Gexf).unwrap();
    assert!(
        !rendered.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')),
        "control characters leaked into the document"
    );

    let back = parse_graph(&rendered, OutputFormat::Gexf).unwrap();
    let p1 = back.node("P1").unwrap();
    assert_eq!(p1.title, "Broken title");
    assert_eq!(p1.label, "Broken title");
    assert_eq!(p1.journal.as_deref(), Some("Journal of Things"));
    assert_eq!(back.edges, graph.edges);
}
