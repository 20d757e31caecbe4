use citegraph::graph::GraphAssembler;
use citegraph::metadata::MetadataIndex;
use citegraph::types::*;

/// Helper: an index with papers `P1..=Pn` titled `Title 1..=n`.
fn setup_index(n: usize) -> MetadataIndex {
    MetadataIndex::from_papers((1..=n).map(|i| Paper::new(format!("P{i}"), format!("Title {i}"))))
}

fn resolved(source: &str, target: &str) -> ResolvedRef {
    ResolvedRef {
        source_id: source.to_string(),
        target_id: target.to_string(),
        resolved_by: ResolvedBy::Identifier,
    }
}

fn edge_pairs(graph: &CitationGraph) -> Vec<(&str, &str)> {
    graph
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect()
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

#[test]
fn test_duplicate_edges_fold() {
    let index = setup_index(2);
    let mut assembler = GraphAssembler::new(&index);
    assert!(assembler.add(&resolved("P1", "P2")));
    assert!(!assembler.add(&resolved("P1", "P2")), "repeat is not a new edge");
    let graph = assembler.finish(NodeInclusion::Connected);
    assert_eq!(edge_pairs(&graph), vec![("P1", "P2")]);
}

#[test]
fn test_self_loops_discarded() {
    let index = setup_index(2);
    let mut assembler = GraphAssembler::new(&index);
    assert!(!assembler.add(&resolved("P1", "P1")));
    assert_eq!(assembler.self_loop_count(), 1);
    let graph = assembler.finish(NodeInclusion::Connected);
    assert!(graph.edges.is_empty());
    assert!(graph.nodes.is_empty());
}

#[test]
fn test_unknown_endpoints_discarded() {
    let index = setup_index(2);
    let mut assembler = GraphAssembler::new(&index);
    assert!(!assembler.add_pair("P1", "P99"));
    assert!(!assembler.add_pair("P99", "P1"));
    assert_eq!(assembler.unknown_endpoint_count(), 2);
    assert_eq!(assembler.edge_count(), 0);
}

#[test]
fn test_node_inclusion_policies() {
    let index = setup_index(4);
    let refs = [resolved("P1", "P2")];

    let mut connected = GraphAssembler::new(&index);
    connected.add_all(&refs);
    let graph = connected.finish(NodeInclusion::Connected);
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2"]);

    let mut all = GraphAssembler::new(&index);
    all.add_all(&refs);
    let graph = all.finish(NodeInclusion::All);
    assert_eq!(graph.nodes.len(), 4);
    assert!(graph.is_closed());
}

#[test]
fn test_order_independence() {
    let index = setup_index(5);
    let refs = vec![
        resolved("P3", "P1"),
        resolved("P1", "P2"),
        resolved("P5", "P4"),
        resolved("P1", "P2"),
        resolved("P2", "P3"),
        resolved("P4", "P4"),
    ];

    let mut forward = GraphAssembler::new(&index);
    forward.add_all(&refs);
    let mut backward = GraphAssembler::new(&index);
    backward.add_all(refs.iter().rev());

    assert_eq!(
        forward.finish(NodeInclusion::Connected),
        backward.finish(NodeInclusion::Connected)
    );
}

#[test]
fn test_nodes_and_edges_sorted() {
    let index = setup_index(3);
    let mut assembler = GraphAssembler::new(&index);
    assembler.add_pair("P3", "P1");
    assembler.add_pair("P2", "P1");
    assembler.add_pair("P1", "P3");
    let graph = assembler.finish(NodeInclusion::Connected);
    assert_eq!(
        edge_pairs(&graph),
        vec![("P1", "P3"), ("P2", "P1"), ("P3", "P1")]
    );
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2", "P3"]);
    assert_eq!(graph.nodes[0].label, "Title 1");
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Two components: {P1, P2, P3} and {P4, P5}, plus isolated P6.
fn two_component_graph() -> CitationGraph {
    let index = setup_index(6);
    let mut assembler = GraphAssembler::new(&index);
    assembler.add_pair("P1", "P2");
    assembler.add_pair("P3", "P2");
    assembler.add_pair("P4", "P5");
    assembler.finish(NodeInclusion::All)
}

#[test]
fn test_stats() {
    let stats = two_component_graph().stats();
    assert_eq!(stats.node_count, 6);
    assert_eq!(stats.edge_count, 3);
    assert_eq!(stats.isolated_count, 1);
    assert_eq!(stats.max_in_degree, 2);
    assert_eq!(stats.max_out_degree, 1);
}

#[test]
fn test_weak_components() {
    let components = two_component_graph().weak_components();
    assert_eq!(components.len(), 3);
    assert_eq!(components[0].len(), 3);
    assert!(components[0].contains("P3"));
    assert_eq!(components[1].len(), 2);
    assert!(components[2].contains("P6"));
}

#[test]
fn test_largest_component() {
    let graph = two_component_graph().largest_component();
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2", "P3"]);
    assert_eq!(graph.edges.len(), 2);
    assert!(graph.is_closed());
}

#[test]
fn test_largest_component_tie_prefers_smallest_id() {
    let index = setup_index(4);
    let mut assembler = GraphAssembler::new(&index);
    assembler.add_pair("P4", "P3");
    assembler.add_pair("P2", "P1");
    let graph = assembler.finish(NodeInclusion::Connected).largest_component();
    assert_eq!(edge_pairs(&graph), vec![("P2", "P1")]);
}

#[test]
fn test_largest_component_of_empty_graph() {
    let graph = CitationGraph::default().largest_component();
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn test_node_lookup_and_citations() {
    let graph = two_component_graph();
    assert_eq!(graph.node("P4").unwrap().title, "Title 4");
    assert!(graph.node("P9").is_none());
    assert_eq!(graph.citations_of("P1"), vec!["P2"]);
    assert!(graph.citations_of("P2").is_empty());
}
