use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::CiteGraphConfig;
use crate::document::{DocumentLookup, DocumentParser};
use crate::errors::Result;
use crate::graph::GraphAssembler;
use crate::metadata::MetadataIndex;
use crate::output::write_graph;
use crate::resolution::ReferenceResolver;
use crate::types::*;

/// Central orchestrator that runs loader, parser, resolver, assembler and
/// serializer once, in that order.
pub struct CiteGraph {
    config: CiteGraphConfig,
    index: MetadataIndex,
    parser: DocumentParser,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl CiteGraph {
    /// Validates the configuration and loads the metadata index.
    ///
    /// A missing or malformed metadata table is fatal.
    pub fn new(config: CiteGraphConfig) -> Result<Self> {
        config.validate()?;
        let index = MetadataIndex::load(&config.metadata_path, &config.metadata)?;
        Ok(Self::with_index(config, index))
    }

    /// Builds an orchestrator around an already-loaded index.
    pub fn with_index(config: CiteGraphConfig, index: MetadataIndex) -> Self {
        let parser = DocumentParser::new(config.document_root.clone());
        Self {
            config,
            index,
            parser,
        }
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

impl CiteGraph {
    /// Extracts, resolves and assembles the citation graph.
    ///
    /// Papers are processed one at a time in id order. Papers without a
    /// document contribute nothing; a broken document is logged and counted
    /// but does not stop the run.
    pub fn build(&self) -> (CitationGraph, BuildReport) {
        let start = Instant::now();
        let resolver = ReferenceResolver::new(&self.index, self.config.resolution_policy);
        let mut assembler = GraphAssembler::new(&self.index);
        let mut report = BuildReport {
            paper_count: self.index.len(),
            ..BuildReport::default()
        };

        for paper in self.index.papers() {
            let references = match self.parser.lookup(paper) {
                DocumentLookup::Missing => continue,
                DocumentLookup::Parsed { path, references } => {
                    debug!(id = %paper.id, path = %path.display(), "reading references");
                    report.documents_found += 1;
                    references
                }
                DocumentLookup::Failed(e) => {
                    warn!(id = %paper.id, error = %e, "skipping unparseable document");
                    report.documents_found += 1;
                    report.documents_failed += 1;
                    continue;
                }
            };

            let resolution = resolver.resolve_all(references);
            report.reference_count += resolution.total;
            report.resolved_by_identifier += resolution.by_identifier;
            report.resolved_by_title += resolution.by_title;
            report.unresolved_count += resolution.unresolved_count;
            assembler.add_all(&resolution.resolved);
        }

        debug!(
            self_loops = assembler.self_loop_count(),
            unknown_endpoints = assembler.unknown_endpoint_count(),
            "edges discarded"
        );

        let mut graph = assembler.finish(self.config.node_inclusion);
        if self.config.largest_component {
            let before = graph.nodes.len();
            graph = graph.largest_component();
            info!(
                kept = graph.nodes.len(),
                dropped = before - graph.nodes.len(),
                "kept largest connected component"
            );
        }

        report.node_count = graph.nodes.len();
        report.edge_count = graph.edges.len();
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            papers = report.paper_count,
            documents = report.documents_found,
            failed = report.documents_failed,
            references = report.reference_count,
            by_identifier = report.resolved_by_identifier,
            by_title = report.resolved_by_title,
            nodes = report.node_count,
            edges = report.edge_count,
            "citation graph assembled"
        );

        (graph, report)
    }

    /// Builds the graph and writes it to the configured output path.
    pub fn run(&self) -> Result<BuildReport> {
        let (graph, report) = self.build();
        write_graph(&graph, &self.config.output_path, self.config.output_format)?;
        Ok(report)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &CiteGraphConfig {
        &self.config
    }

    /// Returns the loaded metadata index.
    pub fn index(&self) -> &MetadataIndex {
        &self.index
    }

    /// Returns the document parser bound to the configured document root.
    pub fn parser(&self) -> &DocumentParser {
        &self.parser
    }
}
