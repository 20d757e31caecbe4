use clap::Parser;
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use citegraph::citegraph::CiteGraph;
use citegraph::config::{load_config_or_default, save_config, CiteGraphConfig};
use citegraph::errors::{CiteGraphError, Result};
use citegraph::types::*;

/// Builds a citation graph from a paper metadata table and parsed documents.
#[derive(Parser)]
#[command(
    name = "citegraph",
    version,
    about = "Builds a citation graph from a paper metadata table and parsed full-text documents"
)]
struct Cli {
    /// JSON config file (default: ./citegraph.json when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Metadata CSV file
    #[arg(short, long)]
    metadata: Option<PathBuf>,
    /// Document root containing pmc_json/ and pdf_json/
    #[arg(short, long)]
    documents: Option<PathBuf>,
    /// Output graph file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Output format (json or gexf); guessed from the output extension if omitted
    #[arg(short, long)]
    format: Option<String>,
    /// Resolution policy (id-then-title, id-only, title-only, title-then-id)
    #[arg(short, long)]
    policy: Option<String>,
    /// Include papers without any citation edge as nodes
    #[arg(long)]
    all_papers: bool,
    /// Keep only the largest connected component
    #[arg(long)]
    largest_component: bool,
    /// Skip metadata rows whose title is shorter than this
    #[arg(long)]
    min_title_length: Option<usize>,
    /// Skip papers published on or before this ISO date (e.g. 2019-12-31)
    #[arg(long)]
    published_after: Option<String>,
    /// Build the graph and print the report without writing it
    #[arg(long)]
    dry_run: bool,
    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
    /// Write the effective configuration to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
    /// More logging (debug)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Less logging (warnings only)
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "citegraph=debug"
    } else if quiet {
        "citegraph=warn"
    } else {
        "citegraph=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = load_config_or_default(cli.config.as_deref(), &cwd)?;
    apply_overrides(&mut config, &cli)?;
    config.validate()?;

    if let Some(path) = &cli.write_config {
        save_config(path, &config)?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let cg = CiteGraph::new(config)?;
    let report = if cli.dry_run {
        cg.build().1
    } else {
        cg.run()?
    };

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        let target = if cli.dry_run {
            "(dry run, nothing written)".to_string()
        } else {
            cg.config().output_path.display().to_string()
        };
        println!(
            "{} papers, {} documents ({} unreadable), {} references: {} nodes, {} edges in {}ms -> {}",
            report.paper_count,
            report.documents_found,
            report.documents_failed,
            report.reference_count,
            report.node_count,
            report.edge_count,
            report.duration_ms,
            target
        );
    }
    Ok(())
}

/// Applies command-line flags on top of the loaded configuration.
fn apply_overrides(config: &mut CiteGraphConfig, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.metadata {
        config.metadata_path = path.clone();
    }
    if let Some(dir) = &cli.documents {
        config.document_root = dir.clone();
    }
    if let Some(path) = &cli.output {
        config.output_path = path.clone();
        if cli.format.is_none() {
            if let Some(format) = OutputFormat::from_path(path) {
                config.output_format = format;
            }
        }
    }
    if let Some(name) = &cli.format {
        config.output_format = OutputFormat::from_str(name).ok_or_else(|| CiteGraphError::Config {
            message: format!("unknown output format '{}' (expected json or gexf)", name),
        })?;
    }
    if let Some(name) = &cli.policy {
        config.resolution_policy =
            ResolutionPolicy::from_str(name).ok_or_else(|| CiteGraphError::Config {
                message: format!(
                    "unknown resolution policy '{}' (expected id-then-title, id-only, title-only or title-then-id)",
                    name
                ),
            })?;
    }
    if cli.all_papers {
        config.node_inclusion = NodeInclusion::All;
    }
    if cli.largest_component {
        config.largest_component = true;
    }
    if let Some(n) = cli.min_title_length {
        config.metadata.min_title_length = n;
    }
    if let Some(date) = &cli.published_after {
        config.metadata.published_after = Some(date.clone());
    }
    Ok(())
}
