use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use super::index::MetadataIndex;
use super::normalize::split_multi;
use crate::config::MetadataOptions;
use crate::errors::{CiteGraphError, Result};
use crate::types::Paper;

/// Positions of the columns the loader reads, resolved from the header row.
struct ColumnMap {
    id: usize,
    title: usize,
    aliases: Vec<usize>,
    documents: Vec<usize>,
    doi: Option<usize>,
    publish_time: Option<usize>,
    authors: Option<usize>,
    journal: Option<usize>,
    url: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord, options: &MetadataOptions, path: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let required = |name: &str| {
            find(name).ok_or_else(|| CiteGraphError::DataLoad {
                message: format!("missing required column '{}'", name),
                path: path.display().to_string(),
            })
        };
        let optional = |names: &[String]| -> Vec<usize> {
            names
                .iter()
                .filter_map(|name| {
                    let idx = find(name.as_str());
                    if idx.is_none() {
                        debug!(column = %name, "optional column not present");
                    }
                    idx
                })
                .collect()
        };

        Ok(Self {
            id: required(options.id_column.as_str())?,
            title: required(options.title_column.as_str())?,
            aliases: optional(&options.alias_columns),
            documents: optional(&options.document_columns),
            doi: find("doi"),
            publish_time: find("publish_time"),
            authors: find("authors"),
            journal: find("journal"),
            url: find("url"),
        })
    }
}

/// Returns the trimmed cell at `idx`, or `None` when it is absent or empty.
fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn owned_cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| cell(record, i)).map(str::to_string)
}

/// Turns one metadata row into a paper, or `None` if the row is filtered out.
fn paper_from_record(record: &StringRecord, columns: &ColumnMap, options: &MetadataOptions) -> Option<Paper> {
    let id = cell(record, columns.id)?;
    let title = cell(record, columns.title)?;

    if title.chars().count() < options.min_title_length {
        debug!(id, title, "title shorter than minimum; row skipped");
        return None;
    }

    let publish_time = owned_cell(record, columns.publish_time);
    if let Some(after) = &options.published_after {
        match &publish_time {
            Some(t) if t.as_str() > after.as_str() => {}
            _ => {
                debug!(id, "published on or before cutoff; row skipped");
                return None;
            }
        }
    }

    let aliases: BTreeSet<String> = columns
        .aliases
        .iter()
        .filter_map(|&i| cell(record, i))
        .flat_map(split_multi)
        .filter(|alias| *alias != id)
        .map(str::to_string)
        .collect();

    let document_paths = columns
        .documents
        .iter()
        .filter_map(|&i| cell(record, i))
        .flat_map(split_multi)
        .map(str::to_string)
        .collect();

    Some(Paper {
        id: id.to_string(),
        title: title.to_string(),
        aliases,
        doi: owned_cell(record, columns.doi),
        publish_time,
        authors: owned_cell(record, columns.authors),
        journal: owned_cell(record, columns.journal),
        url: owned_cell(record, columns.url),
        document_paths,
    })
}

/// Reads every usable row of the metadata table.
///
/// A missing file, a missing required column or a malformed row is a
/// `DataLoad` error. Rows with an empty id or title, or rejected by the
/// configured filters, are skipped.
pub fn read_papers(path: &Path, options: &MetadataOptions) -> Result<Vec<Paper>> {
    let file = File::open(path).map_err(|e| CiteGraphError::DataLoad {
        message: format!("failed to open metadata file: {}", e),
        path: path.display().to_string(),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| CiteGraphError::DataLoad {
            message: format!("failed to read header row: {}", e),
            path: path.display().to_string(),
        })?
        .clone();
    let columns = ColumnMap::from_headers(&headers, options, path)?;

    let mut papers = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| CiteGraphError::DataLoad {
            message: match e.position() {
                Some(pos) => format!("malformed row at line {}: {}", pos.line(), e),
                None => format!("malformed row: {}", e),
            },
            path: path.display().to_string(),
        })?;
        match paper_from_record(&record, &columns, options) {
            Some(paper) => papers.push(paper),
            None => skipped += 1,
        }
    }

    info!(
        path = %path.display(),
        rows = papers.len() + skipped,
        kept = papers.len(),
        skipped,
        "metadata table read"
    );
    Ok(papers)
}

impl MetadataIndex {
    /// Loads the metadata table at `path` and indexes it.
    pub fn load(path: &Path, options: &MetadataOptions) -> Result<Self> {
        let papers = read_papers(path, options)?;
        let index = Self::from_papers(papers);
        info!(
            papers = index.len(),
            identifiers = index.identifier_count(),
            "metadata index built"
        );
        Ok(index)
    }
}
