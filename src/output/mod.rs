//! Output module for assembling the crawl document and run report
//!
//! This module handles:
//! - Writing one section per visited page, in visitation order
//! - Markdown and JSON Lines document formats
//! - Summarizing the run once it ends

mod jsonl;
mod markdown;
pub mod report;
mod traits;

pub use jsonl::JsonLinesDocument;
pub use markdown::{format_section, MarkdownDocument};
pub use report::{print_report, CrawlReport, PageRecord, RunStatus};
pub use traits::{DocumentWriter, OutputError, OutputResult, Section};

use crate::config::DocumentFormat;
use std::path::Path;

/// Opens the output document at `path` in the requested format
///
/// The file is created (or truncated) immediately so an unwritable path is
/// reported before any network access.
///
/// # Arguments
///
/// * `path` - Where to write the document
/// * `format` - Markdown or JSON Lines
/// * `start_url` - The seed URL, named in the document header
pub fn open_document(
    path: &Path,
    format: DocumentFormat,
    start_url: &str,
) -> OutputResult<Box<dyn DocumentWriter + Send>> {
    let document: Box<dyn DocumentWriter + Send> = match format {
        DocumentFormat::Markdown => Box::new(MarkdownDocument::create(path, start_url)?),
        DocumentFormat::Jsonl => Box::new(JsonLinesDocument::create(path)?),
    };

    tracing::debug!("Opened {:?} document at {}", format, path.display());
    Ok(document)
}
