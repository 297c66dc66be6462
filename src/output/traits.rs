//! Document writer trait and types
//!
//! This module defines the interface the crawl engine uses to assemble its
//! output document, one section per visited page.

use crate::output::report::RunStatus;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize section: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Document was already finalized")]
    AlreadyFinalized,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One unit of the output document: a visited page and its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// The page URL, used as the section title
    pub url: String,

    /// The page's own `<title>`, if it had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,

    /// Link depth from the start URL
    pub depth: u32,

    /// Extracted text, one block per line (may be empty)
    pub text: String,
}

/// Trait for output documents
///
/// The crawl engine is the only writer. Sections arrive in visitation order
/// and are appended as they come; implementations flush after every section
/// so that an aborted run still leaves a readable document behind.
pub trait DocumentWriter {
    /// Appends one section to the document
    fn append_section(&mut self, section: &Section) -> OutputResult<()>;

    /// Writes any trailer and flushes; must be called exactly once
    ///
    /// A second call returns [`OutputError::AlreadyFinalized`].
    fn finalize(&mut self, status: &RunStatus) -> OutputResult<()>;

    /// Number of sections appended so far
    fn sections_written(&self) -> usize;
}
