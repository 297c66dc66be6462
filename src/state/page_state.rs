/// Page status definitions for the outcome of one fetch-and-extract cycle
use crate::crawler::{ExtractError, FetchError};
use std::fmt;

/// Outcome of visiting a single page
#[derive(Debug, Clone, PartialEq)]
pub enum PageStatus {
    /// Page was fetched and its text extracted
    Ok,

    /// Page could not be fetched (timeout, HTTP error, transport failure)
    FetchError(FetchError),

    /// Page was fetched but no text could be extracted from it
    ExtractError(ExtractError),

    /// Page redirected outside the crawl scope or onto an already visited page
    Redirected(String),
}

impl PageStatus {
    /// Returns true if the page gets a section in the output document
    ///
    /// Extraction failures still get a (textless) section: the page was
    /// reached, it just had nothing to transcribe.
    pub fn has_section(&self) -> bool {
        matches!(self, Self::Ok | Self::ExtractError(_))
    }

    /// Returns true if the page is left out of the document entirely
    pub fn is_skipped(&self) -> bool {
        !self.has_section()
    }

    /// Short machine-friendly label for logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::FetchError(_) => "fetch_error",
            Self::ExtractError(_) => "extract_error",
            Self::Redirected(_) => "redirected",
        }
    }

    /// Human-readable reason for a non-OK status
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Ok => None,
            Self::FetchError(e) => Some(e.to_string()),
            Self::ExtractError(e) => Some(e.to_string()),
            Self::Redirected(target) => Some(format!("redirected to {}", target)),
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
