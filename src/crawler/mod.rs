//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a politeness delay
//! - HTML text and link extraction
//! - The breadth-first frontier and guardrails
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod guardrail;
mod parser;

pub use coordinator::{Crawler, ShutdownSignal};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchErrorKind, FetchedPage, Fetcher};
pub use frontier::{CrawlTarget, Frontier};
pub use guardrail::{GuardrailState, StopReason};
pub use parser::{check_content_type, ExtractError, Extractor, ParsedPage};
