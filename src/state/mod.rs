//! State management module
//!
//! This module contains the lifecycle phase of a crawl run and the status
//! recorded for each visited page.

mod page_state;
mod phase;

pub use page_state::PageStatus;
pub use phase::CrawlPhase;
