//! End-of-run report
//!
//! Summarizes what a crawl did: how it ended, how many pages it visited,
//! how many sections it wrote, and which pages it skipped and why.

use crate::crawler::StopReason;
use crate::state::{CrawlPhase, PageStatus};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// How a crawl run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// A guardrail stopped the run normally
    Done(StopReason),

    /// The run was cut short (cancellation, unreachable start URL, output failure)
    Aborted(String),
}

impl RunStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Terminal phase matching this status
    pub fn phase(&self) -> CrawlPhase {
        match self {
            Self::Done(_) => CrawlPhase::Done,
            Self::Aborted(_) => CrawlPhase::Aborted,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(reason) => write!(f, "done: {}", reason),
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// One visited page and its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub url: String,
    pub depth: u32,
    pub status: PageStatus,
}

/// Summary of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// How the run ended
    pub status: RunStatus,

    /// Pages whose fetch was attempted
    pub pages_visited: u32,

    /// Sections appended to the document
    pub sections_written: usize,

    /// Every visited page in visitation order
    pub pages: Vec<PageRecord>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Where the document was written
    pub output_path: PathBuf,
}

impl CrawlReport {
    /// Pages that produced no section, with their reasons
    pub fn skipped(&self) -> Vec<&PageRecord> {
        self.pages
            .iter()
            .filter(|p| p.status.is_skipped())
            .collect()
    }

    /// Pages that got a section without any extracted text
    pub fn extract_failures(&self) -> Vec<&PageRecord> {
        self.pages
            .iter()
            .filter(|p| matches!(p.status, PageStatus::ExtractError(_)))
            .collect()
    }

    /// One-line outcome suitable for a log line
    pub fn summary_line(&self) -> String {
        format!(
            "Crawl {}: {} pages visited, {} sections written, {} skipped in {:.1}s",
            self.status,
            self.pages_visited,
            self.sections_written,
            self.skipped().len(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Outcome: {}", report.status);
    println!("  Pages visited: {}", report.pages_visited);
    println!("  Sections written: {}", report.sections_written);
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!("  Document: {}", report.output_path.display());
    println!();

    let skipped = report.skipped();
    if !skipped.is_empty() {
        println!("Skipped Pages ({}):", skipped.len());
        for page in skipped {
            println!(
                "  - {} ({})",
                page.url,
                page.status.reason().unwrap_or_default()
            );
        }
        println!();
    }

    let failures = report.extract_failures();
    if !failures.is_empty() {
        println!("Pages Without Text ({}):", failures.len());
        for page in failures {
            println!(
                "  - {} ({})",
                page.url,
                page.status.reason().unwrap_or_default()
            );
        }
        println!();
    }

    let success_rate = if report.pages_visited > 0 {
        (report.sections_written as f64 / report.pages_visited as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Coverage: {:.1}% ({} / {} visited pages transcribed)",
        success_rate, report.sections_written, report.pages_visited
    );
}
