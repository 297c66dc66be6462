//! Guardrail monitor
//!
//! Tracks how much of its budget a crawl has spent and decides, before every
//! dequeue, whether the crawl must stop. Depth is not checked here: the
//! frontier never admits targets beyond the depth limit.

use crate::config::CrawlerConfig;
use std::fmt;
use std::time::{Duration, Instant};

/// Why a crawl stopped normally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// `max_pages` pages were visited
    PageLimit,
    /// Nothing left to visit
    FrontierExhausted,
    /// The wall-clock limit passed
    TimeLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::PageLimit => "page limit reached",
            Self::FrontierExhausted => "no pages left to visit",
            Self::TimeLimit => "time limit reached",
        };
        write!(f, "{}", text)
    }
}

/// Counters and limits for one crawl run
#[derive(Debug, Clone)]
pub struct GuardrailState {
    pub pages_visited: u32,
    pub started_at: Instant,
    pub max_pages: u32,
    pub max_depth: u32,
    pub delay: Duration,
    pub time_limit: Option<Duration>,
}

impl GuardrailState {
    pub fn new(
        max_pages: u32,
        max_depth: u32,
        delay: Duration,
        time_limit: Option<Duration>,
    ) -> Self {
        Self {
            pages_visited: 0,
            started_at: Instant::now(),
            max_pages,
            max_depth,
            delay,
            time_limit,
        }
    }

    /// Builds guardrails from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_pages,
            config.max_depth,
            Duration::try_from_secs_f64(config.delay_seconds).unwrap_or_default(),
            config.time_limit_seconds.map(Duration::from_secs),
        )
    }

    /// Checks the stop conditions in order; the first that holds wins
    ///
    /// 1. `pages_visited >= max_pages`
    /// 2. the frontier is empty
    /// 3. the time limit (if any) has elapsed
    pub fn should_stop(&self, frontier_empty: bool) -> Option<StopReason> {
        self.check_at(frontier_empty, Instant::now())
    }

    fn check_at(&self, frontier_empty: bool, now: Instant) -> Option<StopReason> {
        if self.pages_visited >= self.max_pages {
            return Some(StopReason::PageLimit);
        }

        if frontier_empty {
            return Some(StopReason::FrontierExhausted);
        }

        if let Some(limit) = self.time_limit {
            if now.duration_since(self.started_at) >= limit {
                return Some(StopReason::TimeLimit);
            }
        }

        None
    }

    /// Records one visited page (whether or not the fetch succeeded)
    pub fn record_visit(&mut self) {
        self.pages_visited += 1;
    }

    /// Time since the crawl started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
