//! Breadth-first frontier and visited set
//!
//! This module handles:
//! - The FIFO queue of targets waiting to be fetched
//! - Admission rules (depth bound, visited, already queued)
//! - The visited set, marked after each fetch attempt

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched, with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// The normalized URL to fetch
    pub url: Url,

    /// Number of links followed from the seed (seed = 0)
    pub depth: u32,
}

impl CrawlTarget {
    /// The seed target at depth 0
    pub fn seed(url: Url) -> Self {
        Self { url, depth: 0 }
    }

    /// A target discovered on this page, one level deeper
    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
        }
    }

    pub fn is_seed(&self) -> bool {
        self.depth == 0
    }
}

/// Frontier manages the crawl queue and deduplication
///
/// A URL moves through three states:
/// - queued: admitted and waiting in the queue
/// - in flight: popped, fetch not yet recorded (still counted as queued)
/// - visited: fetch attempted, successfully or not
///
/// Admission checks both the queued and visited sets, so two pages linking
/// to the same URL before either is processed enqueue it only once.
#[derive(Debug, Clone)]
pub struct Frontier {
    queue: VecDeque<CrawlTarget>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    max_depth: u32,
}

impl Frontier {
    /// Creates an empty frontier that refuses targets deeper than `max_depth`
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Adds a target to the back of the queue
    ///
    /// Returns `false` (and does nothing) when the target is deeper than the
    /// depth limit, already visited, or already queued.
    pub fn admit(&mut self, target: CrawlTarget) -> bool {
        if target.depth > self.max_depth {
            tracing::trace!(
                "Not admitting {} at depth {} (max {})",
                target.url,
                target.depth,
                self.max_depth
            );
            return false;
        }

        let key = target.url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }

        self.queued.insert(key.to_string());
        self.queue.push_back(target);
        true
    }

    /// Removes and returns the oldest queued target
    ///
    /// Targets that were marked visited while waiting (a redirect landed on
    /// them) are dropped instead of returned.
    pub fn pop_next(&mut self) -> Option<CrawlTarget> {
        while let Some(target) = self.queue.pop_front() {
            if !self.visited.contains(target.url.as_str()) {
                return Some(target);
            }
        }
        None
    }

    /// Records that a fetch was attempted for `url`
    pub fn mark_visited(&mut self, url: &Url) {
        let key = url.as_str();
        self.queued.remove(key);
        self.visited.insert(key.to_string());
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Returns the number of targets waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
