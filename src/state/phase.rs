use std::fmt;

/// Lifecycle of a crawl run
///
/// `Idle -> Running -> {Done, Aborted}`. Setup failures happen before a
/// crawler exists, so there is no way out of `Idle` except `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Seed admitted, nothing fetched yet
    Idle,

    /// Main loop is running
    Running,

    /// A guardrail stopped the crawl; the document is complete
    Done,

    /// Unrecoverable condition; the document holds everything appended so far
    Aborted,
}

impl CrawlPhase {
    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Done)
                | (Self::Running, Self::Aborted)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
