/// Crawl phase definitions for tracking a top-level crawl call
use std::fmt;

/// Represents the phase a `Finder` is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlPhase {
    /// No crawl has run yet
    #[default]
    Idle,

    // ===== Active Phases =====
    /// Clearing all registry state from the previous crawl
    Resetting,

    /// Page tasks are classifying links concurrently
    Classifying,

    /// Waiting for every submitted page task to finish
    Draining,

    /// Sequentially re-checking links recorded as broken
    Retrying,

    /// Deduplicating and ordering report maps, tallying stats
    Sorting,

    // ===== Terminal Phases =====
    /// The crawl completed; reports are frozen until the next crawl
    Done,

    /// The crawl aborted with an error
    Failed,
}

impl CrawlPhase {
    /// Returns true if this is a terminal phase (no crawl in progress)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Idle | Self::Done | Self::Failed)
    }

    /// Returns true if page tasks may write to the registry in this phase
    pub fn is_concurrent(&self) -> bool {
        matches!(self, Self::Classifying | Self::Draining)
    }

    /// The only phase that may follow this one on the success path
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle | Self::Done | Self::Failed => Some(Self::Resetting),
            Self::Resetting => Some(Self::Classifying),
            Self::Classifying => Some(Self::Draining),
            Self::Draining => Some(Self::Retrying),
            Self::Retrying => Some(Self::Sorting),
            Self::Sorting => Some(Self::Done),
        }
    }

    /// Checks whether moving from this phase to `to` is allowed
    ///
    /// No phase may be skipped. A new crawl may only start from a terminal
    /// phase, and any active phase may abort into `Failed`.
    pub fn can_transition_to(&self, to: Self) -> bool {
        if to == Self::Failed {
            return !self.is_terminal();
        }

        self.next() == Some(to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resetting => "resetting",
            Self::Classifying => "classifying",
            Self::Draining => "draining",
            Self::Retrying => "retrying",
            Self::Sorting => "sorting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all phases in success-path order, followed by `Failed`
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::Resetting,
            Self::Classifying,
            Self::Draining,
            Self::Retrying,
            Self::Sorting,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
