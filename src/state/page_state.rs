/// Page state definitions for tracking one crawl task through the pipeline
///
/// Each dispatched task walks a fixed path: fetch, extract, enrich, write.
/// The two failure states end the task without emitting a document.
use crate::HarvestError;
use std::fmt;

/// Represents the current state of a page in the crawl pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Task has been popped from the frontier but not yet dispatched
    Pending,

    /// HTTP request in flight
    Fetching,

    /// HTML body received
    Fetched,

    /// HTML is being parsed and cleaned
    Extracting,

    /// Title, body and links are available
    Extracted,

    /// Metadata is being computed
    Enriching,

    /// Document has been built
    Enriched,

    // ===== Terminal Success State =====
    /// Document has been handed to the writer
    Written,

    // ===== Terminal Error States =====
    /// Transport error, non-2xx status, unsupported content type, robots denial
    FetchFailed,

    /// Markup could not be parsed or the body was rejected
    ExtractFailed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Written | Self::FetchFailed | Self::ExtractFailed)
    }

    /// Returns true if this represents a failed task
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::ExtractFailed)
    }

    /// Returns true if the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;

        matches!(
            (self, next),
            (Pending, Fetching)
                | (Fetching, Fetched)
                | (Fetching, FetchFailed)
                | (Fetched, Extracting)
                | (Extracting, Extracted)
                | (Extracting, ExtractFailed)
                | (Extracted, Enriching)
                | (Enriching, Enriched)
                | (Enriched, Written)
        )
    }

    /// Returns the snake_case name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Extracting => "extracting",
            Self::Extracted => "extracted",
            Self::Enriching => "enriching",
            Self::Enriched => "enriched",
            Self::Written => "written",
            Self::FetchFailed => "fetch_failed",
            Self::ExtractFailed => "extract_failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Fetched,
            Self::Extracting,
            Self::Extracted,
            Self::Enriching,
            Self::Enriched,
            Self::Written,
            Self::FetchFailed,
            Self::ExtractFailed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks a single task's progress and rejects out-of-order moves
#[derive(Debug, Clone)]
pub struct PageLifecycle {
    state: PageState,
}

impl PageLifecycle {
    /// Starts a lifecycle in the `Pending` state
    pub fn new() -> Self {
        Self {
            state: PageState::Pending,
        }
    }

    /// Returns the current state
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Moves to `next`, or fails with `InvalidTransition`
    pub fn advance(&mut self, next: PageState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("page state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}

impl Default for PageLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
