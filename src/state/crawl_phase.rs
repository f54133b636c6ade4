//! Lifecycle state of a crawler's dispatch loop

use std::fmt;

/// Represents where a crawler is in its start/pause lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Constructed but never started
    Idle,

    /// Dispatch loop active
    Running,

    /// Loop stopped by `pause()`; frontier and configuration retained
    Paused,

    /// Loop stopped because the frontier drained (stop-when-idle only)
    Finished,
}

impl CrawlPhase {
    /// Returns true while the dispatch loop should keep scheduling ticks
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns the phase that `start()` leads to
    ///
    /// Starting is allowed from every phase and is re-entrant.
    pub fn on_start(self) -> Self {
        Self::Running
    }

    /// Returns the phase that `pause()` leads to
    ///
    /// Only a running crawler can be paused; other phases are left unchanged.
    pub fn on_pause(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            other => other,
        }
    }

    /// Returns the phase reached when the frontier drains with nothing in flight
    pub fn on_drained(self) -> Self {
        match self {
            Self::Running => Self::Finished,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
