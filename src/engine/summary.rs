use std::time::Duration;

use crate::error::AbandonedUserError;

use super::state::RunState;

/// Totals of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub user_count: usize,
    pub duration: Duration,
    pub grace_period: Duration,
    pub elapsed: Duration,
    /// Time from the deadline until every user had stopped or was abandoned.
    pub drain: Duration,
    pub iterations: u64,
    pub dispatched: u64,
    pub skipped: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub abandoned: Vec<AbandonedUserError>,
    pub panicked: Vec<usize>,
    pub state: RunState,
}

impl RunSummary {
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.abandoned.is_empty() && self.panicked.is_empty()
    }
}
