use serde::Serialize;

use crate::engine::RunSummary;

use super::ReportExtras;

/// Serializable view of a [`RunSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryJson {
    pub state: &'static str,
    pub user_count: usize,
    pub duration_ms: u64,
    pub elapsed_ms: u64,
    pub drain_ms: u64,
    pub grace_period_ms: u64,
    pub iterations: u64,
    pub dispatched: u64,
    pub skipped: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub recorded_succeeded: u64,
    pub recorded_failed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome_log_written: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome_log_dropped: Option<u64>,
    pub abandoned_users: Vec<usize>,
    pub panicked_users: Vec<usize>,
}

impl SummaryJson {
    #[must_use]
    pub fn new(summary: &RunSummary, extras: &ReportExtras) -> Self {
        let millis = |duration: std::time::Duration| {
            u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
        };
        Self {
            state: summary.state.as_str(),
            user_count: summary.user_count,
            duration_ms: millis(summary.duration),
            elapsed_ms: millis(summary.elapsed),
            drain_ms: millis(summary.drain),
            grace_period_ms: millis(summary.grace_period),
            iterations: summary.iterations,
            dispatched: summary.dispatched,
            skipped: summary.skipped,
            succeeded: summary.succeeded,
            failed: summary.failed,
            recorded_succeeded: extras.recorded.succeeded,
            recorded_failed: extras.recorded.failed,
            outcome_log_written: extras.outcome_log.map(|log| log.report.written),
            outcome_log_dropped: extras.outcome_log.map(|log| log.dropped),
            abandoned_users: summary.abandoned.iter().map(|err| err.user_id).collect(),
            panicked_users: summary.panicked.clone(),
        }
    }
}
