//! Human and machine readable run summaries.
mod json;
mod lines;

#[cfg(test)]
mod tests;

pub use json::SummaryJson;
pub use lines::summary_lines;

use crate::metrics::{JsonlReport, SinkCounts};

/// Sink-side figures printed next to the engine totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportExtras {
    pub recorded: SinkCounts,
    pub outcome_log: Option<OutcomeLogStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeLogStats {
    pub report: JsonlReport,
    pub dropped: u64,
}
