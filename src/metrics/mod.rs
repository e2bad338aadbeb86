//! Metrics sinks that receive one record per dispatch attempt.
mod jsonl;
mod sink;

#[cfg(test)]
mod tests;

pub use jsonl::{JsonlReport, JsonlSink, JsonlWriter, OutcomeRecord, open_jsonl_sink};
pub use sink::{CountingSink, FanoutSink, SinkCounts, TracingSink};
