use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::engine::{MetricsSink, Outcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkCounts {
    pub succeeded: u64,
    pub failed: u64,
}

impl SinkCounts {
    #[must_use]
    pub const fn total(self) -> u64 {
        self.succeeded.saturating_add(self.failed)
    }
}

/// Lock-free success/failure tally.
#[derive(Debug, Default)]
pub struct CountingSink {
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl CountingSink {
    #[must_use]
    pub fn counts(&self) -> SinkCounts {
        SinkCounts {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSink for CountingSink {
    fn record(&self, outcome: &Outcome) {
        let counter = if outcome.is_success() {
            &self.succeeded
        } else {
            &self.failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Logs each failure at debug and each success at trace. The run summary
/// carries the totals.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn record(&self, outcome: &Outcome) {
        let context = outcome.context;
        match &outcome.result {
            Ok(status) => trace!(
                user = context.user_id,
                iteration = context.iteration,
                status,
                latency_ms = u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX),
                "Request succeeded"
            ),
            Err(err) => debug!(
                user = context.user_id,
                iteration = context.iteration,
                kind = err.kind(),
                "Request failed: {}",
                err
            ),
        }
    }
}

/// Forwards every record to each inner sink in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn MetricsSink>>,
}

impl FanoutSink {
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl MetricsSink for FanoutSink {
    fn record(&self, outcome: &Outcome) {
        for sink in &self.sinks {
            sink.record(outcome);
        }
    }
}
