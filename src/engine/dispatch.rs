use async_trait::async_trait;

use super::outcome::{DispatchContext, DispatchResult, Outcome};
use super::run_config::RequestTarget;

/// Performs one request attempt.
///
/// Implementations own retries, timeouts and connection handling; the engine
/// treats a call as opaque and possibly slow. Failures are returned, never
/// panicked.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, target: &RequestTarget, context: DispatchContext) -> DispatchResult;
}

/// Receives one record per dispatch attempt.
///
/// `record` is fire-and-forget: it must not block or panic, and whatever goes
/// wrong inside a sink stays inside the sink.
pub trait MetricsSink: Send + Sync {
    fn record(&self, outcome: &Outcome);
}
