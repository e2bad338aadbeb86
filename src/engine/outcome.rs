use std::time::Duration;

use crate::error::DispatchError;

/// Identifies one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchContext {
    pub user_id: usize,
    pub iteration: u64,
}

/// What a dispatcher reports: the response status, or why the attempt failed.
pub type DispatchResult = Result<u16, DispatchError>;

/// A finished dispatch attempt as handed to the metrics sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub context: DispatchContext,
    pub latency: Duration,
    pub result: DispatchResult,
}

impl Outcome {
    #[must_use]
    pub const fn new(context: DispatchContext, latency: Duration, result: DispatchResult) -> Self {
        Self {
            context,
            latency,
            result,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The HTTP status, when a response arrived.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match &self.result {
            Ok(status) => Some(*status),
            Err(err) => err.status(),
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&DispatchError> {
        match &self.result {
            Ok(_) => None,
            Err(err) => Some(err),
        }
    }
}
