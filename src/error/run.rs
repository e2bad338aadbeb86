use std::time::Duration;

use thiserror::Error;

/// A virtual user that was still busy when the drain grace period ran out.
///
/// The user's task is aborted and whatever it was dispatching is discarded.
/// This is recorded in the run summary and never fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Virtual user {user_id} did not stop within the {grace:?} grace period.")]
pub struct AbandonedUserError {
    pub user_id: usize,
    pub grace: Duration,
}
