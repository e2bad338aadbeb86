use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, Sleep, sleep};
use tracing::{debug, error, info, warn};

use crate::error::{AbandonedUserError, ConfigError};
use crate::shutdown::{ShutdownSender, shutdown_channel};

use super::dispatch::{Dispatcher, MetricsSink};
use super::policy::{EntropyPolicySource, PolicySource};
use super::run_config::RunConfig;
use super::state::RunState;
use super::summary::RunSummary;
use super::user::{ActiveUserGuard, CounterSnapshot, UserCounters, VirtualUser};

/// Owns everything needed to start one run.
pub struct Scheduler {
    config: Arc<RunConfig>,
    dispatcher: Arc<dyn Dispatcher>,
    sink: Arc<dyn MetricsSink>,
    policies: Arc<dyn PolicySource>,
    state_tx: watch::Sender<RunState>,
}

impl Scheduler {
    #[must_use]
    pub fn new(
        config: RunConfig,
        dispatcher: Arc<dyn Dispatcher>,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        let policies: Arc<dyn PolicySource> = Arc::new(EntropyPolicySource::new(config.seed()));
        let (state_tx, _) = watch::channel(RunState::NotStarted);
        Self {
            config: Arc::new(config),
            dispatcher,
            sink,
            policies,
            state_tx,
        }
    }

    #[must_use]
    pub fn with_policy_source(mut self, policies: impl PolicySource + 'static) -> Self {
        self.policies = Arc::new(policies);
        self
    }

    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.state_tx.subscribe()
    }

    /// Spawns every virtual user at once and arms the run deadline.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration cannot start a run.
    /// No user is spawned in that case.
    pub async fn start(self) -> Result<RunHandle, ConfigError> {
        // `RunConfig::build` already rejects both; re-checked here before any
        // task is spawned.
        if self.config.user_count() == 0 {
            return Err(ConfigError::UserCountZero);
        }
        if self.config.duration().is_zero() {
            return Err(ConfigError::DurationZero);
        }

        let user_count = self.config.user_count();
        let (shutdown_tx, _) = shutdown_channel();
        let active = Arc::new(AtomicUsize::new(0));
        let receivers: Vec<_> = (0..user_count).map(|_| shutdown_tx.subscribe()).collect();

        let started = Instant::now();
        let deadline = Box::pin(sleep(self.config.duration()));
        let mut users = Vec::with_capacity(user_count);
        for (id, shutdown_rx) in receivers.into_iter().enumerate() {
            let counters = Arc::new(UserCounters::default());
            let user = VirtualUser {
                id,
                config: Arc::clone(&self.config),
                dispatcher: Arc::clone(&self.dispatcher),
                sink: Arc::clone(&self.sink),
                policy: self.policies.policy_for(id),
                counters: Arc::clone(&counters),
                sink_panics: 0,
            };
            let guard = ActiveUserGuard::acquire(&active);
            let handle = tokio::spawn(async move {
                let _guard = guard;
                user.run(shutdown_rx).await;
            });
            users.push(UserSlot {
                id,
                handle,
                counters,
            });
        }
        self.state_tx.send_replace(RunState::Running);
        info!(
            "Started {} virtual users for {:?}",
            user_count,
            self.config.duration()
        );

        Ok(RunHandle {
            config: self.config,
            shutdown_tx,
            state_tx: self.state_tx,
            deadline,
            started,
            active,
            users,
        })
    }

    /// Starts the run and waits for it to complete.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the run cannot start.
    pub async fn run(self) -> Result<RunSummary, ConfigError> {
        let handle = self.start().await?;
        Ok(handle.wait().await)
    }
}

struct UserSlot {
    id: usize,
    handle: JoinHandle<()>,
    counters: Arc<UserCounters>,
}

/// A run in progress. Dropping it without [`RunHandle::wait`] closes the stop
/// channel, which also stops every user.
pub struct RunHandle {
    config: Arc<RunConfig>,
    shutdown_tx: ShutdownSender,
    state_tx: watch::Sender<RunState>,
    deadline: Pin<Box<Sleep>>,
    started: Instant,
    active: Arc<AtomicUsize>,
    users: Vec<UserSlot>,
}

impl RunHandle {
    #[must_use]
    pub fn state(&self) -> RunState {
        *self.state_tx.borrow()
    }

    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.state_tx.subscribe()
    }

    /// Number of user tasks that are still alive.
    #[must_use]
    pub fn active_users(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Waits for the deadline, stops every user and drains them within the
    /// grace period. Users still running when the grace period ends are
    /// aborted and reported in [`RunSummary::abandoned`].
    pub async fn wait(mut self) -> RunSummary {
        self.deadline.as_mut().await;

        self.state_tx.send_replace(RunState::Draining);
        let drain_started = Instant::now();
        debug!("Run deadline reached, stopping virtual users");
        if self.shutdown_tx.send(()).is_err() {
            debug!("No virtual user was listening for the stop signal");
        }

        let grace_period = self.config.grace_period();
        let grace = sleep(grace_period);
        tokio::pin!(grace);
        let mut grace_expired = false;
        let mut abandoned = Vec::new();
        let mut panicked = Vec::new();
        let mut totals = CounterSnapshot::default();

        for slot in std::mem::take(&mut self.users) {
            let UserSlot {
                id,
                mut handle,
                counters,
            } = slot;
            let joined = if grace_expired {
                None
            } else {
                tokio::select! {
                    result = &mut handle => Some(result),
                    () = &mut grace => {
                        grace_expired = true;
                        None
                    }
                }
            };
            let joined = match joined {
                Some(result) => Ok(result),
                None if handle.is_finished() => Ok(handle.await),
                None => Err(handle),
            };
            match joined {
                Ok(result) => {
                    if let Some(panicked_id) = classify_join(id, &result) {
                        panicked.push(panicked_id);
                    }
                }
                Err(straggler) => {
                    straggler.abort();
                    let err = AbandonedUserError {
                        user_id: id,
                        grace: grace_period,
                    };
                    warn!("{}", err);
                    abandoned.push(err);
                }
            }
            totals = totals.merge(counters.snapshot());
        }

        self.state_tx.send_replace(RunState::Completed);
        let summary = RunSummary {
            user_count: self.config.user_count(),
            duration: self.config.duration(),
            grace_period,
            elapsed: self.elapsed(),
            drain: drain_started.elapsed(),
            iterations: totals.iterations,
            dispatched: totals.dispatched,
            skipped: totals.skipped,
            succeeded: totals.succeeded,
            failed: totals.failed,
            abandoned,
            panicked,
            state: RunState::Completed,
        };
        info!(
            "Run completed in {:?}: {} dispatched, {} abandoned",
            summary.elapsed,
            summary.dispatched,
            summary.abandoned.len()
        );
        summary
    }
}

fn classify_join(id: usize, result: &Result<(), JoinError>) -> Option<usize> {
    match result {
        Ok(()) => None,
        Err(err) if err.is_panic() => {
            error!("Virtual user {} panicked: {}", id, err);
            Some(id)
        }
        Err(err) => {
            warn!("Virtual user {} was cancelled: {}", id, err);
            None
        }
    }
}
