use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use futures_util::FutureExt;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace, warn};

use crate::error::DispatchError;
use crate::shutdown::ShutdownReceiver;

use super::dispatch::{Dispatcher, MetricsSink};
use super::outcome::{DispatchContext, Outcome};
use super::policy::RandomPolicy;
use super::run_config::RunConfig;

/// Counters owned by one virtual user. Only that user writes them; the
/// scheduler reads them once the run has drained.
#[derive(Debug, Default)]
pub(super) struct UserCounters {
    iterations: AtomicU64,
    dispatched: AtomicU64,
    skipped: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct CounterSnapshot {
    pub(super) iterations: u64,
    pub(super) dispatched: u64,
    pub(super) skipped: u64,
    pub(super) succeeded: u64,
    pub(super) failed: u64,
}

impl UserCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record(&self, outcome: &Outcome) {
        Self::bump(&self.dispatched);
        if outcome.is_success() {
            Self::bump(&self.succeeded);
        } else {
            Self::bump(&self.failed);
        }
    }

    pub(super) fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            iterations: self.iterations.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl CounterSnapshot {
    pub(super) const fn merge(self, other: Self) -> Self {
        Self {
            iterations: self.iterations.saturating_add(other.iterations),
            dispatched: self.dispatched.saturating_add(other.dispatched),
            skipped: self.skipped.saturating_add(other.skipped),
            succeeded: self.succeeded.saturating_add(other.succeeded),
            failed: self.failed.saturating_add(other.failed),
        }
    }
}

/// Keeps the live user count accurate however the task ends: normal exit,
/// panic, or abort.
pub(super) struct ActiveUserGuard {
    counter: Arc<AtomicUsize>,
}

impl ActiveUserGuard {
    pub(super) fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for ActiveUserGuard {
    fn drop(&mut self) {
        loop {
            let current = self.counter.load(Ordering::Relaxed);
            let Some(next) = current.checked_sub(1) else {
                break;
            };
            if self
                .counter
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }
        }
    }
}

pub(super) struct VirtualUser {
    pub(super) id: usize,
    pub(super) config: Arc<RunConfig>,
    pub(super) dispatcher: Arc<dyn Dispatcher>,
    pub(super) sink: Arc<dyn MetricsSink>,
    pub(super) policy: Box<dyn RandomPolicy>,
    pub(super) counters: Arc<UserCounters>,
    pub(super) sink_panics: u64,
}

impl VirtualUser {
    /// Runs until the stop signal arrives. A dispatch already in flight is
    /// awaited and recorded before the loop observes the signal.
    pub(super) async fn run(mut self, mut shutdown_rx: ShutdownReceiver) {
        let mut iteration: u64 = 0;
        debug!("Virtual user {} started", self.id);
        loop {
            if stop_requested(&mut shutdown_rx) {
                break;
            }

            let send = self.policy.decide_to_send(self.config.probability());
            trace!(user = self.id, iteration, send, "Send decision");
            if send {
                self.dispatch_once(iteration).await;
            } else {
                UserCounters::bump(&self.counters.skipped);
            }
            UserCounters::bump(&self.counters.iterations);

            let units = self.policy.pick_sleep_interval(self.config.sleep_range());
            debug!(
                user = self.id,
                iteration,
                sleep_units = units,
                "Virtual user iteration finished"
            );
            iteration = iteration.saturating_add(1);

            if units == 0 {
                tokio::task::yield_now().await;
                continue;
            }
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                () = sleep(self.config.pause_for(units)) => {}
            }
        }
        debug!("Virtual user {} stopped after {} iterations", self.id, iteration);
    }

    /// A panicking dispatcher becomes a failed outcome and a panicking sink
    /// loses that one record; neither ends the loop.
    async fn dispatch_once(&mut self, iteration: u64) {
        let context = DispatchContext {
            user_id: self.id,
            iteration,
        };
        let started = Instant::now();
        let result = AssertUnwindSafe(self.dispatcher.send(self.config.target(), context))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(DispatchError::Transport {
                    message: format!("dispatcher panicked: {}", panic_message(payload.as_ref())),
                })
            });
        let outcome = Outcome::new(context, started.elapsed(), result);
        self.counters.record(&outcome);

        let sink = &self.sink;
        let recorded = std::panic::catch_unwind(AssertUnwindSafe(|| sink.record(&outcome)));
        if let Err(payload) = recorded {
            self.sink_panics = self.sink_panics.saturating_add(1);
            if self.sink_panics == 1 {
                warn!(
                    user = self.id,
                    iteration,
                    "Metrics sink panicked, record dropped: {}",
                    panic_message(payload.as_ref())
                );
            } else {
                debug!(user = self.id, iteration, "Metrics sink panicked again");
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

/// A closed or lagged channel also means the run is over.
fn stop_requested(shutdown_rx: &mut ShutdownReceiver) -> bool {
    match shutdown_rx.try_recv() {
        Err(TryRecvError::Empty) => false,
        Ok(()) | Err(TryRecvError::Closed | TryRecvError::Lagged(_)) => true,
    }
}
