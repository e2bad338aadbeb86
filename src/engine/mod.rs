//! Virtual-user execution engine.
//!
//! A [`Scheduler`] starts a fixed pool of independent virtual users. Each
//! user loops on its own tokio task: it asks its [`RandomPolicy`] whether to
//! send, optionally calls the [`Dispatcher`], reports the [`Outcome`] to the
//! [`MetricsSink`], then sleeps a randomized interval. A single deadline stops
//! every user; stragglers get a bounded grace period before being abandoned.
mod dispatch;
mod outcome;
mod policy;
mod run_config;
mod scheduler;
mod state;
mod summary;
mod user;


pub use dispatch::{Dispatcher, MetricsSink};
pub use outcome::{DispatchContext, DispatchResult, Outcome};
pub use policy::{
    EntropyPolicySource, PolicySource, RandomPolicy, UniformPolicy, decide_to_send,
    pick_sleep_interval,
};
pub use run_config::{
    DEFAULT_GRACE_PERIOD, DEFAULT_PROBABILITY, DEFAULT_SLEEP_MAX, DEFAULT_SLEEP_MIN,
    DEFAULT_SLEEP_UNIT, Probability, RequestTarget, RunConfig, RunConfigBuilder, SleepRange,
};
pub use scheduler::{RunHandle, Scheduler};
pub use state::RunState;
pub use summary::RunSummary;
