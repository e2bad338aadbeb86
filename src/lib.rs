//! Core library for the `stochast` CLI.
//!
//! The [`engine`] runs a fixed pool of virtual users that each decide at
//! random whether to send a request, then sleep a random interval, until a
//! global deadline stops them. Transport and metrics are plugged in through
//! the [`engine::Dispatcher`] and [`engine::MetricsSink`] traits; [`http`]
//! and [`metrics`] provide the implementations the binary uses.
pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod metrics;
pub mod report;
pub mod shutdown;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
