//! Configuration loading and application.
mod apply;
mod loader;
mod parse;
mod resolve;
pub mod types;


pub use apply::apply_config;
pub use loader::{load_config, load_config_file};
pub use resolve::resolve_run_config;
