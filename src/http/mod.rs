//! reqwest-backed request dispatch.
mod client;
mod dispatcher;
mod execution;
mod template;


pub use client::{HttpSettings, build_client, validate_headers};
pub use dispatcher::HttpDispatcher;
pub use template::{TemplateVars, render_template};
