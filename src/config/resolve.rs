use crate::args::LoadArgs;
use crate::engine::{RequestTarget, RunConfig};
use crate::error::ConfigError;

/// Turns merged CLI and file settings into a validated [`RunConfig`].
///
/// # Errors
///
/// Returns a [`ConfigError`] for a missing or malformed target URL and for
/// every run setting [`RunConfig::builder`] rejects.
pub fn resolve_run_config(args: &LoadArgs) -> Result<RunConfig, ConfigError> {
    let url = args.url.as_deref().ok_or(ConfigError::MissingTarget)?;
    let target = RequestTarget::new(url, args.method)?
        .with_headers(args.headers.clone())
        .with_body(args.data.clone());

    RunConfig::builder()
        .user_count(args.users.get())
        .duration(args.duration)
        .probability(args.probability)
        .sleep_range(args.sleep_min, args.sleep_max)
        .sleep_unit(args.sleep_unit)
        .grace_period(args.grace)
        .seed(args.seed)
        .target(target)
        .build()
}
