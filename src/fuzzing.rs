use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::args::{HttpMethod, LoadArgs, parse_duration_value, parse_header};
use crate::config::types::ConfigFile;
use crate::config::{apply_config, resolve_run_config};
use crate::engine::{RequestTarget, RunConfig, SleepRange, pick_sleep_interval};
use crate::error::{AppError, AppResult};
use crate::http::{TemplateVars, render_template};

thread_local! {
    static BASE_MATCHES: ArgMatches = LoadArgs::command().get_matches_from(["stochast"]);
}

/// Parses a header string in `Key: Value` format.
///
/// # Errors
///
/// Returns an error when the header is malformed.
pub fn parse_header_input(input: &str) -> AppResult<(String, String)> {
    parse_header(input).map_err(AppError::validation)
}

/// Parses a duration value (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_value_input(input: &str) -> AppResult<Duration> {
    parse_duration_value(input).map_err(AppError::validation)
}

/// Renders a template with fixed variables and a seeded generator.
#[must_use]
pub fn render_template_input(input: &str, seed: u64) -> String {
    let vars = TemplateVars {
        user: 1,
        iteration: seed,
        timestamp_ms: 0,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    render_template(input, &vars, &mut rng)
}

/// Applies a parsed config file on top of default arguments and resolves the
/// run configuration.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config_input(config: &ConfigFile) -> AppResult<RunConfig> {
    BASE_MATCHES.with(|matches| {
        let mut args = LoadArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        Ok(resolve_run_config(&args)?)
    })
}

/// Feeds raw run settings through the builder and, when they validate, draws
/// a sleep interval from the resulting range.
///
/// # Errors
///
/// Returns an error when the builder rejects the settings.
pub fn build_run_config_input(
    users: usize,
    duration_ms: u64,
    probability: f64,
    sleep: (u32, u32),
    seed: u64,
) -> AppResult<u32> {
    let target = RequestTarget::new("http://localhost/", HttpMethod::Get)?;
    let config = RunConfig::builder()
        .user_count(users)
        .duration(Duration::from_millis(duration_ms))
        .probability(probability)
        .sleep_range(sleep.0, sleep.1)
        .seed(Some(seed))
        .target(target)
        .build()?;
    let range: SleepRange = config.sleep_range();
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(pick_sleep_interval(&mut rng, range))
}

/// Loads a config file from disk to exercise extension handling.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config_file_input(path: &std::path::Path) -> AppResult<()> {
    crate::config::load_config_file(path)
        .map(|_| ())
        .map_err(AppError::config)
}
