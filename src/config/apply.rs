use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{LoadArgs, PositiveUsize, parse_header};
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. A value given on the
/// command line is never overridden.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    apply_run(args, matches, config)?;
    apply_request(args, matches, config)?;
    apply_output(args, matches, config);
    Ok(())
}

fn apply_run(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "users")
        && let Some(users) = config.users
    {
        args.users = PositiveUsize::try_from(users).map_err(|_err| ConfigError::UserCountZero)?;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = duration.to_duration("duration")?;
    }

    if !is_cli(matches, "probability")
        && let Some(probability) = config.probability
    {
        args.probability = probability;
    }

    if !is_cli(matches, "sleep_min")
        && let Some(sleep_min) = config.sleep_min
    {
        args.sleep_min = sleep_min;
    }

    if !is_cli(matches, "sleep_max")
        && let Some(sleep_max) = config.sleep_max
    {
        args.sleep_max = sleep_max;
    }

    if !is_cli(matches, "sleep_unit")
        && let Some(sleep_unit) = config.sleep_unit.as_ref()
    {
        args.sleep_unit = sleep_unit.to_duration("sleep_unit")?;
    }

    if !is_cli(matches, "grace")
        && let Some(grace) = config.grace.as_ref()
    {
        args.grace = grace.to_duration_allow_zero("grace")?;
    }

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    Ok(())
}

fn apply_request(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            parsed.push(
                parse_header(header).map_err(|err| ConfigError::InvalidHeader { source: err })?,
            );
        }
        args.headers = parsed;
    }

    if !is_cli(matches, "data")
        && let Some(data) = config.data.clone()
    {
        args.data = data;
    }

    if !is_cli(matches, "status")
        && let Some(status) = config.status
    {
        args.status = status;
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = timeout.to_duration("timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout.to_duration("connect_timeout")?;
    }

    if !is_cli(matches, "no_ua")
        && let Some(no_ua) = config.no_ua
    {
        args.no_ua = no_ua;
    }

    Ok(())
}

fn apply_output(args: &mut LoadArgs, matches: &ArgMatches, config: &ConfigFile) {
    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "no_color")
        && matches.value_source("no_color") != Some(ValueSource::EnvVariable)
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
