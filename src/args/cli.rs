use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_bool_env, parse_duration_value, parse_grace_value, parse_header, parse_positive_usize,
    parse_probability,
};
use super::types::{HttpMethod, OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Stochastic HTTP load generator - independent virtual users that randomly send or skip requests and sleep randomized intervals until a global deadline."
)]
pub struct LoadArgs {
    /// Number of concurrent virtual users
    #[arg(
        long = "users",
        short = 'c',
        default_value = "50",
        value_parser = parse_positive_usize
    )]
    pub users: PositiveUsize,

    /// Run duration (supports ms/s/m/h)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "60s",
        value_parser = parse_duration_value
    )]
    pub duration: Duration,

    /// Chance that a virtual user sends on each iteration (0 to 1)
    #[arg(
        long = "probability",
        short = 'p',
        default_value = "0.6",
        value_parser = parse_probability
    )]
    pub probability: f64,

    /// Minimum pause between iterations, in sleep units
    #[arg(long = "sleep-min", default_value = "1")]
    pub sleep_min: u32,

    /// Maximum pause between iterations, in sleep units
    #[arg(long = "sleep-max", default_value = "5")]
    pub sleep_max: u32,

    /// Length of one sleep unit (supports ms/s/m/h)
    #[arg(
        long = "sleep-unit",
        default_value = "1s",
        value_parser = parse_duration_value
    )]
    pub sleep_unit: Duration,

    /// Time allowed after the deadline for in-flight requests to finish
    #[arg(long = "grace", default_value = "5s", value_parser = parse_grace_value)]
    pub grace: Duration,

    /// Seed for reproducible send/sleep decisions
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Target URL; may contain {{user}}, {{iteration}}, {{timestamp_ms}} and {{rand:MIN-MAX}}
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long, short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body data (for POST/PUT)
    #[arg(long, short, default_value = "")]
    pub data: String,

    /// Expected HTTP status code
    #[arg(long = "status", short = 's', default_value = "200")]
    pub status: u16,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_value
    )]
    pub timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_value
    )]
    pub connect_timeout: Duration,

    /// Append one JSON line per request attempt to this file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Summary output format
    #[arg(long = "output-format", default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Disable the default User-Agent header (stochast/<version>)
    #[arg(long = "no-ua")]
    pub no_ua: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by STOCHAST_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./stochast.toml or ./stochast.json if present.
    #[arg(long)]
    pub config: Option<String>,
}
