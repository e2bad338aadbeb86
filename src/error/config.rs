use super::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Invalid header: {source}")]
    InvalidHeader {
        #[source]
        source: ValidationError,
    },
    #[error("Invalid duration for '{field}': {source}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: ValidationError,
    },
    #[error("User count must be >= 1.")]
    UserCountZero,
    #[error("Run duration must be > 0.")]
    DurationZero,
    #[error("Request probability must be within [0, 1], got {value}.")]
    ProbabilityOutOfRange { value: f64 },
    #[error("sleep_min ({min}) must be <= sleep_max ({max}).")]
    SleepRangeInverted { min: u32, max: u32 },
    #[error("Sleep unit must be > 0.")]
    SleepUnitZero,
    #[error("Missing request target (set --url or provide url in config).")]
    MissingTarget,
    #[error("Invalid target URL '{url}': {source}")]
    InvalidTargetUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Target URL '{url}' is missing a host.")]
    TargetUrlMissingHost { url: String },
    #[error("Unsupported target scheme '{scheme}'. Use http or https.")]
    UnsupportedTargetScheme { scheme: String },
}
