use serde::Deserialize;

use crate::args::{HttpMethod, OutputFormat};

/// Run settings read from `stochast.toml` / `stochast.json`. Every field is
/// optional; values given on the command line win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "concurrency", alias = "vus")]
    pub users: Option<usize>,
    pub duration: Option<DurationValue>,
    pub probability: Option<f64>,
    pub sleep_min: Option<u32>,
    pub sleep_max: Option<u32>,
    pub sleep_unit: Option<DurationValue>,
    #[serde(alias = "grace_period")]
    pub grace: Option<DurationValue>,
    pub seed: Option<u64>,
    pub method: Option<HttpMethod>,
    pub url: Option<String>,
    pub headers: Option<Vec<String>>,
    pub data: Option<String>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub status: Option<u16>,
    pub output: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub no_ua: Option<bool>,
    pub no_color: Option<bool>,
}

/// Integer seconds or a string with an `ms`/`s`/`m`/`h` suffix.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}
