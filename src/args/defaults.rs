pub(crate) const DEFAULT_USER_AGENT: &str = concat!("stochast/", env!("CARGO_PKG_VERSION"));

/// Config filenames checked, in order, when `--config` is not given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["stochast.toml", "stochast.json"];
