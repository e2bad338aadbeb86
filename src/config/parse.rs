use std::time::Duration;

use crate::args::{parse_duration_value, parse_grace_value};
use crate::error::{ConfigError, ValidationError};

use super::types::DurationValue;

impl DurationValue {
    /// Resolves a positive duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] naming `field` when the value
    /// is malformed or zero.
    pub fn to_duration(&self, field: &'static str) -> Result<Duration, ConfigError> {
        let parsed = match self {
            Self::Seconds(0) => Err(ValidationError::DurationZero),
            Self::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            Self::Text(text) => parse_duration_value(text),
        };
        parsed.map_err(|err| ConfigError::InvalidDuration { field, source: err })
    }

    /// Resolves a duration that may be zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] naming `field` when the value
    /// is malformed.
    pub fn to_duration_allow_zero(&self, field: &'static str) -> Result<Duration, ConfigError> {
        match self {
            Self::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            Self::Text(text) => parse_grace_value(text)
                .map_err(|err| ConfigError::InvalidDuration { field, source: err }),
        }
    }
}
