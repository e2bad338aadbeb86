use std::num::NonZeroUsize;
use std::time::Duration;

use url::Url;

use crate::args::HttpMethod;
use crate::error::ConfigError;

/// Chance that a virtual user sends on a given iteration.
pub const DEFAULT_PROBABILITY: f64 = 0.6;
/// Lower bound of the per-iteration pause, in sleep units.
pub const DEFAULT_SLEEP_MIN: u32 = 1;
/// Upper bound of the per-iteration pause, in sleep units.
pub const DEFAULT_SLEEP_MAX: u32 = 5;
/// Wall-clock length of one sleep unit.
pub const DEFAULT_SLEEP_UNIT: Duration = Duration::from_secs(1);
/// Time allowed after the deadline for in-flight dispatches to settle.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// A probability in `[0, 1]`. NaN is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probability(f64);

impl Probability {
    pub const NEVER: Self = Self(0.0);
    pub const ALWAYS: Self = Self(1.0);

    /// # Errors
    ///
    /// Returns [`ConfigError::ProbabilityOutOfRange`] when `value` is NaN or
    /// outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::ProbabilityOutOfRange { value })
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Inclusive range of sleep units, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRange {
    min: u32,
    max: u32,
}

impl SleepRange {
    /// # Errors
    ///
    /// Returns [`ConfigError::SleepRangeInverted`] when `min > max`.
    pub const fn new(min: u32, max: u32) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::SleepRangeInverted { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn fixed(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    #[must_use]
    pub const fn min(self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }
}

/// What every dispatch sends. Values may carry template placeholders that
/// the transport renders per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RequestTarget {
    /// Builds a target after checking that the URL is absolute http(s) with a
    /// host. Placeholders are only allowed in the path and query.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the URL does not parse, has no host, or
    /// uses a scheme other than http/https.
    pub fn new(url: &str, method: HttpMethod) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|err| ConfigError::InvalidTargetUrl {
            url: url.to_owned(),
            source: err,
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::UnsupportedTargetScheme {
                    scheme: other.to_owned(),
                });
            }
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::TargetUrlMissingHost {
                url: url.to_owned(),
            });
        }
        Ok(Self {
            url: url.to_owned(),
            method,
            headers: Vec::new(),
            body: String::new(),
        })
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: String) -> Self {
        self.body = body;
        self
    }
}

/// Immutable, validated configuration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    user_count: NonZeroUsize,
    duration: Duration,
    probability: Probability,
    sleep_range: SleepRange,
    sleep_unit: Duration,
    grace_period: Duration,
    seed: Option<u64>,
    target: RequestTarget,
}

impl RunConfig {
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    #[must_use]
    pub const fn user_count(&self) -> usize {
        self.user_count.get()
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn probability(&self) -> Probability {
        self.probability
    }

    #[must_use]
    pub const fn sleep_range(&self) -> SleepRange {
        self.sleep_range
    }

    #[must_use]
    pub const fn sleep_unit(&self) -> Duration {
        self.sleep_unit
    }

    #[must_use]
    pub const fn grace_period(&self) -> Duration {
        self.grace_period
    }

    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[must_use]
    pub const fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// Wall-clock pause for a number of sleep units, saturating at
    /// [`Duration::MAX`].
    #[must_use]
    pub const fn pause_for(&self, units: u32) -> Duration {
        self.sleep_unit.saturating_mul(units)
    }
}

/// Collects raw run settings; [`RunConfigBuilder::build`] validates all of
/// them at once.
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    user_count: usize,
    duration: Duration,
    probability: f64,
    sleep_min: u32,
    sleep_max: u32,
    sleep_unit: Duration,
    grace_period: Duration,
    seed: Option<u64>,
    target: Option<RequestTarget>,
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self {
            user_count: 1,
            duration: Duration::from_secs(60),
            probability: DEFAULT_PROBABILITY,
            sleep_min: DEFAULT_SLEEP_MIN,
            sleep_max: DEFAULT_SLEEP_MAX,
            sleep_unit: DEFAULT_SLEEP_UNIT,
            grace_period: DEFAULT_GRACE_PERIOD,
            seed: None,
            target: None,
        }
    }
}

impl RunConfigBuilder {
    #[must_use]
    pub const fn user_count(mut self, user_count: usize) -> Self {
        self.user_count = user_count;
        self
    }

    #[must_use]
    pub const fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub const fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    #[must_use]
    pub const fn sleep_range(mut self, min: u32, max: u32) -> Self {
        self.sleep_min = min;
        self.sleep_max = max;
        self
    }

    #[must_use]
    pub const fn sleep_unit(mut self, sleep_unit: Duration) -> Self {
        self.sleep_unit = sleep_unit;
        self
    }

    #[must_use]
    pub const fn grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    #[must_use]
    pub const fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn target(mut self, target: RequestTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a zero user count or duration, a
    /// probability outside `[0, 1]`, an inverted sleep range, a zero sleep
    /// unit, or a missing target.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let user_count = NonZeroUsize::new(self.user_count).ok_or(ConfigError::UserCountZero)?;
        if self.duration.is_zero() {
            return Err(ConfigError::DurationZero);
        }
        let probability = Probability::new(self.probability)?;
        let sleep_range = SleepRange::new(self.sleep_min, self.sleep_max)?;
        if self.sleep_unit.is_zero() {
            return Err(ConfigError::SleepUnitZero);
        }
        let target = self.target.ok_or(ConfigError::MissingTarget)?;

        Ok(RunConfig {
            user_count,
            duration: self.duration,
            probability,
            sleep_range,
            sleep_unit: self.sleep_unit,
            grace_period: self.grace_period,
            seed: self.seed,
            target,
        })
    }
}
