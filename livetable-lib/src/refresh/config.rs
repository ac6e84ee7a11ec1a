//! Refresh configuration for table model schedulers.

use std::time::Duration;

/// Controls how often a table model polls and how it retries failures.
///
/// The first scheduler tick fires after `initial_interval` so a view paints
/// quickly; later ticks wait `refresh_rate`. A failing tick is retried with
/// exponentially growing delays starting at `initial_interval` until
/// `max_elapsed` is spent.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use livetable_lib::refresh::RefreshConfig;
///
/// let config = RefreshConfig::default()
///     .refresh_rate(Duration::from_secs(5))
///     .max_elapsed(Duration::from_secs(30));
///
/// assert_eq!(config.initial_interval, Duration::from_millis(300));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    /// Warm-up delay before the first tick, and the first retry delay.
    pub initial_interval: Duration,
    /// Delay between ticks after the first one.
    pub refresh_rate: Duration,
    /// Retry window for a failing tick.
    pub max_elapsed: Duration,
    /// Upper bound for a single retry delay.
    pub max_interval: Duration,
    /// Growth factor applied to the retry delay after each attempt.
    pub multiplier: f64,
    /// Jitter applied to each retry delay, as a fraction of the delay.
    pub randomization_factor: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(300),
            refresh_rate: Duration::from_secs(2),
            max_elapsed: Duration::from_secs(150),
            max_interval: Duration::from_secs(60),
            multiplier: 1.5,
            randomization_factor: 0.5,
        }
    }
}

impl RefreshConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a default config without retry jitter.
    pub fn no_jitter() -> Self {
        Self {
            randomization_factor: 0.0,
            ..Default::default()
        }
    }

    /// Sets the warm-up delay and first retry delay.
    pub fn initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Sets the delay between ticks.
    pub fn refresh_rate(mut self, rate: Duration) -> Self {
        self.refresh_rate = rate;
        self
    }

    /// Sets the retry window.
    pub fn max_elapsed(mut self, window: Duration) -> Self {
        self.max_elapsed = window;
        self
    }

    /// Sets the upper bound for a single retry delay.
    pub fn max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Sets the retry delay growth factor.
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the retry jitter fraction, clamped to `0.0..=1.0`.
    pub fn randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor.clamp(0.0, 1.0);
        self
    }
}
