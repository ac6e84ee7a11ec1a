//! Exponential backoff bounded by an elapsed-time window.

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use super::RefreshConfig;

/// Computes retry delays for one failing scheduler tick.
///
/// Each delay grows by `multiplier` up to `max_interval`, with optional
/// jitter. Once the time since [`ExponentialBackoff::new`] plus the next delay
/// would exceed `max_elapsed`, [`ExponentialBackoff::next_delay`] returns
/// `None`. Elapsed time is read from the tokio clock.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    current: Duration,
    max_interval: Duration,
    max_elapsed: Duration,
    multiplier: f64,
    randomization_factor: f64,
    started: Instant,
}

impl ExponentialBackoff {
    /// Starts a backoff sequence now.
    pub fn new(config: &RefreshConfig) -> Self {
        Self {
            current: config.initial_interval,
            max_interval: config.max_interval,
            max_elapsed: config.max_elapsed,
            multiplier: config.multiplier,
            randomization_factor: config.randomization_factor,
            started: Instant::now(),
        }
    }

    /// Returns the time spent since the sequence started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns the next delay, or `None` once the retry window is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let delay = self.jittered(self.current);
        let deadline = self.elapsed().checked_add(delay);
        if deadline.is_none_or(|t| t > self.max_elapsed) {
            return None;
        }

        let grown = self.current.as_secs_f64() * self.multiplier.max(1.0);
        let grown = Duration::try_from_secs_f64(grown).unwrap_or(self.max_interval);
        self.current = grown.min(self.max_interval);
        Some(delay)
    }

    fn jittered(&self, interval: Duration) -> Duration {
        if self.randomization_factor.is_nan() || self.randomization_factor <= 0.0 {
            return interval;
        }
        let delta = interval.as_secs_f64() * self.randomization_factor.min(1.0);
        let low = interval.as_secs_f64() - delta;
        let high = interval.as_secs_f64() + delta;
        Duration::try_from_secs_f64(rand::rng().random_range(low..=high).max(0.0))
            .unwrap_or(interval)
    }
}
