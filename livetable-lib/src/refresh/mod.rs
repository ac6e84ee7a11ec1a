//! Polling cadence and retry configuration.

mod backoff;
mod config;

pub use backoff::ExponentialBackoff;
pub use config::RefreshConfig;
