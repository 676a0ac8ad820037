//! Configuration types for the aggregation service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How many attempts each symbol in a batch gets per requested kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAttempts {
    /// Every batch symbol gets exactly this many attempts, regardless of the request.
    Fixed(u32),
    /// Honor the attempt budget carried by the request flags.
    FromRequest,
}

impl Default for BatchAttempts {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

/// Exponential backoff between fetch attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Delay before the second attempt, in milliseconds.
    pub min_backoff_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_backoff_ms: u64,
    /// Multiplier applied after each failed attempt (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 100,
            max_backoff_ms: 2_000,
            factor: 2,
            jitter_percent: 20,
        }
    }
}

/// Global configuration for the `PaperTrade` service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Attempts used when a request does not specify a try count.
    pub default_max_attempts: u32,
    /// Upper bound applied to client-supplied try counts.
    pub max_attempts_cap: u32,
    /// Attempt policy for batch requests.
    pub batch_attempts: BatchAttempts,
    /// Maximum provider calls in flight across the whole service.
    pub max_concurrent_fetches: usize,
    /// Timeout for an individual provider call; a timed-out call is a failed attempt.
    pub provider_timeout: Duration,
    /// Optional deadline for a whole batch; units still running are abandoned.
    pub batch_timeout: Option<Duration>,
    /// Optional delay between attempts. `None` retries immediately.
    pub retry_backoff: Option<BackoffConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_max_attempts: 1,
            max_attempts_cap: 10,
            batch_attempts: BatchAttempts::default(),
            max_concurrent_fetches: 8,
            provider_timeout: Duration::from_secs(5),
            batch_timeout: None,
            retry_backoff: None,
        }
    }
}
