use std::time::Duration;

use papertrade_core::BackoffConfig;
use rand::Rng;

/// Add up to `jitter_percent` percent of random jitter to `base_ms`.
///
/// The result is always in `[base_ms, base_ms + base_ms * jitter_percent / 100]`.
#[must_use]
pub fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    if jitter_percent == 0 || base_ms == 0 {
        return base_ms;
    }
    let span = base_ms.saturating_mul(u64::from(jitter_percent)) / 100;
    let mut rng = rand::rng();
    base_ms.saturating_add(rng.random_range(0..=span))
}

/// Delay to sleep after failed attempt number `failed_attempt` (1-based).
///
/// Grows as `min_backoff_ms * factor^(failed_attempt - 1)`, capped at `max_backoff_ms`,
/// then jittered.
#[must_use]
pub fn retry_delay(cfg: &BackoffConfig, failed_attempt: u32) -> Duration {
    let exp = failed_attempt.saturating_sub(1);
    let growth = u64::from(cfg.factor.max(1)).saturating_pow(exp);
    let base = cfg
        .min_backoff_ms
        .saturating_mul(growth)
        .min(cfg.max_backoff_ms);
    Duration::from_millis(jitter_wait(base, u32::from(cfg.jitter_percent)))
}
