use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use papertrade_core::{
    BackoffConfig, BatchAttempts, DataKind, InstrumentConnector, PaperTradeError, RequestFlags,
    ServiceConfig,
};
use tokio::sync::Semaphore;

/// Aggregation service that fetches instrument data through one upstream connector.
///
/// Holds no per-request state: every operation takes its flags explicitly, so a
/// single instance is shared (via `Arc`) across all concurrent requests.
pub struct PaperTrade {
    pub(crate) connector: Arc<dyn InstrumentConnector>,
    pub(crate) cfg: ServiceConfig,
    pub(crate) fetch_permits: Arc<Semaphore>,
}

/// Builder for constructing a `PaperTrade` service with custom configuration.
pub struct PaperTradeBuilder {
    connector: Option<Arc<dyn InstrumentConnector>>,
    cfg: ServiceConfig,
}

impl Default for PaperTradeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PaperTradeBuilder {
    /// Create a new builder with the default `ServiceConfig`.
    ///
    /// Defaults to a single attempt per kind and per batch symbol, with no backoff
    /// and no batch deadline. Fan-out is capped at 8 concurrent provider calls.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: ServiceConfig::default(),
        }
    }

    /// Register the upstream connector. Replaces any previously registered one.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn InstrumentConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub fn config(mut self, cfg: ServiceConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Attempts per kind when a request does not carry a try count.
    #[must_use]
    pub const fn default_max_attempts(mut self, attempts: u32) -> Self {
        self.cfg.default_max_attempts = attempts;
        self
    }

    /// Upper bound for client-supplied try counts; larger values are clamped.
    #[must_use]
    pub const fn max_attempts_cap(mut self, cap: u32) -> Self {
        self.cfg.max_attempts_cap = cap;
        self
    }

    /// Attempt policy for batch requests.
    ///
    /// `Fixed(n)` ignores the request's try count (bounded batch latency);
    /// `FromRequest` honors it the same way the single-symbol path does.
    #[must_use]
    pub const fn batch_attempts(mut self, policy: BatchAttempts) -> Self {
        self.cfg.batch_attempts = policy;
        self
    }

    /// Maximum provider calls in flight across every request served by this instance.
    #[must_use]
    pub const fn max_concurrent_fetches(mut self, n: usize) -> Self {
        self.cfg.max_concurrent_fetches = n;
        self
    }

    /// Timeout for a single provider call. A timed-out call counts as a failed attempt.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Deadline for a whole batch. Units still running when it elapses are dropped.
    #[must_use]
    pub const fn batch_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.batch_timeout = Some(timeout);
        self
    }

    /// Sleep between attempts using exponential backoff with jitter.
    #[must_use]
    pub const fn retry_backoff(mut self, cfg: BackoffConfig) -> Self {
        self.cfg.retry_backoff = Some(cfg);
        self
    }

    /// Build the `PaperTrade` service.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connector was registered or the configuration
    /// has a zero attempt count, a zero concurrency bound, or an inconsistent backoff.
    pub fn build(self) -> Result<PaperTrade, PaperTradeError> {
        let Some(connector) = self.connector else {
            return Err(PaperTradeError::invalid_arg(
                "no connector registered; add one via with_connector(...)",
            ));
        };
        let cfg = self.cfg;

        if cfg.default_max_attempts == 0 {
            return Err(PaperTradeError::invalid_arg(
                "default_max_attempts must be at least 1",
            ));
        }
        if cfg.max_attempts_cap < cfg.default_max_attempts {
            return Err(PaperTradeError::invalid_arg(format!(
                "max_attempts_cap ({}) is below default_max_attempts ({})",
                cfg.max_attempts_cap, cfg.default_max_attempts
            )));
        }
        if cfg.batch_attempts == BatchAttempts::Fixed(0) {
            return Err(PaperTradeError::invalid_arg(
                "batch attempts must be at least 1",
            ));
        }
        if cfg.max_concurrent_fetches == 0 {
            return Err(PaperTradeError::invalid_arg(
                "max_concurrent_fetches must be at least 1",
            ));
        }
        if let Some(b) = cfg.retry_backoff
            && (b.factor == 0 || b.jitter_percent > 100 || b.min_backoff_ms > b.max_backoff_ms)
        {
            return Err(PaperTradeError::invalid_arg(format!(
                "invalid retry backoff: {b:?}"
            )));
        }

        let fetch_permits = Arc::new(Semaphore::new(cfg.max_concurrent_fetches));
        Ok(PaperTrade {
            connector,
            cfg,
            fetch_permits,
        })
    }
}

impl PaperTrade {
    /// Start building a new `PaperTrade` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let service = papertrade::PaperTrade::builder()
    ///     .with_connector(Arc::new(papertrade_mock::MockConnector::new()))
    ///     .max_concurrent_fetches(4)
    ///     .provider_timeout(Duration::from_secs(2))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> PaperTradeBuilder {
        PaperTradeBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.cfg
    }

    /// Name of the registered upstream connector.
    #[must_use]
    pub fn connector_name(&self) -> &'static str {
        self.connector.name()
    }

    /// Build request flags from client input, applying the default and the cap.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `tries` is `Some(0)`.
    pub fn flags(
        &self,
        want_summary: bool,
        want_statistics: bool,
        tries: Option<u32>,
    ) -> Result<RequestFlags, PaperTradeError> {
        let requested = tries.unwrap_or(self.cfg.default_max_attempts);
        if requested == 0 {
            return Err(PaperTradeError::invalid_arg("tries must be at least 1"));
        }
        let attempts = requested.min(self.cfg.max_attempts_cap);
        #[cfg(feature = "tracing")]
        if attempts < requested {
            tracing::debug!(
                target: "papertrade::core",
                requested,
                cap = self.cfg.max_attempts_cap,
                "clamped client try count"
            );
        }
        RequestFlags::new(want_summary, want_statistics).with_max_attempts(attempts)
    }

    /// Apply the batch attempt policy to request flags.
    #[must_use]
    pub fn batch_flags(&self, flags: RequestFlags) -> RequestFlags {
        match self.cfg.batch_attempts {
            BatchAttempts::FromRequest => flags,
            BatchAttempts::Fixed(n) => RequestFlags {
                max_attempts: NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN),
                ..flags
            },
        }
    }

    /// Run one provider future under the fetch limiter and the per-call timeout.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "papertrade::core::provider_call",
            skip(self, fut, kind),
            fields(connector = self.connector.name(), kind = %kind),
        )
    )]
    pub(crate) async fn provider_call<T, Fut>(
        &self,
        kind: DataKind,
        fut: Fut,
    ) -> Result<T, PaperTradeError>
    where
        Fut: core::future::Future<Output = Result<T, PaperTradeError>>,
    {
        let _permit = self
            .fetch_permits
            .acquire()
            .await
            .map_err(|_| PaperTradeError::Other("fetch limiter closed".into()))?;
        (tokio::time::timeout(self.cfg.provider_timeout, fut).await)
            .unwrap_or_else(|_| Err(PaperTradeError::provider_timeout(self.connector.name(), kind)))
    }
}
