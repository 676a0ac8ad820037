//! Server configuration, loaded from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `PAPERTRADE_HOST` | `0.0.0.0` |
//! | `PAPERTRADE_PORT` | `8080` |
//! | `PAPERTRADE_PROVIDER` | `yahoo` (`yahoo` or `mock`) |
//! | `PAPERTRADE_MAX_CONCURRENT_FETCHES` | `8` |
//! | `PAPERTRADE_PROVIDER_TIMEOUT_MS` | `5000` |
//! | `PAPERTRADE_BATCH_TIMEOUT_MS` | unset (no deadline) |
//! | `PAPERTRADE_DEFAULT_TRIES` | `1` |
//! | `PAPERTRADE_MAX_TRIES` | `10` |
//! | `PAPERTRADE_BATCH_TRIES` | `1` (`request` or an integer) |
//! | `PAPERTRADE_RETRY_BACKOFF_MS` | unset (no backoff) |
//! | `PAPERTRADE_YAHOO_BASE_URL` | public Yahoo host |
//!
//! Unparseable numeric values fall back to their defaults.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use papertrade::{
    BackoffConfig, BatchAttempts, InstrumentConnector, PaperTrade, PaperTradeError, ServiceConfig,
};
use papertrade_mock::MockConnector;
use papertrade_yahoo::YahooConnector;

/// Upstream provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Yahoo Finance `quoteSummary`.
    #[default]
    Yahoo,
    /// Deterministic fixtures.
    Mock,
}

impl ProviderKind {
    /// Parse a provider name, case-insensitively.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidProvider` for unknown names.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "mock" => Ok(Self::Mock),
            _ => Err(ConfigError::InvalidProvider(s.to_string())),
        }
    }

    /// Name as accepted by [`parse`](Self::parse).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Mock => "mock",
        }
    }
}

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Upstream provider.
    pub provider: ProviderKind,
    /// Custom Yahoo base URL (test servers, mirrors).
    pub yahoo_base_url: Option<String>,
    /// Engine configuration.
    pub service: ServiceConfig,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            provider: ProviderKind::default(),
            yahoo_base_url: None,
            service: ServiceConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Unknown provider name.
    #[error("unknown provider {0:?} (expected \"yahoo\" or \"mock\")")]
    InvalidProvider(String),
    /// Host and port do not form a socket address.
    #[error("invalid bind address {0}")]
    InvalidAddress(String),
    /// The engine rejected the configuration or the connector failed to initialize.
    #[error(transparent)]
    Service(#[from] PaperTradeError),
}

impl ServerSettings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidProvider` for an unknown `PAPERTRADE_PROVIDER`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidProvider` for an unknown provider name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let defaults = Self::default();
        let d = &defaults.service;

        let provider = match env.get("PAPERTRADE_PROVIDER") {
            Some(v) => ProviderKind::parse(&v)?,
            None => ProviderKind::default(),
        };

        let batch_attempts = env
            .get("PAPERTRADE_BATCH_TRIES")
            .and_then(|v| parse_batch_attempts(&v))
            .unwrap_or(d.batch_attempts);

        let retry_backoff = env
            .parse::<u64>("PAPERTRADE_RETRY_BACKOFF_MS")
            .filter(|ms| *ms > 0)
            .map(|ms| {
                let base = BackoffConfig::default();
                BackoffConfig {
                    min_backoff_ms: ms,
                    max_backoff_ms: base.max_backoff_ms.max(ms),
                    ..base
                }
            });

        let service = ServiceConfig {
            default_max_attempts: env
                .parse("PAPERTRADE_DEFAULT_TRIES")
                .unwrap_or(d.default_max_attempts),
            max_attempts_cap: env
                .parse("PAPERTRADE_MAX_TRIES")
                .unwrap_or(d.max_attempts_cap),
            batch_attempts,
            max_concurrent_fetches: env
                .parse("PAPERTRADE_MAX_CONCURRENT_FETCHES")
                .unwrap_or(d.max_concurrent_fetches),
            provider_timeout: env
                .parse::<u64>("PAPERTRADE_PROVIDER_TIMEOUT_MS")
                .map_or(d.provider_timeout, Duration::from_millis),
            batch_timeout: env
                .parse::<u64>("PAPERTRADE_BATCH_TIMEOUT_MS")
                .map(Duration::from_millis)
                .or(d.batch_timeout),
            retry_backoff,
        };

        Ok(Self {
            host: env.get("PAPERTRADE_HOST").unwrap_or(defaults.host),
            port: env.parse("PAPERTRADE_PORT").unwrap_or(defaults.port),
            provider,
            yahoo_base_url: env.get("PAPERTRADE_YAHOO_BASE_URL"),
            service,
        })
    }

    /// Socket address to bind.
    ///
    /// The host may be an IPv4 literal, an IPv6 literal with or without brackets,
    /// or a hostname; the first resolved address wins.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidAddress` when the host does not resolve.
    pub async fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.host.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let invalid = || ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port));
        tokio::net::lookup_host((host, self.port))
            .await
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(invalid)
    }

    /// Construct the configured upstream connector.
    ///
    /// # Errors
    /// Returns `ConfigError::Service` if the Yahoo HTTP client cannot be built.
    pub fn connector(&self) -> Result<Arc<dyn InstrumentConnector>, ConfigError> {
        let connector: Arc<dyn InstrumentConnector> = match self.provider {
            ProviderKind::Mock => Arc::new(MockConnector::new()),
            ProviderKind::Yahoo => {
                let mut b = YahooConnector::builder();
                if let Some(url) = &self.yahoo_base_url {
                    b = b.base_url(url.clone());
                }
                Arc::new(b.build()?)
            }
        };
        Ok(connector)
    }

    /// Build the aggregation service described by these settings.
    ///
    /// # Errors
    /// Returns `ConfigError::Service` for an inconsistent engine configuration.
    pub fn build_service(&self) -> Result<PaperTrade, ConfigError> {
        Ok(PaperTrade::builder()
            .with_connector(self.connector()?)
            .config(self.service.clone())
            .build()?)
    }
}

fn parse_batch_attempts(v: &str) -> Option<BatchAttempts> {
    let v = v.trim();
    if v.eq_ignore_ascii_case("request") {
        return Some(BatchAttempts::FromRequest);
    }
    v.parse().ok().map(BatchAttempts::Fixed)
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }
}
