use std::sync::Arc;
use std::time::Duration;

use papertrade_core::PaperTradeError;

use crate::YahooConnector;
use crate::adapter::{DEFAULT_BASE_URL, HttpAdapter};

/// Configures the HTTP adapter behind a [`YahooConnector`].
#[derive(Debug, Default, Clone)]
pub struct YahooConnectorBuilder {
    base_url: Option<String>,
    crumb: Option<bool>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl YahooConnectorBuilder {
    /// Point the connector at a different host (mirrors, test servers).
    ///
    /// A custom base URL turns the crumb handshake off unless
    /// [`crumb`](Self::crumb) re-enables it.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Force the crumb handshake on or off.
    #[must_use]
    pub const fn crumb(mut self, enabled: bool) -> Self {
        self.crumb = Some(enabled);
        self
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparseable base URL and `Other` if the HTTP
    /// client cannot be initialized.
    pub fn build(self) -> Result<YahooConnector, PaperTradeError> {
        let custom = self.base_url.is_some();
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let use_crumb = self.crumb.unwrap_or(!custom);
        let adapter = HttpAdapter::new(
            base,
            use_crumb,
            Some(self.timeout.unwrap_or(Duration::from_secs(10))),
            self.user_agent.as_deref(),
        )?;
        Ok(YahooConnector::from_adapter(Arc::new(adapter)))
    }
}
