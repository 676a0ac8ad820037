//! papertrade-yahoo
//!
//! Connector that implements the papertrade provider roles on top of the Yahoo
//! Finance `quoteSummary` endpoint. The `summaryDetail` module backs market
//! summaries and `defaultKeyStatistics` backs key statistics.
#![warn(missing_docs)]

/// Adapter definitions and the production HTTP adapter.
pub mod adapter;
mod builder;

use std::sync::Arc;

use adapter::{CONNECTOR, HttpAdapter, QuoteSummaryApi};
use async_trait::async_trait;
use papertrade_core::{
    InstrumentConnector, PaperTradeError, StatisticsProvider, StatisticsRecord, SummaryProvider,
    SummaryRecord, Symbol,
};

pub use builder::YahooConnectorBuilder;

const SUMMARY_MODULE: &str = "summaryDetail";
const STATISTICS_MODULE: &str = "defaultKeyStatistics";

/// Public connector type. Production users construct it with `YahooConnector::new_default()`.
pub struct YahooConnector {
    api: Arc<dyn QuoteSummaryApi>,
}

impl YahooConnector {
    /// Stable connector name used in logs and error tags.
    pub const NAME: &'static str = CONNECTOR;

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no data")
    }

    fn normalize_error(e: PaperTradeError, what: &str) -> PaperTradeError {
        match e {
            PaperTradeError::Connector { connector: _, msg } => {
                if Self::looks_like_not_found(&msg) {
                    PaperTradeError::not_found(what.to_string())
                } else {
                    PaperTradeError::connector(CONNECTOR, msg)
                }
            }
            PaperTradeError::Other(msg) => PaperTradeError::connector(CONNECTOR, msg),
            other => other,
        }
    }

    /// Connector against the public Yahoo endpoint.
    ///
    /// # Errors
    /// Returns `Other` if the HTTP client cannot be initialized.
    pub fn new_default() -> Result<Self, PaperTradeError> {
        Ok(Self::from_adapter(Arc::new(HttpAdapter::new_default()?)))
    }

    /// Start configuring a connector (base URL, timeout, user agent).
    #[must_use]
    pub fn builder() -> YahooConnectorBuilder {
        YahooConnectorBuilder::default()
    }

    /// Build from any `QuoteSummaryApi` implementation.
    #[must_use]
    pub fn from_adapter(api: Arc<dyn QuoteSummaryApi>) -> Self {
        Self { api }
    }

    async fn module(
        &self,
        symbol: &Symbol,
        module: &'static str,
        what: &str,
    ) -> Result<serde_json::Value, PaperTradeError> {
        self.api
            .module(symbol.as_str(), module)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("{what} for {symbol}")))
    }
}

impl InstrumentConnector for YahooConnector {
    fn name(&self) -> &'static str {
        CONNECTOR
    }

    fn vendor(&self) -> &'static str {
        "Yahoo Finance"
    }

    fn as_summary_provider(&self) -> Option<&dyn SummaryProvider> {
        Some(self as &dyn SummaryProvider)
    }

    fn as_statistics_provider(&self) -> Option<&dyn StatisticsProvider> {
        Some(self as &dyn StatisticsProvider)
    }
}

#[async_trait]
impl SummaryProvider for YahooConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "papertrade::yahoo",
            skip(self, symbol),
            fields(symbol = %symbol),
        )
    )]
    async fn summary(&self, symbol: &Symbol) -> Result<SummaryRecord, PaperTradeError> {
        let v = self.module(symbol, SUMMARY_MODULE, "summary").await?;
        SummaryRecord::try_from(v)
    }
}

#[async_trait]
impl StatisticsProvider for YahooConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "papertrade::yahoo",
            skip(self, symbol),
            fields(symbol = %symbol),
        )
    )]
    async fn statistics(&self, symbol: &Symbol) -> Result<StatisticsRecord, PaperTradeError> {
        let v = self.module(symbol, STATISTICS_MODULE, "statistics").await?;
        StatisticsRecord::try_from(v)
    }
}
