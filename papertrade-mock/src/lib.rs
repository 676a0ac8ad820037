//! Mock connectors for papertrade.
//!
//! - [`MockConnector`] serves deterministic fixtures for a handful of symbols. The
//!   magic symbols `FAIL` and `TIMEOUT` always error and stall, respectively.
//! - [`DynamicMockConnector`] defers every call to rules set through its
//!   [`DynamicMockController`], and counts calls per kind and symbol.
use async_trait::async_trait;
use papertrade_core::{
    InstrumentConnector, PaperTradeError, StatisticsProvider, StatisticsRecord, SummaryProvider,
    SummaryRecord, Symbol,
};

pub mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Symbols with fixture data.
pub const FIXTURE_SYMBOLS: &[&str] = fixtures::SYMBOLS;

/// Mock connector for CI-safe runs. Provides deterministic data from static fixtures.
pub struct MockConnector {
    stall: std::time::Duration,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Connector whose `TIMEOUT` symbol stalls for 200ms.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stall: std::time::Duration::from_millis(200),
        }
    }

    /// Override how long the `TIMEOUT` symbol stalls.
    #[must_use]
    pub const fn with_stall(stall: std::time::Duration) -> Self {
        Self { stall }
    }

    fn not_found(what: &str) -> PaperTradeError {
        PaperTradeError::not_found(what.to_string())
    }

    async fn maybe_fail_or_timeout(
        &self,
        symbol: &str,
        capability: &'static str,
    ) -> Result<(), PaperTradeError> {
        match symbol {
            "FAIL" => Err(PaperTradeError::connector(
                "papertrade-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(self.stall).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl InstrumentConnector for MockConnector {
    fn name(&self) -> &'static str {
        "papertrade-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_summary_provider(&self) -> Option<&dyn SummaryProvider> {
        Some(self as &dyn SummaryProvider)
    }

    fn as_statistics_provider(&self) -> Option<&dyn StatisticsProvider> {
        Some(self as &dyn StatisticsProvider)
    }
}

#[async_trait]
impl SummaryProvider for MockConnector {
    async fn summary(&self, symbol: &Symbol) -> Result<SummaryRecord, PaperTradeError> {
        let s = symbol.as_str();
        self.maybe_fail_or_timeout(s, "summary").await?;
        fixtures::summary::by_symbol(s)
            .map(SummaryRecord::new)
            .ok_or_else(|| Self::not_found(&format!("summary for {s}")))
    }
}

#[async_trait]
impl StatisticsProvider for MockConnector {
    async fn statistics(&self, symbol: &Symbol) -> Result<StatisticsRecord, PaperTradeError> {
        let s = symbol.as_str();
        self.maybe_fail_or_timeout(s, "statistics").await?;
        fixtures::statistics::by_symbol(s)
            .map(StatisticsRecord::new)
            .ok_or_else(|| Self::not_found(&format!("statistics for {s}")))
    }
}
