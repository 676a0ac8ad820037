use async_trait::async_trait;

use papertrade_types::{DataKind, PaperTradeError, StatisticsRecord, SummaryRecord, Symbol};

/// Focused role trait for connectors that provide market summaries.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Fetch the current market summary for `symbol`.
    async fn summary(&self, symbol: &Symbol) -> Result<SummaryRecord, PaperTradeError>;
}

/// Focused role trait for connectors that provide statistical metrics.
#[async_trait]
pub trait StatisticsProvider: Send + Sync {
    /// Fetch key statistics for `symbol`.
    async fn statistics(&self, symbol: &Symbol) -> Result<StatisticsRecord, PaperTradeError>;
}

/// Main connector trait implemented by provider crates. Exposes capability discovery.
pub trait InstrumentConnector: Send + Sync {
    /// A stable identifier used in logs and error tags (e.g. "papertrade-yahoo").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise summary capability by returning a usable trait object reference when supported.
    fn as_summary_provider(&self) -> Option<&dyn SummaryProvider> {
        None
    }

    /// Advertise statistics capability by returning a usable trait object reference when supported.
    fn as_statistics_provider(&self) -> Option<&dyn StatisticsProvider> {
        None
    }

    /// Whether this connector can serve `kind` at all.
    fn provides(&self, kind: DataKind) -> bool {
        match kind {
            DataKind::Summary => self.as_summary_provider().is_some(),
            DataKind::Statistics => self.as_statistics_provider().is_some(),
        }
    }
}
