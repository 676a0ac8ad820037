use std::num::NonZeroU32;

use papertrade_core::{
    DataKind, FetchFailure, FetchOutcome, PaperTradeError, StatisticsRecord, SummaryRecord, Symbol,
};

use crate::PaperTrade;
use crate::router::backoff::retry_delay;

impl PaperTrade {
    /// Fetch the summary record for `symbol`, retrying up to `max_attempts` times.
    ///
    /// Never returns an error: exhausted retries and a connector without summary
    /// support are both reported as `FetchOutcome::Failure`.
    pub async fn fetch_summary(
        &self,
        symbol: &Symbol,
        max_attempts: NonZeroU32,
    ) -> FetchOutcome<SummaryRecord> {
        let Some(provider) = self.connector.as_summary_provider() else {
            return unsupported(DataKind::Summary);
        };
        self.fetch_with_retry(DataKind::Summary, symbol, max_attempts, || {
            provider.summary(symbol)
        })
        .await
    }

    /// Fetch the statistics record for `symbol`, retrying up to `max_attempts` times.
    pub async fn fetch_statistics(
        &self,
        symbol: &Symbol,
        max_attempts: NonZeroU32,
    ) -> FetchOutcome<StatisticsRecord> {
        let Some(provider) = self.connector.as_statistics_provider() else {
            return unsupported(DataKind::Statistics);
        };
        self.fetch_with_retry(DataKind::Statistics, symbol, max_attempts, || {
            provider.statistics(symbol)
        })
        .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "papertrade::router::fetch",
            skip(self, call, symbol, kind, max_attempts),
            fields(symbol = %symbol, kind = %kind, max_attempts = max_attempts.get()),
        )
    )]
    async fn fetch_with_retry<T, F, Fut>(
        &self,
        kind: DataKind,
        symbol: &Symbol,
        max_attempts: NonZeroU32,
        call: F,
    ) -> FetchOutcome<T>
    where
        F: Fn() -> Fut,
        Fut: core::future::Future<Output = Result<T, PaperTradeError>>,
    {
        #[cfg(not(feature = "tracing"))]
        let _ = symbol;

        let max = max_attempts.get();
        let mut last = None;
        for attempt in 1..=max {
            match self.provider_call(kind, call()).await {
                Ok(record) => {
                    return FetchOutcome::Success {
                        record,
                        attempts: attempt,
                    };
                }
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, error = %err, "fetch attempt failed");
                    last = Some(err);
                }
            }
            if attempt < max
                && let Some(backoff) = self.cfg.retry_backoff.as_ref()
            {
                tokio::time::sleep(retry_delay(backoff, attempt)).await;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            attempts = max,
            last_error = ?last,
            "retries exhausted"
        );
        FetchOutcome::Failure(FetchFailure {
            kind,
            attempts: max,
            last,
        })
    }
}

fn unsupported<T>(kind: DataKind) -> FetchOutcome<T> {
    FetchOutcome::Failure(FetchFailure {
        kind,
        attempts: 0,
        last: Some(PaperTradeError::unsupported(kind.as_str())),
    })
}
