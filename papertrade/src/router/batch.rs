use futures::stream::{FuturesUnordered, StreamExt};
use papertrade_core::{BatchReport, InstrumentResult, PaperTradeError, RequestFlags};

use crate::PaperTrade;

impl PaperTrade {
    /// Aggregate a batch of raw symbols concurrently, keeping only the successes.
    ///
    /// Failed symbols (invalid or upstream-unavailable) are dropped silently, so the
    /// output may be shorter than the input or empty. Duplicates are fetched
    /// independently. The output is in completion order.
    ///
    /// # Errors
    /// Returns `EmptyBatch` when `symbols` is empty.
    pub async fn aggregate_batch<S: AsRef<str>>(
        &self,
        symbols: &[S],
        flags: RequestFlags,
    ) -> Result<Vec<InstrumentResult>, PaperTradeError> {
        Ok(self.aggregate_batch_report(symbols, flags).await?.results)
    }

    /// Like [`aggregate_batch`](Self::aggregate_batch), but also reports why each
    /// dropped symbol failed and how many units were abandoned at the batch deadline.
    ///
    /// The attempt budget per kind follows the configured `BatchAttempts` policy.
    ///
    /// # Errors
    /// Returns `EmptyBatch` when `symbols` is empty.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "papertrade::router::batch",
            skip(self, symbols, flags),
            fields(requested = symbols.len()),
        )
    )]
    pub async fn aggregate_batch_report<S: AsRef<str>>(
        &self,
        symbols: &[S],
        flags: RequestFlags,
    ) -> Result<BatchReport, PaperTradeError> {
        if symbols.is_empty() {
            return Err(PaperTradeError::EmptyBatch);
        }
        let flags = self.batch_flags(flags);

        let mut pending: FuturesUnordered<_> = symbols
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                async move { (raw, self.aggregate_one(raw, flags).await) }
            })
            .collect();

        let deadline = self
            .cfg
            .batch_timeout
            .map(|d| tokio::time::Instant::now() + d);
        let mut report = BatchReport::default();

        loop {
            let next = match deadline {
                Some(at) => {
                    if let Ok(next) = tokio::time::timeout_at(at, pending.next()).await {
                        next
                    } else {
                        report.abandoned = pending.len();
                        break;
                    }
                }
                None => pending.next().await,
            };
            let Some((raw, res)) = next else { break };
            match res {
                Ok(result) => report.results.push(result),
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(symbol = raw, error = %err, "dropping symbol from batch");
                    report.failures.push((raw.to_string(), err));
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            requested = symbols.len(),
            returned = report.results.len(),
            failed = report.failures.len(),
            abandoned = report.abandoned,
            "batch complete"
        );
        Ok(report)
    }
}
