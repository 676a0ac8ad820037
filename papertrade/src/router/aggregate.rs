use papertrade_core::{DataKind, InstrumentResult, PaperTradeError, RequestFlags, Symbol};

use crate::PaperTrade;

impl PaperTrade {
    /// Aggregate the requested data for one raw symbol.
    ///
    /// The symbol is trimmed and upper-cased first. With neither flag set the
    /// result carries only the symbol and no provider call is made.
    ///
    /// # Errors
    /// - `InvalidSymbol` if `raw` is blank or contains whitespace.
    /// - `UpstreamUnavailable` if a requested kind exhausted its attempts.
    pub async fn aggregate_one(
        &self,
        raw: &str,
        flags: RequestFlags,
    ) -> Result<InstrumentResult, PaperTradeError> {
        let symbol = Symbol::parse(raw)?;
        self.aggregate_symbol(symbol, flags).await
    }

    /// Aggregate the requested data for an already normalized symbol.
    ///
    /// Summary is fetched before statistics. A failed summary stops the aggregation,
    /// so statistics are never fetched for it.
    ///
    /// # Errors
    /// Returns `UpstreamUnavailable` for the first requested kind that failed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "papertrade::router::aggregate",
            skip(self, symbol, flags),
            fields(
                symbol = %symbol,
                summary = flags.want_summary,
                statistics = flags.want_statistics,
            ),
        )
    )]
    pub async fn aggregate_symbol(
        &self,
        symbol: Symbol,
        flags: RequestFlags,
    ) -> Result<InstrumentResult, PaperTradeError> {
        let mut out = InstrumentResult::bare(symbol);

        for kind in flags.requested() {
            match kind {
                DataKind::Summary => {
                    let outcome = self.fetch_summary(&out.symbol, flags.max_attempts).await;
                    out.summary = Some(outcome.into_result(out.symbol.as_str())?);
                }
                DataKind::Statistics => {
                    let outcome = self.fetch_statistics(&out.symbol, flags.max_attempts).await;
                    out.statistics = Some(outcome.into_result(out.symbol.as_str())?);
                }
            }
        }

        Ok(out)
    }
}
