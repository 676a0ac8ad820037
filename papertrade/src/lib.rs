//! Papertrade aggregates instrument summary and statistics data from an upstream provider.
//!
//! Overview
//! - Fetches each requested data kind through a bounded-retry loop around one
//!   connector call; a failed call (error or per-call timeout) is one attempt.
//! - Composes the requested kinds for a symbol into one `InstrumentResult` and fails
//!   closed: a result missing a requested field is never returned.
//! - Fans a batch of symbols out concurrently, waits for every unit, and keeps only
//!   the successes. Output is in completion order.
//!
//! Key behaviors and trade-offs
//! - Attempts: single-symbol requests honor the client's try count (clamped to a cap);
//!   batches use `BatchAttempts`, `Fixed(1)` by default, to keep batch latency bounded.
//! - Backpressure: every provider call holds a permit from a service-wide semaphore
//!   (`max_concurrent_fetches`, default 8), so large batches queue instead of flooding
//!   the upstream.
//! - Backoff: off by default. When configured, delays grow exponentially with jitter
//!   to avoid synchronized retries.
//! - Batch deadline: optional. Units still running when it elapses are abandoned and
//!   counted in `BatchReport::abandoned`.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use papertrade::{PaperTrade, RequestFlags};
//!
//! let service = PaperTrade::builder()
//!     .with_connector(Arc::new(papertrade_yahoo::YahooConnector::new_default()))
//!     .build()?;
//!
//! let one = service.aggregate_one("aapl", RequestFlags::new(true, true)).await?;
//! let many = service
//!     .aggregate_batch(&["AAPL", "MSFT"], RequestFlags::summary_only())
//!     .await?;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use core::{PaperTrade, PaperTradeBuilder};
pub use router::backoff::{jitter_wait, retry_delay};

// Re-export core types for convenience
pub use papertrade_core::{
    BackoffConfig, BatchAttempts, BatchReport, DataKind, FetchFailure, FetchOutcome,
    InstrumentConnector, InstrumentResult, PaperTradeError, RequestFlags, ServiceConfig,
    StatisticsProvider, StatisticsRecord, SummaryProvider, SummaryRecord, Symbol,
};
