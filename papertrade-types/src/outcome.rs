use crate::error::PaperTradeError;
use crate::kind::DataKind;

/// Result of a bounded-retry fetch for one symbol and one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// A provider call succeeded.
    Success {
        /// Record returned by the provider.
        record: T,
        /// Attempt number that succeeded (1-based).
        attempts: u32,
    },
    /// Every allowed attempt failed (or none could be made).
    Failure(FetchFailure),
}

/// Diagnostics for an exhausted fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Kind that was being fetched.
    pub kind: DataKind,
    /// Provider calls actually made.
    pub attempts: u32,
    /// Last error observed, if any.
    pub last: Option<PaperTradeError>,
}

impl<T> FetchOutcome<T> {
    /// Number of provider calls made to reach this outcome.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } => *attempts,
            Self::Failure(f) => f.attempts,
        }
    }

    /// True for `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Convert into a `Result`, mapping failure to `UpstreamUnavailable` for `symbol`.
    ///
    /// # Errors
    /// Returns `UpstreamUnavailable` when the outcome is a `Failure`.
    pub fn into_result(self, symbol: &str) -> Result<T, PaperTradeError> {
        match self {
            Self::Success { record, .. } => Ok(record),
            Self::Failure(f) => Err(PaperTradeError::UpstreamUnavailable {
                kind: f.kind,
                symbol: symbol.to_string(),
                attempts: f.attempts,
                last: f.last.map(Box::new),
            }),
        }
    }
}
