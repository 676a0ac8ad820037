//! Report envelopes produced by the batch dispatcher.

use serde::{Deserialize, Serialize};

use crate::error::PaperTradeError;
use crate::records::InstrumentResult;

/// Outcome of a batch aggregation.
///
/// `results` holds only successful symbols, in completion order. `failures`
/// pairs each dropped input (as received) with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatchReport {
    /// Successfully aggregated instruments.
    pub results: Vec<InstrumentResult>,
    /// Inputs that were omitted from `results`.
    pub failures: Vec<(String, PaperTradeError)>,
    /// Inputs still in flight when the batch deadline elapsed.
    pub abandoned: usize,
}

impl BatchReport {
    /// Number of inputs accounted for.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.results.len() + self.failures.len() + self.abandoned
    }
}
