use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::PaperTradeError;
use crate::kind::DataKind;

/// Per-request options: which kinds to fetch and how many attempts each gets.
///
/// Built once from the inbound request and passed by value afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFlags {
    /// Fetch the summary record.
    pub want_summary: bool,
    /// Fetch the statistics record.
    pub want_statistics: bool,
    /// Attempts per requested kind (at least one).
    pub max_attempts: NonZeroU32,
}

impl RequestFlags {
    /// Flags with the given selection and a single attempt per kind.
    #[must_use]
    pub const fn new(want_summary: bool, want_statistics: bool) -> Self {
        Self {
            want_summary,
            want_statistics,
            max_attempts: NonZeroU32::MIN,
        }
    }

    /// Summary only, one attempt.
    #[must_use]
    pub const fn summary_only() -> Self {
        Self::new(true, false)
    }

    /// Replace the attempt budget.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `attempts` is zero.
    pub fn with_max_attempts(mut self, attempts: u32) -> Result<Self, PaperTradeError> {
        self.max_attempts = NonZeroU32::new(attempts)
            .ok_or_else(|| PaperTradeError::invalid_arg("max attempts must be at least 1"))?;
        Ok(self)
    }

    /// Whether the given kind was requested.
    #[must_use]
    pub const fn wants(&self, kind: DataKind) -> bool {
        match kind {
            DataKind::Summary => self.want_summary,
            DataKind::Statistics => self.want_statistics,
        }
    }

    /// Requested kinds in fetch order.
    pub fn requested(&self) -> impl Iterator<Item = DataKind> + '_ {
        DataKind::ALL.into_iter().filter(|k| self.wants(*k))
    }
}

impl Default for RequestFlags {
    fn default() -> Self {
        Self::summary_only()
    }
}
