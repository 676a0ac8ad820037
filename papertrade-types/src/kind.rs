use core::fmt;
use serde::{Deserialize, Serialize};

/// Data kinds an upstream provider can serve for a symbol.
///
/// Used for routing to the right provider role, in error variants, and as a
/// stable label in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Current market summary (prices, ranges, volume, dividend fields).
    Summary,
    /// Statistical metrics (valuation, share counts, ratios).
    Statistics,
}

impl DataKind {
    /// All kinds, in the order the aggregator fetches them.
    pub const ALL: [Self; 2] = [Self::Summary, Self::Statistics];

    /// Stable lowercase identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Statistics => "statistics",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
