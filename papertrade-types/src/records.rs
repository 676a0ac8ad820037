//! Provider records and the per-symbol aggregate built from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::symbol::Symbol;

macro_rules! opaque_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Map<String, Value>);

        impl $name {
            /// Wrap a provider JSON object as-is.
            #[must_use]
            pub const fn new(fields: Map<String, Value>) -> Self {
                Self(fields)
            }

            /// Look up a single field by its provider name.
            #[must_use]
            pub fn get(&self, field: &str) -> Option<&Value> {
                self.0.get(field)
            }

        }

        impl From<Map<String, Value>> for $name {
            fn from(fields: Map<String, Value>) -> Self {
                Self(fields)
            }
        }

        impl TryFrom<Value> for $name {
            type Error = crate::error::PaperTradeError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::Object(fields) => Ok(Self(fields)),
                    other => Err(crate::error::PaperTradeError::Data(format!(
                        concat!(stringify!($name), " must be a JSON object, got {}"),
                        other
                    ))),
                }
            }
        }
    };
}

opaque_record!(
    /// Market summary for one symbol, passed through verbatim from the provider.
    ///
    /// Field order in serialized output is key-sorted, so identical provider
    /// payloads always render to identical bytes.
    SummaryRecord
);

opaque_record!(
    /// Statistical metrics for one symbol, passed through verbatim from the provider.
    StatisticsRecord
);

/// Aggregated data for one symbol.
///
/// A value of this type is only ever produced for a successful aggregation:
/// every requested kind is populated, unrequested kinds are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentResult {
    /// Normalized symbol the records were fetched for.
    pub symbol: Symbol,
    /// Summary record, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRecord>,
    /// Statistics record, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<StatisticsRecord>,
}

impl InstrumentResult {
    /// Result carrying only the symbol identity.
    #[must_use]
    pub const fn bare(symbol: Symbol) -> Self {
        Self {
            symbol,
            summary: None,
            statistics: None,
        }
    }
}
