use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::DataKind;

/// Unified error type for the papertrade workspace.
///
/// Covers input validation, per-attempt provider faults, and the terminal
/// "retries exhausted" condition raised by the single-symbol aggregator.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PaperTradeError {
    /// Invalid input argument (flags, try counts, request bodies).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Symbol was missing, blank, or contained whitespace after normalization.
    #[error("invalid symbol: {input:?}")]
    InvalidSymbol {
        /// Raw input as received from the caller.
        input: String,
    },

    /// A batch request carried no symbols.
    #[error("batch contains no symbols")]
    EmptyBatch,

    /// The connector does not offer the requested data kind.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// Capability label (e.g. "summary").
        capability: String,
    },

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The provider has no data for the requested symbol.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "summary for AAPL".
        what: String,
    },

    /// Issues with the returned payload (missing modules, wrong shape).
    #[error("data issue: {0}")]
    Data(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),

    /// A single provider call exceeded the configured timeout.
    #[error("provider timed out: {kind} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Data kind being fetched.
        kind: DataKind,
    },

    /// Every attempt for a required data kind failed.
    #[error("{kind} unavailable for {symbol} after {attempts} attempt(s)")]
    UpstreamUnavailable {
        /// Data kind that could not be obtained.
        kind: DataKind,
        /// Normalized symbol.
        symbol: String,
        /// Number of provider calls made.
        attempts: u32,
        /// Last provider error observed, if any attempt produced one.
        last: Option<Box<PaperTradeError>>,
    },
}

impl PaperTradeError {
    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Helper: build an `InvalidSymbol` error from the raw input.
    pub fn invalid_symbol(input: impl Into<String>) -> Self {
        Self::InvalidSymbol {
            input: input.into(),
        }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, kind: DataKind) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            kind,
        }
    }

    /// True when the caller sent something malformed; never retried.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArg(_) | Self::InvalidSymbol { .. } | Self::EmptyBatch
        )
    }

    /// Stable, kebab-case identifier used in HTTP error bodies and logs.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArg(_) => "invalid-argument",
            Self::InvalidSymbol { .. } => "invalid-symbol",
            Self::EmptyBatch => "empty-batch",
            Self::Unsupported { .. } => "unsupported",
            Self::Connector { .. } => "connector",
            Self::NotFound { .. } => "not-found",
            Self::Data(_) => "data",
            Self::Other(_) => "other",
            Self::ProviderTimeout { .. } => "provider-timeout",
            Self::UpstreamUnavailable { .. } => "upstream-unavailable",
        }
    }
}
