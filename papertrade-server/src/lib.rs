//! HTTP boundary for the papertrade aggregation engine.
//!
//! - [`http`] builds the axum router and maps engine errors to status codes.
//! - [`config`] loads [`ServerSettings`] from `PAPERTRADE_*` environment variables.
//! - [`telemetry`] installs the tracing subscriber.
#![warn(missing_docs)]

pub mod config;
pub mod http;
pub mod telemetry;

pub use config::{ConfigError, ProviderKind, ServerSettings};
pub use http::{ApiError, AppState, create_router};
