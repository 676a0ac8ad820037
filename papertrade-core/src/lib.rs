//! papertrade-core
//!
//! Connector contracts shared across the papertrade workspace.
//!
//! - `connector`: the `InstrumentConnector` trait and its per-kind provider roles.
//! - Re-exports every DTO from `papertrade-types` so downstream crates can depend
//!   on this crate alone.
#![warn(missing_docs)]

/// Connector capability traits and the primary `InstrumentConnector` interface.
pub mod connector;

pub use connector::{InstrumentConnector, StatisticsProvider, SummaryProvider};
pub use papertrade_types::*;
