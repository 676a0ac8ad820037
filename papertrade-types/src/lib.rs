//! Papertrade data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod kind;
mod outcome;
mod records;
mod reports;
mod request;
mod symbol;

pub use config::{BackoffConfig, BatchAttempts, ServiceConfig};
pub use error::PaperTradeError;
pub use kind::DataKind;
pub use outcome::{FetchFailure, FetchOutcome};
pub use records::{InstrumentResult, StatisticsRecord, SummaryRecord};
pub use reports::BatchReport;
pub use request::RequestFlags;
pub use symbol::Symbol;
