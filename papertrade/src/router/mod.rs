pub mod aggregate;
pub mod backoff;
pub mod batch;
pub mod fetch;
