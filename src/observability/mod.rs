//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; every upstream call logs operation,
//!   status and elapsed time
//! - Request ID flows from the inbound span into upstream call logs

pub mod logging;

pub use logging::init_logging;
