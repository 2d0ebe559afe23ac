//! Upstream translation subsystem.
//!
//! # Data Flow
//! ```text
//! route handler (operation, verb, query, body)
//!     → client.rs (URL + auth header, one call with timeout)
//!     → outcome.rs (classify status/body)
//!     → Outcome { Json | Empty | Failed(BridgeError) }
//!     → IntoResponse: JSON body + status back to the caller
//! ```

pub mod client;
pub mod error;
pub mod outcome;

pub use client::{MinifluxClient, X_AUTH_TOKEN};
pub use error::BridgeError;
pub use outcome::Outcome;
