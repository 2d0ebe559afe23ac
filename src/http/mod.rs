//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (loopback)
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, tracing span)
//!     → handlers.rs (route → upstream operation)
//!     → upstream::MinifluxClient
//!     → Outcome rendered as JSON + status
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use server::{build_router, AppState, BridgeServer};
