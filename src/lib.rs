//! Miniflux Bridge Library
//!
//! A loopback HTTP relay in front of the Miniflux REST API: callers use plain
//! local routes, the bridge adds `X-Auth-Token` and normalizes every upstream
//! result into a JSON body plus status code.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::BridgeConfig;
pub use http::BridgeServer;
pub use lifecycle::Shutdown;
pub use upstream::{BridgeError, MinifluxClient, Outcome};
