//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (--config / MINIFLUX_BRIDGE_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (MINIFLUX_URL, MINIFLUX_API_KEY)
//!     → CLI overrides (main.rs)
//!     → validation.rs (semantic checks, once, via finalize)
//!     → BridgeConfig (validated, immutable)
//!     → Endpoint handed to the upstream client at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - A missing or malformed endpoint is tolerated at startup (logged) and
//!   reported per request, so the liveness route keeps working

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{finalize, load_from_env, read_config, ConfigError};
pub use schema::{BridgeConfig, Endpoint, ListenerConfig, ObservabilityConfig, UpstreamConfig};
