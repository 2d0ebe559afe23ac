//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected and
//! returned together. Upstream endpoint problems are NOT errors here: the
//! bridge still starts and answers the liveness route, and
//! [`check_upstream_url`] reports a malformed URL for logging only.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{BridgeConfig, UpstreamConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.bind_address '{0}' is not a loopback address")]
    NonLoopbackBind(String),

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("upstream.url '{url}' is invalid: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let bind = &config.listener.bind_address;
    match bind.parse::<SocketAddr>() {
        Ok(addr) if !addr.ip().is_loopback() => {
            errors.push(ValidationError::NonLoopbackBind(bind.clone()));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidBindAddress(bind.clone())),
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that a configured upstream URL is an absolute http(s) URL.
///
/// A bad URL fails each proxied call as a transport error, so startup only
/// warns about it.
pub fn check_upstream_url(upstream: &UpstreamConfig) -> Option<ValidationError> {
    let raw = upstream.url.as_deref().filter(|s| !s.trim().is_empty())?;
    match url::Url::parse(raw.trim()) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => None,
        Ok(parsed) => Some(ValidationError::InvalidUpstreamUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => Some(ValidationError::InvalidUpstreamUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}
