//! Error taxonomy for bridged calls.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every way a bridged request can fail.
///
/// Each variant knows the HTTP status it is reported with and renders as a
/// `{"error": "<message>"}` body.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Base URL or API key absent. Raised before any network I/O.
    #[error("MINIFLUX_URL or MINIFLUX_API_KEY not configured")]
    MissingConfig,

    /// Connection failure, timeout, malformed URL, or an upstream 4xx/5xx.
    #[error("Failed to connect to Miniflux API: {}", error_chain(.0))]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with an `error_message` body.
    #[error("Miniflux API Error: {message}")]
    Api { status: StatusCode, message: String },

    /// Upstream failed and its body was not JSON.
    #[error("Received non-JSON response with status {}", .status.as_u16())]
    NonJson { status: StatusCode },

    /// Inbound body lacks a required field.
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl BridgeError {
    /// Status reported to the bridge's caller.
    pub fn status(&self) -> StatusCode {
        match self {
            BridgeError::MissingConfig | BridgeError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            BridgeError::Transport(e) => e.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            BridgeError::Api { status, .. } | BridgeError::NonJson { status } => *status,
            BridgeError::MissingField(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The `{"error": ...}` descriptor sent to the caller.
    pub fn body(&self) -> serde_json::Value {
        json!({ "error": self.to_string() })
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Render an error with its full source chain, e.g.
/// `error sending request for url (...): operation timed out`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}
