//! Normalized result of a bridged call and the response classifier.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::upstream::error::BridgeError;

/// What a route hands back to its caller.
#[derive(Debug)]
pub enum Outcome {
    /// Upstream JSON (or wrapped text) with the upstream status.
    Json { status: StatusCode, body: Value },
    /// Upstream 204. Reported as `{}` with status 204.
    Empty,
    /// Any failure, reported with its own status.
    Failed(BridgeError),
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Json { status, .. } => *status,
            Outcome::Empty => StatusCode::NO_CONTENT,
            Outcome::Failed(err) => err.status(),
        }
    }

    pub fn body(&self) -> Value {
        match self {
            Outcome::Json { body, .. } => body.clone(),
            Outcome::Empty => json!({}),
            Outcome::Failed(err) => err.body(),
        }
    }

    pub fn into_parts(self) -> (StatusCode, Value) {
        match self {
            Outcome::Json { status, body } => (status, body),
            Outcome::Empty => (StatusCode::NO_CONTENT, json!({})),
            Outcome::Failed(err) => (err.status(), err.body()),
        }
    }
}

impl From<Result<Outcome, BridgeError>> for Outcome {
    fn from(result: Result<Outcome, BridgeError>) -> Self {
        result.unwrap_or_else(Outcome::Failed)
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        let (status, body) = self.into_parts();
        (status, Json(body)).into_response()
    }
}

/// Classify a received upstream body.
///
/// Status >= 400 is handled by the caller before the body is inspected; the
/// non-JSON failure branch here covers anything that slips through.
pub fn classify(status: StatusCode, body: &[u8]) -> Result<Outcome, BridgeError> {
    if status == StatusCode::NO_CONTENT {
        return Ok(Outcome::Empty);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => match api_error_message(&value) {
            Some(message) => Err(BridgeError::Api { status, message }),
            None => Ok(Outcome::Json { status, body: value }),
        },
        Err(_) if is_ok(status) => Ok(Outcome::Json {
            status,
            body: json!({ "message": String::from_utf8_lossy(body) }),
        }),
        Err(_) => Err(BridgeError::NonJson { status }),
    }
}

/// The `error_message` field of a Miniflux error object, if present.
pub fn api_error_message(value: &Value) -> Option<String> {
    let message = value.as_object()?.get("error_message")?;
    Some(match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Anything below 400 counts as a usable response.
fn is_ok(status: StatusCode) -> bool {
    status.as_u16() < 400
}
