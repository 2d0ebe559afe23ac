//! Miniflux REST client: builds, sends and classifies one upstream call.
//!
//! # Responsibilities
//! - Resolve the operation URL against the configured base URL
//! - Attach `X-Auth-Token` and, for body-carrying verbs, a JSON content type
//! - Enforce the per-call timeout
//! - Turn every result into an [`Outcome`]
//!
//! There are no retries: one failed attempt is reported immediately.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Endpoint, UpstreamConfig};
use crate::upstream::error::BridgeError;
use crate::upstream::outcome::{api_error_message, classify, Outcome};

/// Header carrying the Miniflux API key.
pub const X_AUTH_TOKEN: &str = "X-Auth-Token";

/// Upstream client shared by all route handlers.
#[derive(Clone)]
pub struct MinifluxClient {
    http: reqwest::Client,
    endpoint: Option<Arc<Endpoint>>,
}

impl MinifluxClient {
    /// Build a client from upstream configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_http_client(config.endpoint(), http))
    }

    /// Build a client around an existing `reqwest::Client`.
    ///
    /// The caller is responsible for the client's timeout.
    pub fn with_http_client(endpoint: Option<Endpoint>, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: endpoint.map(Arc::new),
        }
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_deref()
    }

    /// Perform one upstream call and normalize the result.
    pub async fn request(
        &self,
        operation: &str,
        method: Method,
        query: Option<&[(String, String)]>,
        body: Option<&Value>,
    ) -> Outcome {
        let start = Instant::now();
        let outcome: Outcome = self.execute(operation, &method, query, body).await.into();

        match &outcome {
            Outcome::Failed(err) => tracing::warn!(
                operation = %operation,
                method = %method,
                status = outcome.status().as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                error = %err,
                "Upstream call failed"
            ),
            _ => tracing::debug!(
                operation = %operation,
                method = %method,
                status = outcome.status().as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream call completed"
            ),
        }

        outcome
    }

    async fn execute(
        &self,
        operation: &str,
        method: &Method,
        query: Option<&[(String, String)]>,
        body: Option<&Value>,
    ) -> Result<Outcome, BridgeError> {
        let endpoint = self.endpoint.as_deref().ok_or(BridgeError::MissingConfig)?;
        let url = endpoint.operation_url(operation);

        tracing::debug!(url = %url, method = %method, "Sending upstream request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(X_AUTH_TOKEN, endpoint.api_key.as_str());

        if carries_body(method) {
            request = request.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if let Some(status_err) = response.error_for_status_ref().err() {
            // Miniflux reports failures as `{"error_message": ...}` alongside
            // a 4xx/5xx; surface that message rather than the bare status.
            let bytes = match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!(
                        status = status.as_u16(),
                        error = %e,
                        "Could not read upstream error body"
                    );
                    Default::default()
                }
            };
            return Err(match serde_json::from_slice::<Value>(&bytes)
                .ok()
                .as_ref()
                .and_then(api_error_message)
            {
                Some(message) => BridgeError::Api { status, message },
                None => BridgeError::Transport(status_err),
            });
        }

        // A timeout or dropped connection mid-body is still a transport failure.
        let bytes = response.bytes().await?;

        classify(status, &bytes)
    }
}

/// Verbs sent with `Content-Type: application/json`.
fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}
