//! Route handlers. Each one names an upstream operation and hands it to the
//! [`MinifluxClient`](crate::upstream::MinifluxClient).

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use crate::http::server::AppState;
use crate::upstream::{BridgeError, Outcome};

/// Liveness message. Never touches the upstream.
pub const LIVENESS_MESSAGE: &str = "Miniflux Bridge is running!";

pub async fn index() -> Json<Value> {
    Json(json!({ "message": LIVENESS_MESSAGE }))
}

pub async fn get_me(State(state): State<AppState>) -> Outcome {
    state.client.request("me", Method::GET, None, None).await
}

pub async fn list_feeds(State(state): State<AppState>) -> Outcome {
    state.client.request("feeds", Method::GET, None, None).await
}

pub async fn get_feed(
    State(state): State<AppState>,
    feed_id: Result<Path<u64>, PathRejection>,
) -> Response {
    let Ok(Path(feed_id)) = feed_id else {
        return not_found().await.into_response();
    };

    state
        .client
        .request(&format!("feeds/{}", feed_id), Method::GET, None, None)
        .await
        .into_response()
}

/// Inbound query parameters (`status`, `limit`, `offset`, ...) are forwarded
/// as received, in order.
pub async fn list_feed_entries(
    State(state): State<AppState>,
    feed_id: Result<Path<u64>, PathRejection>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Ok(Path(feed_id)) = feed_id else {
        return not_found().await.into_response();
    };

    state
        .client
        .request(
            &format!("feeds/{}/entries", feed_id),
            Method::GET,
            Some(&params),
            None,
        )
        .await
        .into_response()
}

pub async fn create_feed(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = match feed_creation_payload(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected feed creation request");
            return err.into_response();
        }
    };

    tracing::info!(feed_url = %payload["feed_url"], "Creating feed");

    state
        .client
        .request("feeds", Method::POST, None, Some(&payload))
        .await
        .into_response()
}

pub async fn delete_feed(
    State(state): State<AppState>,
    feed_id: Result<Path<u64>, PathRejection>,
) -> Response {
    let Ok(Path(feed_id)) = feed_id else {
        return not_found().await.into_response();
    };

    tracing::info!(feed_id, "Deleting feed");

    state
        .client
        .request(&format!("feeds/{}", feed_id), Method::DELETE, None, None)
        .await
        .into_response()
}

pub async fn list_categories(State(state): State<AppState>) -> Outcome {
    state.client.request("categories", Method::GET, None, None).await
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// Build the upstream body for feed creation.
///
/// Only `feed_url` (required) and `category_id` (optional) are forwarded.
/// A body that is absent, not JSON, not an object, or empty counts as
/// missing `feed_url`.
pub fn feed_creation_payload(body: &[u8]) -> Result<Value, BridgeError> {
    let parsed: Option<Map<String, Value>> = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        });

    let mut inbound = parsed.ok_or(BridgeError::MissingField("feed_url"))?;
    let feed_url = inbound
        .remove("feed_url")
        .ok_or(BridgeError::MissingField("feed_url"))?;

    let mut payload = Map::new();
    payload.insert("feed_url".to_string(), feed_url);
    if let Some(category_id) = inbound.remove("category_id") {
        payload.insert("category_id".to_string(), category_id);
    }

    Ok(Value::Object(payload))
}
