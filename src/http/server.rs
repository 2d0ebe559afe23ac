//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router with the bridge's route table
//! - Wire up middleware (request ID, access tracing)
//! - Serve on a listener until shutdown is signalled

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::upstream::{BridgeError, MinifluxClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: MinifluxClient,
}

/// HTTP server for the bridge.
pub struct BridgeServer {
    router: Router,
}

impl BridgeServer {
    /// Create a server that forwards through `client`.
    pub fn new(client: MinifluxClient) -> Self {
        let router = build_router(AppState { client });
        Self { router }
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the route table with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/v1/me", get(handlers::get_me))
        .route("/v1/feeds", get(handlers::list_feeds).post(handlers::create_feed))
        .route(
            "/v1/feeds/{id}",
            get(handlers::get_feed).delete(handlers::delete_feed),
        )
        .route("/v1/feeds/{id}/entries", get(handlers::list_feed_entries))
        .route("/v1/categories", get(handlers::list_categories))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(propagate_request_id_layer())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

/// Report a handler panic as an unexpected error instead of dropping the
/// connection.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "request handler panicked".to_string()
    };

    tracing::error!(details = %details, "Request handler panicked");
    BridgeError::Unexpected(details).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_panic_becomes_unexpected_error() {
        let response = panic_response(Box::new("feed cache poisoned"));
        assert_eq!(response.status(), 500);
        assert_eq!(
            body_json(response).await,
            json!({"error": "An unexpected error occurred: feed cache poisoned"})
        );
    }

    #[tokio::test]
    async fn test_panic_with_formatted_message() {
        let response = panic_response(Box::new(format!("index {} out of range", 3)));
        assert_eq!(
            body_json(response).await,
            json!({"error": "An unexpected error occurred: index 3 out of range"})
        );
    }

    #[tokio::test]
    async fn test_panic_with_opaque_payload() {
        let response = panic_response(Box::new(42_u8));
        assert_eq!(response.status(), 500);
        assert_eq!(
            body_json(response).await,
            json!({"error": "An unexpected error occurred: request handler panicked"})
        );
    }
}
