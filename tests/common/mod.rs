//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::Response,
    Router,
};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use miniflux_bridge::config::UpstreamConfig;
use miniflux_bridge::{BridgeServer, MinifluxClient, Shutdown};

pub const API_KEY: &str = "test-api-key";

/// What the mock upstream saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub auth_token: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

type Responder =
    Arc<dyn Fn(RecordedRequest) -> Pin<Box<dyn Future<Output = (u16, String)> + Send>> + Send + Sync>;

#[derive(Clone)]
struct MockState {
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

/// A running mock Miniflux instance.
pub struct MockUpstream {
    pub addr: SocketAddr,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("upstream received no requests")
    }
}

/// Start a programmable mock upstream on an ephemeral port.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let responder: Responder = Arc::new(
        move |req: RecordedRequest| -> Pin<Box<dyn Future<Output = (u16, String)> + Send>> {
            Box::pin(f(req))
        },
    );
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        recorded: recorded.clone(),
        responder,
    };

    let app = Router::new().fallback(mock_handler).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, recorded }
}

/// Start a mock upstream that always answers with the same status and body.
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_upstream(move |_| async move { (status, body.to_string()) }).await
}

/// Start a raw upstream that sends `head` and then holds the connection
/// open without sending anything more. Returns the base URL.
pub async fn start_stalling_upstream(head: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(head.as_bytes()).await;
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            });
        }
    });

    format!("http://{}", addr)
}

async fn mock_handler(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(String::from),
        auth_token: header("x-auth-token"),
        content_type: header("content-type"),
        body: body.to_vec(),
    };
    state.recorded.lock().unwrap().push(recorded.clone());

    let (status, body) = (state.responder)(recorded).await;
    Response::builder()
        .status(StatusCode::from_u16(status).unwrap())
        .body(Body::from(body))
        .unwrap()
}

/// A port with nothing listening on it.
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Upstream config pointing at `url` with the test API key.
pub fn upstream_config(url: &str) -> UpstreamConfig {
    UpstreamConfig {
        url: Some(url.to_string()),
        api_key: Some(API_KEY.to_string()),
        timeout_secs: 20,
    }
}

/// Upstream client that ignores system proxy settings.
pub fn upstream_client(upstream: &UpstreamConfig) -> MinifluxClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(upstream.timeout_secs))
        .build()
        .unwrap();
    MinifluxClient::with_http_client(upstream.endpoint(), http)
}

/// A bridge running on an ephemeral loopback port.
pub struct RunningBridge {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningBridge {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningBridge {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the bridge with the given upstream settings.
pub async fn start_bridge(upstream: UpstreamConfig) -> RunningBridge {
    let client = upstream_client(&upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = BridgeServer::new(client);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningBridge { addr, shutdown }
}

/// Test-side HTTP client.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
