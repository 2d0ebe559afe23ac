//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every section carries defaults so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Local listener settings.
    pub listener: ListenerConfig,

    /// Miniflux endpoint and outbound call settings.
    pub upstream: UpstreamConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address. Must be a loopback address.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5001".to_string(),
        }
    }
}

/// Upstream Miniflux configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the Miniflux instance (e.g., "https://reader.example.com").
    pub url: Option<String>,

    /// API key sent as `X-Auth-Token`.
    pub api_key: Option<String>,

    /// Total timeout for one upstream call in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: 20,
        }
    }
}

impl UpstreamConfig {
    /// Resolve the endpoint, or `None` when either half is missing or blank.
    pub fn endpoint(&self) -> Option<Endpoint> {
        let url = self.url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;

        Some(Endpoint {
            base_url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

/// A fully specified upstream endpoint. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub api_key: String,
}

impl Endpoint {
    /// Absolute URL for an upstream operation such as `feeds/42/entries`.
    pub fn operation_url(&self, operation: &str) -> String {
        format!("{}/v1/{}", self.base_url.trim_end_matches('/'), operation)
    }
}

// Keep the API key out of logs.
impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.listener.bind_address, "127.0.0.1:5001");
        assert_eq!(config.upstream.timeout_secs, 20);
        assert!(config.upstream.endpoint().is_none());
    }

    #[test]
    fn test_endpoint_requires_both_halves() {
        let mut upstream = UpstreamConfig {
            url: Some("http://localhost:8080".into()),
            ..Default::default()
        };
        assert!(upstream.endpoint().is_none());

        upstream.api_key = Some("   ".into());
        assert!(upstream.endpoint().is_none());

        upstream.api_key = Some("secret".into());
        let endpoint = upstream.endpoint().unwrap();
        assert_eq!(endpoint.base_url, "http://localhost:8080");
        assert_eq!(endpoint.api_key, "secret");
    }

    #[test]
    fn test_operation_url_strips_trailing_slash() {
        let endpoint = Endpoint {
            base_url: "https://reader.example.com//".into(),
            api_key: "k".into(),
        };
        assert_eq!(
            endpoint.operation_url("feeds/42/entries"),
            "https://reader.example.com/v1/feeds/42/entries"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let endpoint = Endpoint {
            base_url: "http://x".into(),
            api_key: "super-secret".into(),
        };
        assert!(!format!("{:?}", endpoint).contains("super-secret"));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [upstream]
            url = "http://miniflux.local"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.url.as_deref(), Some("http://miniflux.local"));
        assert_eq!(config.upstream.timeout_secs, 20);
        assert_eq!(config.listener.bind_address, "127.0.0.1:5001");
    }
}
