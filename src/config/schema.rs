//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for both
//! services in this repository: the gateway and the shelf backend. All
//! types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Fixed origin that serves everything outside the dynamic prefix.
    pub static_origin: StaticOriginConfig,

    /// Coordination service session and registration path.
    pub coordination: CoordinationConfig,

    /// Request classification settings.
    pub routing: RoutingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Static origin configuration.
///
/// The gateway delegates every non-dynamic request to this single fixed
/// address, typically an nginx instance fronting static assets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticOriginConfig {
    /// Full origin URL (e.g., "http://nginx:80").
    pub url: String,
}

impl Default for StaticOriginConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8090".to_string(),
        }
    }
}

/// Coordination service configuration.
///
/// Shared by the gateway (membership watching) and the shelf backend
/// (registration).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CoordinationConfig {
    /// Comma-separated cluster addresses (e.g., "zk1:2181,zk2:2181").
    pub hosts: String,

    /// Base path under which backends publish their ephemeral records.
    pub base_path: String,

    /// Session timeout in seconds. Ephemeral registrations survive at most
    /// this long after a backend loses its session.
    pub session_timeout_secs: u64,

    /// Bound on initial connection establishment in seconds. Connect
    /// failure is fatal at startup.
    pub connect_timeout_secs: u64,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            hosts: "127.0.0.1:2181".to_string(),
            base_path: "/shelf".to_string(),
            session_timeout_secs: 20,
            connect_timeout_secs: 10,
        }
    }
}

/// Request classification settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Path prefix routed to the discovered backend pool; everything else
    /// goes to the static origin.
    pub dynamic_prefix: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            dynamic_prefix: "/library".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter, overridable via RUST_LOG.
    pub log_filter: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "shelf_gateway=info,tower_http=warn".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Configuration for a shelf backend process.
///
/// Backends are deployed as identical replicas that differ only in their
/// identity; everything here comes from the environment in practice.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Stable identifier, also the registration child node name.
    pub id: String,

    /// Port the backend listens on.
    pub port: u16,

    /// Hostname advertised to the gateway. Defaults to `id`, which matches
    /// container deployments where the service name is the hostname.
    pub advertise_host: Option<String>,

    /// Block until the registration base path exists before publishing.
    pub wait_for_base_path: bool,

    /// Coordination service session settings.
    pub coordination: CoordinationConfig,

    /// Default tracing filter, overridable via RUST_LOG.
    pub log_filter: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            id: "shelf-1".to_string(),
            port: 8000,
            advertise_host: None,
            wait_for_base_path: false,
            coordination: CoordinationConfig::default(),
            log_filter: "shelf_backend=info,shelf_gateway=info".to_string(),
        }
    }
}

impl BackendConfig {
    /// The reachable address this backend publishes at registration time.
    pub fn advertised_url(&self) -> String {
        let host = self.advertise_host.as_deref().unwrap_or(&self.id);
        format!("http://{}:{}", host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertised_url_defaults_to_id_as_host() {
        let config = BackendConfig {
            id: "shelf-2".into(),
            port: 8000,
            ..BackendConfig::default()
        };
        assert_eq!(config.advertised_url(), "http://shelf-2:8000");
    }

    #[test]
    fn advertised_url_honors_explicit_host() {
        let config = BackendConfig {
            id: "shelf-2".into(),
            port: 9001,
            advertise_host: Some("10.0.0.7".into()),
            ..BackendConfig::default()
        };
        assert_eq!(config.advertised_url(), "http://10.0.0.7:9001");
    }
}
