//! Configuration loading from disk and the environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{BackendConfig, GatewayConfig};
use crate::config::validation::{validate_gateway, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("invalid value in environment variable {name}: {value:?}")]
    Env { name: &'static str, value: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Load, override and validate the gateway configuration.
///
/// The file is optional; deployments typically configure everything via the
/// environment and run with defaults otherwise.
pub fn load_gateway_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_gateway_env(&mut config)?;
    validate_gateway(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Environment overrides for the gateway, matching the deployment contract:
/// `ZOOKEEPER_HOST`, `STATIC_CONTENT_HOST`, `PORT`, `REGISTRATION_PATH`.
fn apply_gateway_env(config: &mut GatewayConfig) -> Result<(), ConfigError> {
    if let Ok(hosts) = env::var("ZOOKEEPER_HOST") {
        config.coordination.hosts = hosts;
    }
    if let Ok(host) = env::var("STATIC_CONTENT_HOST") {
        config.static_origin.url = with_http_scheme(&host);
    }
    if let Ok(port) = env::var("PORT") {
        let port: u16 = port.parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            value: port.clone(),
        })?;
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if let Ok(path) = env::var("REGISTRATION_PATH") {
        config.coordination.base_path = path;
    }
    Ok(())
}

/// Build the shelf backend configuration from the environment: `ID`, `PORT`,
/// `ZOOKEEPER_HOST`, `ADVERTISE_HOST`, `REGISTRATION_PATH`, `WAIT_FOR_BASE_PATH`.
pub fn load_backend_config() -> Result<BackendConfig, ConfigError> {
    let mut config = BackendConfig::default();

    if let Ok(id) = env::var("ID") {
        config.id = id;
    }
    if let Ok(port) = env::var("PORT") {
        config.port = port.parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            value: port.clone(),
        })?;
    }
    if let Ok(hosts) = env::var("ZOOKEEPER_HOST") {
        config.coordination.hosts = hosts;
    }
    if let Ok(host) = env::var("ADVERTISE_HOST") {
        config.advertise_host = Some(host);
    }
    if let Ok(path) = env::var("REGISTRATION_PATH") {
        config.coordination.base_path = path;
    }
    if let Ok(value) = env::var("WAIT_FOR_BASE_PATH") {
        config.wait_for_base_path = matches!(value.as_str(), "1" | "true" | "yes");
    }

    Ok(config)
}

/// Deployments hand us bare `host:port` values; the forwarding layer wants
/// full URLs.
fn with_http_scheme(host: &str) -> String {
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gains_http_scheme() {
        assert_eq!(with_http_scheme("nginx:80"), "http://nginx:80");
        assert_eq!(with_http_scheme("http://nginx:80"), "http://nginx:80");
    }

    #[test]
    fn default_config_is_valid() {
        let config = GatewayConfig::default();
        assert!(validate_gateway(&config).is_ok());
    }
}
