//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Returns all violations, not just the first, so a bad deployment shows up
//! as one actionable error message.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BindAddress(String),

    #[error("static_origin.url {0:?} is not a valid http(s) URL")]
    StaticOrigin(String),

    #[error("coordination.hosts must not be empty")]
    EmptyHosts,

    #[error("coordination.base_path {0:?} must be absolute and must not end with '/'")]
    BasePath(String),

    #[error("routing.dynamic_prefix {0:?} must start with '/'")]
    DynamicPrefix(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    MetricsAddress(String),
}

/// Validate a gateway configuration. Pure function; collects every error.
pub fn validate_gateway(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.static_origin.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
        _ => errors.push(ValidationError::StaticOrigin(
            config.static_origin.url.clone(),
        )),
    }

    if config.coordination.hosts.trim().is_empty() {
        errors.push(ValidationError::EmptyHosts);
    }

    let base_path = &config.coordination.base_path;
    if !base_path.starts_with('/') || base_path.len() < 2 || base_path.ends_with('/') {
        errors.push(ValidationError::BasePath(base_path.clone()));
    }

    if !config.routing.dynamic_prefix.starts_with('/') {
        errors.push(ValidationError::DynamicPrefix(
            config.routing.dynamic_prefix.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.coordination.session_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout(
            "coordination.session_timeout_secs",
        ));
    }
    if config.coordination.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout(
            "coordination.connect_timeout_secs",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_violation() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.coordination.base_path = "shelf/".into();
        config.routing.dynamic_prefix = "library".into();
        config.timeouts.request_secs = 0;

        let errors = validate_gateway(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn rejects_non_http_static_origin() {
        let mut config = GatewayConfig::default();
        config.static_origin.url = "ftp://files.example.com".into();

        let errors = validate_gateway(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::StaticOrigin(_)));
    }
}
