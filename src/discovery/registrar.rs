//! Backend self-registration.

use crate::coordination::{Registry, RegistryError};
use crate::load_balancer::BackendAddress;

/// Publishes a backend's reachable address under the registration path.
///
/// Runs inside each backend process. The record is ephemeral: the
/// coordination service removes it when the backend's session ends, so
/// there is no explicit deregistration anywhere.
pub struct Registrar<R: Registry> {
    registry: R,
    base_path: String,
    node_id: String,
}

impl<R: Registry> Registrar<R> {
    /// Create a registrar for the backend identified by `node_id`.
    pub fn new(registry: R, base_path: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            registry,
            base_path: base_path.into(),
            node_id: node_id.into(),
        }
    }

    /// Startup barrier: block until the base path exists.
    ///
    /// One-shot wait, not a continuous watch. Lets a fleet of backends avoid
    /// racing the gateway's path creation at cluster bring-up.
    pub async fn wait_for_base(&self) -> Result<(), RegistryError> {
        self.registry.wait_for_path(&self.base_path).await
    }

    /// Publish this backend's address as an ephemeral registration record.
    ///
    /// Ensures the base path first, tolerating "already exists". Returns the
    /// created node path. Errors are for the caller to log; a backend that
    /// fails to register may keep serving, it just receives no dynamic
    /// traffic.
    pub async fn publish(&self, address: &BackendAddress) -> Result<String, RegistryError> {
        self.registry.ensure_path(&self.base_path).await?;

        let node_path = format!("{}/{}", self.base_path, self.node_id);
        self.registry
            .create_ephemeral(&node_path, address.as_str().as_bytes())
            .await?;

        tracing::info!(node = %node_path, address = %address, "registered backend");
        Ok(node_path)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::discovery::testing::FakeRegistry;

    fn address(name: &str) -> BackendAddress {
        BackendAddress::parse(&format!("http://{name}:8000")).unwrap()
    }

    #[tokio::test]
    async fn publish_creates_ephemeral_record_with_address_payload() {
        let registry = FakeRegistry::new();
        let registrar = Registrar::new(registry.clone(), "/shelf", "shelf-1");

        let node = registrar.publish(&address("shelf-1")).await.unwrap();

        assert_eq!(node, "/shelf/shelf-1");
        assert_eq!(
            registry.payload("/shelf/shelf-1"),
            Some(b"http://shelf-1:8000/".to_vec())
        );
    }

    #[tokio::test]
    async fn publish_tolerates_existing_base_path() {
        let registry = FakeRegistry::new();
        registry.create_persistent("/shelf");
        let registrar = Registrar::new(registry, "/shelf", "shelf-1");

        assert!(registrar.publish(&address("shelf-1")).await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_registration_surfaces_as_error() {
        let registry = FakeRegistry::new();
        let registrar = Registrar::new(registry, "/shelf", "shelf-1");

        registrar.publish(&address("shelf-1")).await.unwrap();
        let err = registrar.publish(&address("shelf-1")).await.unwrap_err();
        assert!(matches!(err, RegistryError::NodeExists(_)));
    }

    #[tokio::test]
    async fn wait_for_base_returns_once_path_appears() {
        let registry = FakeRegistry::new();
        let registrar = Registrar::new(registry.clone(), "/shelf", "shelf-1");

        let barrier = tokio::spawn(async move { registrar.wait_for_base().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        registry.create_persistent("/shelf");

        tokio::time::timeout(Duration::from_secs(1), barrier)
            .await
            .expect("barrier did not release")
            .unwrap()
            .unwrap();
    }
}
