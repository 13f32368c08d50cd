//! ZooKeeper-backed registry implementation.

use std::time::Duration;

use zookeeper_client as zk;

use crate::config::CoordinationConfig;
use crate::coordination::registry::{Registry, RegistryError, RegistryEvent};

/// Production [`Registry`] over a ZooKeeper session.
///
/// The underlying client multiplexes one session; clones share it, which is
/// exactly what ephemeral registrations need (the record lives as long as
/// the session does).
#[derive(Clone)]
pub struct ZkRegistry {
    client: zk::Client,
}

impl ZkRegistry {
    /// Establish a session with bounded connect and session timeouts.
    ///
    /// Connect failure is fatal at startup: without a session the gateway
    /// cannot learn membership and a backend cannot register.
    pub async fn connect(config: &CoordinationConfig) -> Result<Self, RegistryError> {
        tracing::info!(hosts = %config.hosts, "connecting to coordination service");
        let client = zk::Client::connector()
            .session_timeout(Duration::from_secs(config.session_timeout_secs))
            .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.hosts)
            .await
            .map_err(|source| RegistryError::Connect {
                hosts: config.hosts.clone(),
                source,
            })?;
        Ok(Self { client })
    }
}

impl Registry for ZkRegistry {
    type Watch = zk::OneshotWatcher;

    async fn ensure_path(&self, path: &str) -> Result<(), RegistryError> {
        let options = zk::CreateMode::Persistent.with_acls(zk::Acls::anyone_all());
        match self.client.create(path, &[], &options).await {
            Ok(_) => {
                tracing::info!(path, "created registration path");
                Ok(())
            }
            Err(zk::Error::NodeExists) => Ok(()),
            Err(source) => Err(RegistryError::Node {
                path: path.to_string(),
                source,
            }),
        }
    }

    async fn create_ephemeral(&self, path: &str, payload: &[u8]) -> Result<(), RegistryError> {
        let options = zk::CreateMode::Ephemeral.with_acls(zk::Acls::anyone_all());
        match self.client.create(path, payload, &options).await {
            Ok(_) => Ok(()),
            Err(zk::Error::NodeExists) => Err(RegistryError::NodeExists(path.to_string())),
            Err(source) => Err(RegistryError::Node {
                path: path.to_string(),
                source,
            }),
        }
    }

    async fn children_and_watch(
        &self,
        path: &str,
    ) -> Result<(Vec<String>, Self::Watch), RegistryError> {
        let (children, _stat, watcher) = self
            .client
            .get_and_watch_children(path)
            .await
            .map_err(|source| RegistryError::Node {
                path: path.to_string(),
                source,
            })?;
        Ok((children, watcher))
    }

    async fn node_data(&self, path: &str) -> Result<Vec<u8>, RegistryError> {
        match self.client.get_data(path).await {
            Ok((payload, _stat)) => Ok(payload),
            Err(zk::Error::NoNode) => Err(RegistryError::Missing(path.to_string())),
            Err(source) => Err(RegistryError::Node {
                path: path.to_string(),
                source,
            }),
        }
    }

    async fn wait_for_path(&self, path: &str) -> Result<(), RegistryError> {
        loop {
            let (stat, watcher) = self
                .client
                .check_and_watch_stat(path)
                .await
                .map_err(|source| RegistryError::Node {
                    path: path.to_string(),
                    source,
                })?;
            if stat.is_some() {
                return Ok(());
            }
            tracing::debug!(path, "waiting for registration path to appear");
            watcher.changed().await;
        }
    }

    async fn watch_fired(&self, watch: Self::Watch) -> RegistryEvent {
        let event = watch.changed().await;
        match event.event_type {
            zk::EventType::NodeChildrenChanged => RegistryEvent::ChildrenChanged,
            _ => RegistryEvent::Other,
        }
    }
}
