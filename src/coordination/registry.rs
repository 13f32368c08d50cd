//! Client-side contract of the coordination service.

use std::future::Future;

use thiserror::Error;
use zookeeper_client as zk;

/// Error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to connect to coordination service at {hosts}: {source}")]
    Connect {
        hosts: String,
        #[source]
        source: zk::Error,
    },

    #[error("registry operation on {path} failed: {source}")]
    Node {
        path: String,
        #[source]
        source: zk::Error,
    },

    #[error("registry node {0} already exists")]
    NodeExists(String),

    #[error("registry node {0} is missing or unreadable")]
    Missing(String),
}

/// What a fired watch reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    /// The children of the watched path changed.
    ChildrenChanged,
    /// Anything else (node events, session noise). Not a membership change,
    /// but the one-shot watch is consumed either way.
    Other,
}

/// The primitives the discovery layer needs from the coordination service.
///
/// Implemented by [`ZkRegistry`](crate::coordination::ZkRegistry) in
/// production and by an in-memory fake in tests. Methods return `Send`
/// futures so callers can run inside spawned tasks.
pub trait Registry: Send + Sync + 'static {
    /// Handle for a one-shot subscription armed by [`children_and_watch`]
    /// or internally by [`wait_for_path`].
    ///
    /// [`children_and_watch`]: Registry::children_and_watch
    /// [`wait_for_path`]: Registry::wait_for_path
    type Watch: Send + 'static;

    /// Create a persistent node if absent. "Already exists" is success.
    fn ensure_path(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send;

    /// Create an ephemeral node bound to this session. The service removes
    /// it when the session ends.
    fn create_ephemeral(
        &self,
        path: &str,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), RegistryError>> + Send;

    /// List the children of `path` and arm a one-shot watch for subsequent
    /// child changes, atomically with respect to the read.
    fn children_and_watch(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<(Vec<String>, Self::Watch), RegistryError>> + Send;

    /// Read a node's payload.
    fn node_data(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<u8>, RegistryError>> + Send;

    /// Block until `path` exists. One-shot startup barrier, not a
    /// continuous watch.
    fn wait_for_path(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send;

    /// Await a previously armed watch and report what fired it.
    fn watch_fired(
        &self,
        watch: Self::Watch,
    ) -> impl Future<Output = RegistryEvent> + Send;
}
