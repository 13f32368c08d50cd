//! Membership watching: the watch/re-arm loop.

use std::sync::Arc;
use std::time::Duration;

use crate::coordination::{Registry, RegistryError, RegistryEvent};
use crate::load_balancer::{BackendAddress, BackendPool};

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Maintains the [`BackendPool`] snapshot for the lifetime of the gateway.
///
/// Watches are one-shot by contract, so the loop re-arms after every
/// notification. Each cycle reads the children and arms the next watch in
/// one atomic step, reads every child's payload, then replaces the snapshot
/// wholesale; a single unreadable child is skipped, not fatal.
pub struct MembershipWatcher<R: Registry> {
    registry: R,
    base_path: String,
    pool: Arc<BackendPool>,
    retry_delay: Duration,
}

impl<R: Registry> MembershipWatcher<R> {
    /// Create a watcher publishing into `pool`.
    pub fn new(registry: R, base_path: impl Into<String>, pool: Arc<BackendPool>) -> Self {
        Self {
            registry,
            base_path: base_path.into(),
            pool,
            retry_delay: RETRY_DELAY,
        }
    }

    #[cfg(test)]
    fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Run the perpetual refresh loop. Never returns while the process is
    /// alive: an exited watcher would freeze the routing table forever, so
    /// every failure path logs and retries.
    pub async fn run(self) {
        if let Err(error) = self.registry.ensure_path(&self.base_path).await {
            // A backend may create the path instead; the read cycle below
            // keeps retrying until somebody has.
            tracing::warn!(path = %self.base_path, %error, "could not ensure registration path");
        }

        loop {
            let watch = match self.refresh().await {
                Ok(watch) => watch,
                Err(error) => {
                    tracing::warn!(path = %self.base_path, %error, "membership refresh failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                    // The path may be gone entirely (fresh cluster state);
                    // recreate it before the next read.
                    let _ = self.registry.ensure_path(&self.base_path).await;
                    continue;
                }
            };

            match self.registry.watch_fired(watch).await {
                RegistryEvent::ChildrenChanged => {
                    tracing::debug!(path = %self.base_path, "membership changed");
                }
                RegistryEvent::Other => {
                    // Not a membership change, but the one-shot watch is
                    // consumed; the next cycle re-reads and re-arms.
                    tracing::trace!(path = %self.base_path, "ignoring non-membership event");
                }
            }
        }
    }

    /// One refresh cycle: read children + arm watch, read payloads, replace
    /// the snapshot. Returns the armed watch for the caller to await.
    async fn refresh(&self) -> Result<R::Watch, RegistryError> {
        let (children, watch) = self.registry.children_and_watch(&self.base_path).await?;

        let mut backends = Vec::with_capacity(children.len());
        for child in &children {
            let node_path = format!("{}/{}", self.base_path, child);
            let payload = match self.registry.node_data(&node_path).await {
                Ok(payload) => payload,
                Err(error) => {
                    tracing::warn!(node = %node_path, %error, "skipping unreadable registration");
                    continue;
                }
            };
            match BackendAddress::from_payload(&payload) {
                Ok(address) => backends.push(address),
                Err(error) => {
                    tracing::warn!(node = %node_path, %error, "skipping malformed registration");
                }
            }
        }

        tracing::info!(
            path = %self.base_path,
            backends = backends.len(),
            "routing table refreshed"
        );
        self.pool.replace(backends);
        Ok(watch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::testing::FakeRegistry;

    async fn wait_until(pool: &BackendPool, len: usize) {
        for _ in 0..100 {
            if pool.len() == len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("pool never reached {len} backends, has {}", pool.len());
    }

    fn spawn_watcher(registry: FakeRegistry, pool: Arc<BackendPool>) {
        let watcher = MembershipWatcher::new(registry, "/shelf", pool)
            .with_retry_delay(Duration::from_millis(10));
        tokio::spawn(watcher.run());
    }

    #[tokio::test]
    async fn initial_read_populates_pool_in_child_order() {
        let registry = FakeRegistry::new();
        registry.create_persistent("/shelf");
        registry.set_node("/shelf/shelf-1", b"http://shelf-1:8000");
        registry.set_node("/shelf/shelf-2", b"http://shelf-2:8000");

        let pool = Arc::new(BackendPool::new());
        spawn_watcher(registry, pool.clone());

        wait_until(&pool, 2).await;
        let snapshot = pool.snapshot();
        assert_eq!(snapshot[0].authority(), "shelf-1:8000");
        assert_eq!(snapshot[1].authority(), "shelf-2:8000");
    }

    #[tokio::test]
    async fn registration_change_replaces_snapshot() {
        let registry = FakeRegistry::new();
        registry.set_node("/shelf/shelf-1", b"http://shelf-1:8000");

        let pool = Arc::new(BackendPool::new());
        spawn_watcher(registry.clone(), pool.clone());
        wait_until(&pool, 1).await;

        // One joins, the first one's session later drops.
        registry.set_node("/shelf/shelf-2", b"http://shelf-2:8000");
        wait_until(&pool, 2).await;

        registry.remove_node("/shelf/shelf-1");
        wait_until(&pool, 1).await;
        assert_eq!(pool.snapshot()[0].authority(), "shelf-2:8000");
    }

    #[tokio::test]
    async fn unreadable_and_malformed_registrations_are_skipped() {
        let registry = FakeRegistry::new();
        registry.set_node("/shelf/shelf-1", b"http://shelf-1:8000");
        registry.set_unreadable("/shelf/shelf-2");
        registry.set_node("/shelf/shelf-3", b"not a url");
        registry.set_node("/shelf/shelf-4", b"http://shelf-4:8000");

        let pool = Arc::new(BackendPool::new());
        spawn_watcher(registry, pool.clone());

        wait_until(&pool, 2).await;
        let snapshot = pool.snapshot();
        assert_eq!(snapshot[0].authority(), "shelf-1:8000");
        assert_eq!(snapshot[1].authority(), "shelf-4:8000");
    }

    #[tokio::test]
    async fn one_change_event_triggers_exactly_one_reread() {
        let registry = FakeRegistry::new();
        registry.set_node("/shelf/shelf-1", b"http://shelf-1:8000");

        let pool = Arc::new(BackendPool::new());
        spawn_watcher(registry.clone(), pool.clone());
        wait_until(&pool, 1).await;
        let after_initial = registry.child_reads();

        registry.set_node("/shelf/shelf-2", b"http://shelf-2:8000");
        wait_until(&pool, 2).await;

        // Let any spurious extra cycle surface before counting.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(registry.child_reads(), after_initial + 1);
    }

    #[tokio::test]
    async fn read_failure_is_retried_until_it_heals() {
        let registry = FakeRegistry::new();
        registry.fail_child_reads(3);
        registry.set_node("/shelf/shelf-1", b"http://shelf-1:8000");

        let pool = Arc::new(BackendPool::new());
        spawn_watcher(registry, pool.clone());

        wait_until(&pool, 1).await;
    }
}
