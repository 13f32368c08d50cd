//! In-memory registry used by discovery tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::coordination::{Registry, RegistryError, RegistryEvent};

enum Payload {
    Data(Vec<u8>),
    Unreadable,
}

#[derive(Default)]
struct FakeState {
    nodes: BTreeMap<String, Payload>,
    watches: Vec<oneshot::Sender<RegistryEvent>>,
    child_reads: usize,
    failing_child_reads: usize,
}

impl FakeState {
    fn fire_watches(&mut self, event: RegistryEvent) {
        for watch in self.watches.drain(..) {
            let _ = watch.send(event);
        }
    }
}

/// Deterministic [`Registry`] double: a flat node map plus manually firing
/// one-shot watches. Any node mutation fires every armed watch, mirroring
/// how the real service notifies on child changes.
#[derive(Clone, Default)]
pub(crate) struct FakeRegistry {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake registry lock poisoned")
    }

    pub fn create_persistent(&self, path: &str) {
        let mut state = self.lock();
        state.nodes.insert(path.to_string(), Payload::Data(Vec::new()));
        state.fire_watches(RegistryEvent::ChildrenChanged);
    }

    pub fn set_node(&self, path: &str, payload: &[u8]) {
        let mut state = self.lock();
        state
            .nodes
            .insert(path.to_string(), Payload::Data(payload.to_vec()));
        state.fire_watches(RegistryEvent::ChildrenChanged);
    }

    pub fn set_unreadable(&self, path: &str) {
        let mut state = self.lock();
        state.nodes.insert(path.to_string(), Payload::Unreadable);
        state.fire_watches(RegistryEvent::ChildrenChanged);
    }

    /// Simulates the service dropping an ephemeral node on session loss.
    pub fn remove_node(&self, path: &str) {
        let mut state = self.lock();
        state.nodes.remove(path);
        state.fire_watches(RegistryEvent::ChildrenChanged);
    }

    pub fn payload(&self, path: &str) -> Option<Vec<u8>> {
        match self.lock().nodes.get(path) {
            Some(Payload::Data(payload)) => Some(payload.clone()),
            _ => None,
        }
    }

    /// How many times children have been listed (watch arms included).
    pub fn child_reads(&self) -> usize {
        self.lock().child_reads
    }

    /// Make the next `count` children listings fail.
    pub fn fail_child_reads(&self, count: usize) {
        self.lock().failing_child_reads = count;
    }

    fn children_of(state: &FakeState, base: &str) -> Vec<String> {
        let prefix = format!("{base}/");
        state
            .nodes
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(ToString::to_string)
            .collect()
    }
}

impl Registry for FakeRegistry {
    type Watch = oneshot::Receiver<RegistryEvent>;

    async fn ensure_path(&self, path: &str) -> Result<(), RegistryError> {
        let mut state = self.lock();
        if !state.nodes.contains_key(path) {
            state.nodes.insert(path.to_string(), Payload::Data(Vec::new()));
            state.fire_watches(RegistryEvent::ChildrenChanged);
        }
        Ok(())
    }

    async fn create_ephemeral(&self, path: &str, payload: &[u8]) -> Result<(), RegistryError> {
        let mut state = self.lock();
        if state.nodes.contains_key(path) {
            return Err(RegistryError::NodeExists(path.to_string()));
        }
        state
            .nodes
            .insert(path.to_string(), Payload::Data(payload.to_vec()));
        state.fire_watches(RegistryEvent::ChildrenChanged);
        Ok(())
    }

    async fn children_and_watch(
        &self,
        path: &str,
    ) -> Result<(Vec<String>, Self::Watch), RegistryError> {
        let mut state = self.lock();
        state.child_reads += 1;
        if state.failing_child_reads > 0 {
            state.failing_child_reads -= 1;
            return Err(RegistryError::Missing(path.to_string()));
        }
        let children = Self::children_of(&state, path);
        let (tx, rx) = oneshot::channel();
        state.watches.push(tx);
        Ok((children, rx))
    }

    async fn node_data(&self, path: &str) -> Result<Vec<u8>, RegistryError> {
        match self.lock().nodes.get(path) {
            Some(Payload::Data(payload)) => Ok(payload.clone()),
            _ => Err(RegistryError::Missing(path.to_string())),
        }
    }

    async fn wait_for_path(&self, path: &str) -> Result<(), RegistryError> {
        loop {
            let watch = {
                let mut state = self.lock();
                if state.nodes.contains_key(path) {
                    return Ok(());
                }
                let (tx, rx) = oneshot::channel();
                state.watches.push(tx);
                rx
            };
            let _ = watch.await;
        }
    }

    async fn watch_fired(&self, watch: Self::Watch) -> RegistryEvent {
        watch.await.unwrap_or(RegistryEvent::Other)
    }
}
