//! Shared routing table: membership snapshot + rotation cursor.

use std::sync::Mutex;

use crate::load_balancer::backend::BackendAddress;

/// Interior state guarded by the pool mutex.
///
/// `cursor` is the index of the last backend dispatched to; `None` means no
/// dispatch has happened yet against the current snapshot, or the snapshot
/// shrank below the old cursor and rotation restarts from the front.
#[derive(Debug, Default)]
struct PoolState {
    backends: Vec<BackendAddress>,
    cursor: Option<usize>,
}

/// The live set of registered backends plus the round-robin cursor.
///
/// One handle is shared between the membership watcher (writer via
/// [`replace`](Self::replace)) and request handlers (readers via
/// [`select`](Self::select)). A single mutex guards both fields: the length
/// read, the cursor advance and the element pick happen under one lock
/// acquisition, which is what makes concurrent dispatch strictly fair. The
/// lock is never held across I/O.
#[derive(Debug, Default)]
pub struct BackendPool {
    state: Mutex<PoolState>,
}

impl BackendPool {
    /// Create an empty pool. Membership arrives from the watcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot with a freshly built membership list.
    ///
    /// The cursor survives a replacement while it still indexes into the new
    /// list, keeping rotation smooth across small membership changes. It is
    /// reset when the pool empties or shrank below it.
    pub fn replace(&self, backends: Vec<BackendAddress>) {
        let mut state = self.state.lock().expect("backend pool lock poisoned");
        match state.cursor {
            Some(cursor) if cursor >= backends.len() => state.cursor = None,
            _ => {}
        }
        state.backends = backends;
    }

    /// Pick the next backend in rotation, or `None` when the pool is empty.
    ///
    /// Never blocks waiting for membership: an empty pool is the caller's
    /// problem to report, immediately.
    pub fn select(&self) -> Option<BackendAddress> {
        let mut state = self.state.lock().expect("backend pool lock poisoned");
        let len = state.backends.len();
        if len == 0 {
            state.cursor = None;
            return None;
        }
        let next = match state.cursor {
            Some(cursor) => (cursor + 1) % len,
            None => 0,
        };
        state.cursor = Some(next);
        Some(state.backends[next].clone())
    }

    /// Number of currently registered backends.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .expect("backend pool lock poisoned")
            .backends
            .len()
    }

    /// True when no backend is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the current snapshot, in registration-read order.
    pub fn snapshot(&self) -> Vec<BackendAddress> {
        self.state
            .lock()
            .expect("backend pool lock poisoned")
            .backends
            .clone()
    }
}
