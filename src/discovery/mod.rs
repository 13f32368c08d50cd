//! Backend discovery subsystem.
//!
//! # Data Flow
//! ```text
//! Shelf backend startup:
//!     registrar.rs publish()
//!         → ensure base path (tolerate exists)
//!         → create ephemeral child with own address as payload
//!
//! Gateway lifetime:
//!     watcher.rs run()  [one long-lived task]
//!         → read children + arm one-shot watch (atomic)
//!         → read each child's address, skip unreadable ones
//!         → BackendPool::replace (wholesale)
//!         → await watch, repeat
//! ```
//!
//! # Design Decisions
//! - The watcher is an explicit loop, not a recursive re-subscription, so
//!   long-running high-churn membership cannot grow the call stack
//! - Transient registry errors are logged and retried; the loop exiting
//!   would silently freeze the routing table for the rest of the process
//! - Registration failure is non-fatal to a backend: it keeps serving, it
//!   just never appears in a snapshot

pub mod registrar;
pub mod watcher;

#[cfg(test)]
pub(crate) mod testing;

pub use registrar::Registrar;
pub use watcher::MembershipWatcher;
