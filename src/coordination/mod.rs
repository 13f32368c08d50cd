//! Coordination service client subsystem.
//!
//! # Data Flow
//! ```text
//! gateway / shelf backend startup
//!     → zk.rs connect (bounded timeout, fatal on failure)
//!     → registry.rs trait object of primitives:
//!         ensure_path / create_ephemeral     (registration)
//!         children_and_watch / node_data     (membership reads)
//!         wait_for_path / watch_fired        (barriers & notifications)
//! ```
//!
//! # Design Decisions
//! - The discovery logic depends on the [`Registry`] trait, not on the
//!   ZooKeeper client, so the watch/re-arm loop and the registrar are
//!   testable against an in-memory registry
//! - Watches are one-shot by contract; `children_and_watch` arms the watch
//!   atomically with the read so no change between read and arm is lost
//! - Ephemeral nodes are removed by the service on session loss; nothing in
//!   this codebase ever deletes a registration explicitly

pub mod registry;
pub mod zk;

pub use registry::{Registry, RegistryError, RegistryEvent};
pub use zk::ZkRegistry;
