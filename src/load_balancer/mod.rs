//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Membership watcher observes a registration change
//!     → pool.rs replace() (wholesale snapshot swap)
//!
//! Dynamic request arrives
//!     → pool.rs select() (rotate cursor, pick address)
//!     → http layer forwards to the chosen address
//! ```
//!
//! # Design Decisions
//! - Snapshot and rotation cursor live behind ONE mutex; the length read,
//!   cursor advance and element pick form a single critical section, so
//!   concurrent requests cannot pair a stale length with a fresh cursor
//! - The snapshot is replaced wholesale, never mutated incrementally; a
//!   dispatch always observes a fully-built list
//! - An empty pool is an immediate miss, never a wait condition
//! - Request outcomes never touch membership; only the watcher writes here

pub mod backend;
pub mod pool;

pub use backend::{AddressError, BackendAddress};
pub use pool::BackendPool;
