//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Load config → Validate → Connect coordination session (fatal on
//!     failure) → Spawn membership watcher → Serve
//!
//! Shutdown (shutdown.rs + signals.rs):
//!     SIGTERM/SIGINT → broadcast shutdown → server drains → process exit
//!     (the watcher task is detached and dies with the process; membership
//!     is re-derived from the coordination service on the next boot)
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
