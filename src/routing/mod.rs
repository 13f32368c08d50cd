//! Request classification subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → classifier.rs (dynamic prefix check)
//!     → Dynamic: pick from the discovered pool
//!     → Static: fixed origin
//! ```
//!
//! # Design Decisions
//! - Plain prefix matching, no regex in the hot path
//! - Deterministic: same path always classifies the same way
//! - The prefix is fixed at startup; membership is the only thing that
//!   changes at runtime

pub mod classifier;

pub use classifier::{Classifier, RequestClass};
