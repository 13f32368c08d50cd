//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all proxy handler)
//!     → request.rs (request ID layer)
//!     → routing classifier decides dynamic vs static
//!     → pool selection (dynamic) or fixed origin (static)
//!     → single-use reverse-proxy transform, response relayed verbatim
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::GatewayServer;
