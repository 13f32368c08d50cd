//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared by value/Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the only runtime-mutable state in the
//!   process is backend membership, which comes from the coordination
//!   service, never from config reload
//! - All fields have defaults so a bare `shelf-gateway` invocation works
//!   against a local ZooKeeper and static origin
//! - Environment variables win over the file: deployments drive these
//!   services entirely through the environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_gateway_config, ConfigError};
pub use schema::BackendConfig;
pub use schema::CoordinationConfig;
pub use schema::GatewayConfig;
