//! Discovery-Driven Library Gateway

pub mod config;
pub mod coordination;
pub mod discovery;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use load_balancer::pool::BackendPool;
