//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (request counters, latency histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events via the tower-http layers
//! - Metric updates are cheap and recorded even when no exporter is
//!   installed (the metrics crate no-ops without a recorder)

pub mod logging;
pub mod metrics;
