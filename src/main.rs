//! Library Gateway
//!
//! A reverse proxy that splits traffic between a fixed static origin and a
//! pool of dynamically discovered shelf backends.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                 SHELF GATEWAY                 │
//!                       │                                               │
//!    Client Request     │  ┌────────┐   ┌────────────┐   ┌───────────┐ │
//!    ───────────────────┼─▶│  http  │──▶│  routing   │──▶│load_balan-│ │
//!                       │  │ server │   │ classifier │   │ cer pool  │ │
//!                       │  └────────┘   └─────┬──────┘   └─────┬─────┘ │
//!                       │                     │ static         │       │
//!                       │                     ▼                ▼       │
//!    Client Response    │              ┌────────────┐   ┌───────────┐  │
//!    ◀──────────────────┼──────────────│fixed origin│   │ discovered│◀─┼── shelf
//!                       │              │ forwarder  │   │  backend  │  │   backends
//!                       │              └────────────┘   └───────────┘  │
//!                       │                                      ▲       │
//!                       │  ┌────────────────────────────┐      │       │
//!                       │  │ discovery membership       │──────┘       │
//!                       │  │ watcher (one background    │  snapshot    │
//!                       │  │ task, perpetual re-arm)    │  replace     │
//!                       │  └─────────────▲──────────────┘              │
//!                       └────────────────┼─────────────────────────────┘
//!                                        │ one-shot watches
//!                              coordination service (ZooKeeper)
//!                                        ▲
//!                                        │ ephemeral registration
//!                                  shelf backends
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use shelf_gateway::config::load_gateway_config;
use shelf_gateway::coordination::ZkRegistry;
use shelf_gateway::discovery::MembershipWatcher;
use shelf_gateway::lifecycle::{signals, Shutdown};
use shelf_gateway::observability::{logging, metrics};
use shelf_gateway::{BackendPool, GatewayServer};

#[derive(Parser)]
#[command(name = "shelf-gateway")]
#[command(about = "Discovery-driven gateway for library content", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. The environment wins over it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_gateway_config(cli.config.as_deref())?;

    logging::init(&config.observability.log_filter);
    tracing::info!("shelf-gateway starting");

    if config.observability.metrics_enabled {
        // Address validity is checked by config validation.
        if let Ok(address) = config.observability.metrics_address.parse() {
            metrics::init_metrics(address);
        }
    }

    // No session, no dynamic traffic: connect failure here is fatal.
    let registry = ZkRegistry::connect(&config.coordination).await?;

    let pool = Arc::new(BackendPool::new());
    let watcher = MembershipWatcher::new(
        registry,
        config.coordination.base_path.clone(),
        pool.clone(),
    );
    tokio::spawn(watcher.run());

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn(signals::listen_for_signals(shutdown.clone()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        static_origin = %config.static_origin.url,
        dynamic_prefix = %config.routing.dynamic_prefix,
        "listening"
    );

    let server = GatewayServer::new(&config, pool)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
