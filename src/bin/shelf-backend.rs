//! Shelf backend.
//!
//! A dynamic-content replica that registers itself with the coordination
//! service at startup. The registration record is ephemeral: when this
//! process dies or loses its session, the service withdraws it and the
//! gateway stops routing here; there is no explicit deregistration.
//!
//! The real content handlers (catalog rendering, storage gateway) live
//! outside this repository; this binary answers with its identity so that
//! rotation across replicas is observable end to end.

use std::sync::Arc;

use axum::{extract::State, routing::any, Router};
use clap::Parser;
use tokio::net::TcpListener;

use shelf_gateway::config::loader::load_backend_config;
use shelf_gateway::coordination::ZkRegistry;
use shelf_gateway::discovery::Registrar;
use shelf_gateway::lifecycle::{signals, Shutdown};
use shelf_gateway::load_balancer::BackendAddress;
use shelf_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "shelf-backend")]
#[command(about = "Self-registering dynamic-content backend", long_about = None)]
struct Cli {
    /// Backend identifier; also the registration node name.
    #[arg(long)]
    id: Option<String>,

    /// Listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Coordination service addresses.
    #[arg(long)]
    zookeeper: Option<String>,

    /// Hostname to advertise instead of the backend id.
    #[arg(long)]
    advertise_host: Option<String>,

    /// Block until the registration base path exists before publishing.
    #[arg(long)]
    wait_for_base_path: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_backend_config()?;
    if let Some(id) = cli.id {
        config.id = id;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(hosts) = cli.zookeeper {
        config.coordination.hosts = hosts;
    }
    if let Some(host) = cli.advertise_host {
        config.advertise_host = Some(host);
    }
    if cli.wait_for_base_path {
        config.wait_for_base_path = true;
    }

    logging::init(&config.log_filter);
    tracing::info!(id = %config.id, "shelf-backend starting");

    let address = BackendAddress::parse(&config.advertised_url())?;

    // The session itself is required; without it the ephemeral record could
    // never exist and the process would be unreachable for dynamic traffic.
    let registry = ZkRegistry::connect(&config.coordination).await?;
    let registrar = Registrar::new(
        registry,
        config.coordination.base_path.clone(),
        config.id.clone(),
    );

    if config.wait_for_base_path {
        registrar.wait_for_base().await?;
    }

    // Registration failure is not fatal: keep serving, just without dynamic
    // traffic from the gateway.
    if let Err(error) = registrar.publish(&address).await {
        tracing::warn!(%error, "registration failed; serving without dynamic traffic");
    }

    let app = Router::new()
        .route("/", any(identity_handler))
        .route("/{*path}", any(identity_handler))
        .with_state(config.id.clone());

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn(signals::listen_for_signals(shutdown.clone()));
    let mut shutdown_rx = shutdown.subscribe();

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, advertised = %address, "listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    Ok(())
}

/// Answer with this replica's identity.
async fn identity_handler(State(id): State<String>) -> String {
    format!("served by {id}\n")
}
