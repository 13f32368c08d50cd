//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Classify each request and dispatch it: discovered pool or fixed origin
//! - Forward via a single-use reverse-proxy transform, relay the response
//!
//! # Design Decisions
//! - Requests are forwarded unmodified: method, headers and body pass
//!   through, only scheme/authority are rewritten to the chosen target
//! - A dynamic request with an empty pool fails immediately with 500; it
//!   never waits for membership
//! - A forwarding failure is relayed as 502; no second backend is tried and
//!   membership is never touched based on a request outcome

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::request::UuidRequestId;
use crate::load_balancer::{AddressError, BackendAddress, BackendPool};
use crate::observability::metrics;
use crate::routing::{Classifier, RequestClass};

/// Application state injected into the proxy handler.
#[derive(Clone)]
pub struct AppState {
    pool: Arc<BackendPool>,
    classifier: Classifier,
    static_origin: BackendAddress,
    client: Client<HttpConnector, Body>,
}

/// The gateway's HTTP server.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    /// Build the server around the shared backend pool.
    pub fn new(config: &GatewayConfig, pool: Arc<BackendPool>) -> Result<Self, AddressError> {
        let static_origin = BackendAddress::parse(&config.static_origin.url)?;
        let classifier = Classifier::new(config.routing.dynamic_prefix.clone());
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            pool,
            classifier,
            static_origin,
            client,
        };

        Ok(Self {
            router: Self::build_router(config, state),
        })
    }

    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Serve until the shutdown signal fires, then drain gracefully.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let address = listener.local_addr()?;
        tracing::info!(%address, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Classify and dispatch one request.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let class = state.classifier.classify(request.uri().path());

    match class {
        RequestClass::Dynamic => {
            let Some(backend) = state.pool.select() else {
                tracing::warn!(path = %request.uri().path(), "no backend registered for dynamic content");
                metrics::record_request(class.as_str(), 500, "none", start);
                return (StatusCode::INTERNAL_SERVER_ERROR, "no backend available")
                    .into_response();
            };
            forward(&state, &backend, class, request, start).await
        }
        RequestClass::Static => {
            let origin = state.static_origin.clone();
            forward(&state, &origin, class, request, start).await
        }
    }
}

/// Single-use reverse-proxy transform: point the request at `target`, send
/// it, relay the response verbatim.
async fn forward(
    state: &AppState,
    target: &BackendAddress,
    class: RequestClass,
    request: Request,
    start: Instant,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let Some(uri) = rewrite_uri(&parts.uri, target) else {
        tracing::error!(backend = %target, "failed to build upstream URI");
        metrics::record_request(class.as_str(), 502, target.as_str(), start);
        return (StatusCode::BAD_GATEWAY, "invalid upstream address").into_response();
    };
    parts.uri = uri;

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(backend = %target, status = %status, class = class.as_str(), "relayed upstream response");
            metrics::record_request(class.as_str(), status.as_u16(), target.as_str(), start);

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(error) => {
            tracing::error!(backend = %target, %error, "upstream request failed");
            metrics::record_request(class.as_str(), 502, target.as_str(), start);
            (StatusCode::BAD_GATEWAY, "upstream request failed").into_response()
        }
    }
}

/// Swap scheme and authority for the target, keeping path and query intact.
fn rewrite_uri(original: &Uri, target: &BackendAddress) -> Option<Uri> {
    let scheme = Scheme::try_from(target.scheme()).ok()?;
    let authority = Authority::try_from(target.authority().as_str()).ok()?;

    let mut parts = original.clone().into_parts();
    parts.scheme = Some(scheme);
    parts.authority = Some(authority);
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Uri::from_parts(parts).ok()
}
