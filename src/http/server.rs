//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the climate handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::climate::ClimateError;
use crate::config::{RelayConfig, UpstreamConfig};
use crate::http::handler::climate_handler;
use crate::observability::Telemetry;
use crate::upstream::{HyperTransport, Transport};

/// Route served by the relay.
pub const CLIMATE_ROUTE: &str = "/climate";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Telemetry,
    pub transport: Arc<dyn Transport>,
    pub upstream: Arc<UpstreamConfig>,
}

/// HTTP server for the climate relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server that reaches the upstream over a hyper-util client.
    pub fn new(config: RelayConfig, telemetry: Telemetry) -> Self {
        let transport = Arc::new(HyperTransport::new(&config.upstream));
        Self::with_transport(config, telemetry, transport)
    }

    /// Create a server with an explicit upstream transport.
    pub fn with_transport(config: RelayConfig, telemetry: Telemetry, transport: Arc<dyn Transport>) -> Self {
        let state = AppState {
            telemetry,
            transport,
            upstream: Arc::new(config.upstream.clone()),
        };

        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The router with all middleware, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
///
/// Every method is routed to the handler so non-GET requests are rejected
/// inside a traced span rather than by the router.
pub fn build_router(config: &RelayConfig, state: AppState) -> Router {
    let deadline = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

    Router::new()
        .route(CLIMATE_ROUTE, any(climate_handler))
        .with_state(state)
        .layer(deadline)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Map middleware failures (the inbound deadline) into the climate error
/// taxonomy so they answer like any other internal error.
async fn handle_middleware_error(err: BoxError) -> ClimateError {
    if err.is::<Elapsed>() {
        ClimateError::Internal("inbound request deadline exceeded".to_string())
    } else {
        ClimateError::Internal(format!("unhandled middleware error: {err}"))
    }
}
