//! Climate relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                  CLIMATE RELAY                    │
//!                         │                                                   │
//!     GET /climate        │  ┌─────────┐    ┌─────────┐    ┌──────────────┐  │
//!     zip_code: 01001000  │  │  http   │───▶│ climate │───▶│   upstream   │  │
//!     ────────────────────┼─▶│ handler │    │ usecase │    │    client    │──┼──▶ Climate
//!                         │  └─────────┘    └─────────┘    └──────────────┘  │    Provider
//!     JSON / text error   │       ▲              span            span        │
//!     ◀───────────────────┼───────┘                                          │
//!                         │  ┌────────────────────────────────────────────┐  │
//!                         │  │  config │ observability │ lifecycle        │  │
//!                         │  └────────────────────────────────────────────┘  │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use climate_relay::config::{load_config, validate_config, ConfigError, RelayConfig};
use climate_relay::lifecycle::{wait_for_signal, Shutdown};
use climate_relay::observability::{logging, metrics, Telemetry};
use climate_relay::HttpServer;

#[derive(Parser)]
#[command(name = "climate-relay")]
#[command(about = "Relays climate lookups by postal code to an upstream provider", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind_address: Option<String>,

    /// Override `upstream.url`.
    #[arg(long)]
    upstream_url: Option<String>,

    /// Override `telemetry.zipkin_endpoint`.
    #[arg(long)]
    zipkin_endpoint: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RelayConfig::default(),
        };

        if let Some(addr) = self.bind_address {
            config.listener.bind_address = addr;
        }
        if let Some(url) = self.upstream_url {
            config.upstream.url = url;
        }
        if let Some(endpoint) = self.zipkin_endpoint {
            config.telemetry.zipkin_endpoint = endpoint;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(config.observability.log_format);
    tracing::info!("climate-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    let telemetry = Telemetry::init(&config.telemetry)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    let served = HttpServer::new(config, telemetry.clone())
        .run(listener, server_shutdown)
        .await;

    if let Err(e) = telemetry.shutdown() {
        tracing::warn!(error = %e, "Failed to flush spans");
    }

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}
