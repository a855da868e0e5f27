//! OpenSky flight-state proxy.
//!
//! Forwards bounding-box queries to the OpenSky `states/all` endpoint,
//! injects optional Basic credentials, bounds the upstream call with a
//! deadline and normalizes failures into a JSON envelope.
//!
//! ```text
//!     Client                 ┌──────────────────────────────────────────┐
//!     GET /api/opensky       │  request id → trace → CORS → budget      │
//!     ?lamin&lomin&...  ────▶│        │                                 │
//!                            │        ▼                                 │
//!                            │  ProxyHandler ── one call, 10s deadline ─┼──▶ opensky-network.org
//!                            │        │                                 │
//!     passthrough body  ◀────│        ▼                                 │
//!     or {error,time,states} │  response mapping (429/504/500)          │
//!                            └──────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use opensky_proxy::config::{load_config, Credentials, ProxyConfig};
use opensky_proxy::lifecycle::signals::spawn_signal_handler;
use opensky_proxy::observability::{logging, metrics};
use opensky_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "opensky-proxy")]
#[command(about = "HTTP proxy for OpenSky flight-state queries", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    config.credentials = Credentials::from_env();

    logging::init_logging(&config.observability);

    tracing::info!("opensky-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        route = %config.listener.route_path,
        upstream_timeout_ms = config.upstream.timeout_ms,
        execution_budget_secs = config.timeouts.execution_budget_secs,
        authenticated = config.credentials.pair().is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let bind_address: SocketAddr = config.listener.bind_address.parse()?;
    let listener = TcpListener::bind(bind_address).await?;

    let shutdown = Shutdown::new();
    spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
