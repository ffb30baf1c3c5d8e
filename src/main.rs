#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # runstub
//!
//! Minimal HTTP service: a liveness probe, a version report and a placeholder
//! `run` action gated by an optional static API key.
//!
//! ## API surface
//!
//! | Method | Path       | Auth         | Description                  |
//! |--------|------------|--------------|------------------------------|
//! | GET    | `/healthz` | No           | Liveness probe, body `ok`    |
//! | GET    | `/version` | No           | `{"version","commit","date"}` |
//! | GET    | `/run`     | `X-API-Key`* | `{"timestamp","result"}`     |
//!
//! *Required only when `API_KEY` (or `auth.api_key`) is non-empty.
//!
//! ## Environment
//!
//! - `PORT`: listen port (default 8080)
//! - `API_KEY`: credential for `/run` (empty = open)
//! - `RUST_LOG`: tracing filter

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use runstub::{routes, AppState, BuildInfo, Config};

/// Minimal HTTP service with liveness, version and a key-gated run endpoint.
#[derive(Parser)]
#[command(name = "runstub", version = BuildInfo::current().version)]
struct Cli {
    /// Path to TOML config file.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("runstub: configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    run_server(config).await;
}

async fn run_server(config: Config) {
    let build = BuildInfo::current();
    info!(
        "runstub {} (commit {}) starting",
        build.version, build.commit
    );

    if config.auth.credential().is_none() {
        warn!("API_KEY not set; /run is open to all callers");
    }

    let addr = config.listen_addr();
    let state = AppState::new(config, build);
    let app = routes::router(state);

    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!("starting server on {addr}");

    // Graceful shutdown
    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("Received SIGINT"),
                        _ = sigterm.recv() => info!("Received SIGTERM"),
                    }
                }
                Err(e) => {
                    warn!("Failed to register SIGTERM handler: {e}");
                    ctrl_c.await.ok();
                    info!("Received SIGINT");
                }
            }
        }
        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
            info!("Received SIGINT");
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Goodbye");
}
