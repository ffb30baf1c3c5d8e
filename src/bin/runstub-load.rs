//! # runstub-load
//!
//! Load generator for a running runstub instance. Spawns a fixed number of
//! virtual users that hit `GET /run` in a loop, then prints a JSON report.
//! Exits with status 1 if any request was answered with something other than
//! `200` or `401`, or failed at the transport level.

use std::time::Duration;

use clap::Parser;
use tracing::info;

use runstub::loadtest::{self, LoadOptions};
use runstub::RunstubClient;

/// Hammer `GET /run` and report status counts.
#[derive(Parser)]
#[command(name = "runstub-load", version)]
struct Cli {
    /// Base URL of the service.
    #[arg(long, env = "BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,
    /// Credential sent as `X-API-Key` (omitted when empty).
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Number of concurrent virtual users.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    vus: u16,
    /// Length of the run in seconds.
    #[arg(long, default_value_t = 30)]
    duration_secs: u64,
    /// Pause between requests of one virtual user, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pause_ms: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = match RunstubClient::new(&cli.base_url, cli.api_key) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("runstub-load: {e}");
            std::process::exit(1);
        }
    };

    let opts = LoadOptions {
        vus: usize::from(cli.vus),
        duration: Duration::from_secs(cli.duration_secs),
        pause: Duration::from_millis(cli.pause_ms),
    };

    info!(
        "{} virtual users against {} for {}s",
        opts.vus,
        client.base_url(),
        cli.duration_secs
    );

    let report = loadtest::run_load(&client, &opts).await;
    println!("{}", report.summary());

    if !report.all_passed() {
        std::process::exit(1);
    }
}
