mod action;
mod app;
mod app_state;
mod component;
mod components;
mod sync;
mod theme;
mod widgets;

use std::path::PathBuf;

use clap::Parser;

use roverr_proto::client::ApiClient;
use roverr_proto::config::Config;

/// Terminal dashboard for a Roverr backend.
#[derive(Debug, Parser)]
#[command(name = "roverr", version)]
struct Cli {
    /// Backend origin, e.g. http://nas:8000. Overrides the config file.
    #[arg(long)]
    server: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = roverr_proto::platform::log_path();
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("roverr log: {}", log_path.display());

    tracing::info!("roverr starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {}", e);
            Config::default()
        }),
    };
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    let client = ApiClient::new(&config.server.base_url);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    app::App::new(config, client).run().await
}
