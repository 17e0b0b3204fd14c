//! promptdeck server

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use promptdeck::{
    config::PromptDeckConfig,
    handlers::router,
    observability::{self, ObservabilityConfig},
    state::PromptDeckState,
};

#[derive(Parser)]
#[command(name = "promptdeck")]
#[command(version)]
#[command(about = "Hypermedia UI for prompt templates", long_about = None)]
struct Cli {
    /// Configuration file, instead of the standard locations
    #[arg(short, long, env = "PROMPTDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    /// Verbose logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = ObservabilityConfig::new("promptdeck");
    if cli.json_logs {
        logging = logging.with_json();
    }
    if cli.verbose {
        logging = logging.with_verbose();
    }
    observability::init(&logging)?;

    let mut config = match &cli.config {
        Some(path) => PromptDeckConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PromptDeckConfig::load()?,
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let addr = config.server.socket_addr()?;
    let state = PromptDeckState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "promptdeck listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("promptdeck stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
