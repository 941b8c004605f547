//! Aurora relay server.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 AURORA RELAY                 │
//!                          │                                              │
//!   Browser request        │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ───────────────────────┼─▶│  http  │──▶│ handlers │──▶│  predict   │──┼──▶ prediction script
//!                          │  │ server │   │ api.rs   │   │  invoker   │  │    (one process each)
//!                          │  └────────┘   └────┬─────┘   └────────────┘  │
//!                          │                    │         ┌────────────┐  │
//!                          │                    ├────────▶│  upstream  │──┼──▶ generative-text API
//!                          │                    │         │  gemini    │  │
//!                          │                    │         ├────────────┤  │
//!                          │                    └────────▶│  tts       │──┼──▶ speech API
//!   Browser response       │  ┌──────────┐               └────────────┘  │
//!   ◀──────────────────────┼──│ response │◀── JSON / audio / error        │
//!                          │  └──────────┘                                │
//!                          │  config · observability · lifecycle          │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use aurora_relay::config::{load_config, load_env_file};
use aurora_relay::http::RelayServer;
use aurora_relay::lifecycle::Shutdown;
use aurora_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "aurora-relay")]
#[command(about = "HTTP relay for the aurora space-weather app", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "AURORA_RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = load_env_file();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("aurora-relay v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        prediction_command = ?config.prediction.command,
        max_concurrent_predictions = config.prediction.max_concurrent,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = RelayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
