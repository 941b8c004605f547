//! Static asset server for the aurora web app.
//!
//! Serves the browser bundle; unmatched paths fall back to the entry page.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use aurora_relay::assets::StaticServer;
use aurora_relay::config::{load_config, load_env_file};
use aurora_relay::lifecycle::Shutdown;
use aurora_relay::observability::logging;

#[derive(Parser)]
#[command(name = "static-server")]
#[command(about = "Static file server for the aurora web app", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "AURORA_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Directory to serve (overrides `assets.root`).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Entry document relative to the root (overrides `assets.entry`).
    #[arg(long)]
    entry: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = load_env_file();
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    if let Some(root) = cli.root {
        config.assets.root = root;
    }
    if let Some(entry) = cli.entry {
        config.assets.entry = entry;
    }

    let entry = config.assets.root.join(&config.assets.entry);
    if !entry.is_file() {
        tracing::warn!(entry = %entry.display(), "Entry document does not exist");
    }

    let listener = TcpListener::bind(&config.assets.bind_address).await?;
    tracing::info!(
        "Frontend server running at http://{}",
        listener.local_addr()?
    );

    let shutdown = Shutdown::new();
    StaticServer::new(config.assets)
        .run(listener, shutdown.subscribe())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        let arg = Cli::command()
            .get_arguments()
            .find(|a| a.get_id() == "config")
            .cloned()
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("AURORA_RELAY_CONFIG")));
    }
}
