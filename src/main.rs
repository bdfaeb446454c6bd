//! skerryd - Skerry chat daemon
//!
//! A small IRC-style server: one actor per connection, one central authority
//! for nicknames and channels.

mod authority;
mod config;
mod error;
mod network;
mod state;
mod telemetry;

use crate::authority::Authority;
use crate::config::{Config, LogFormat};
use crate::network::{Gateway, HostResolver};
use crate::state::ServerState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info};

/// How long connections get to send their closing line on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "skerryd.toml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => {
            telemetry::init(config.logging.format);
            config
        }
        Err(e) => {
            telemetry::init(LogFormat::default());
            error!(path = %config_path, error = %e, "Failed to load config");
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        error!(path = %config_path, error = %e, "Invalid config");
        return Err(e.into());
    }

    info!(
        server = %config.server.name,
        network = %config.server.network,
        description = %config.server.description,
        "Starting skerryd"
    );

    let authority = Authority::spawn(&config);
    let resolver = HostResolver::new(config.listen.resolve_hostnames);
    let listen_addr = config.listen.address;
    let state = Arc::new(ServerState::new(config, authority));

    let (shutdown_tx, _) = broadcast::channel(1);
    let gateway = Gateway::bind(listen_addr, state, resolver, shutdown_tx.clone()).await?;

    info!("Server ready");

    tokio::select! {
        result = gateway.run() => {
            if let Err(e) = result {
                error!(error = %e, "Gateway error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(());
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
