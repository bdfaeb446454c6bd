//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listen socket and spawns one Connection task per
//! accepted client. The client's host is resolved inside that task, so a slow
//! reverse lookup never holds up the accept loop.

use crate::network::{Connection, HostResolver};
use crate::state::ServerState;
use crate::telemetry::spans;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{Instrument, error, info, instrument};

/// The Gateway accepts incoming TCP connections and spawns their actors.
pub struct Gateway {
    listener: TcpListener,
    state: Arc<ServerState>,
    resolver: HostResolver,
    shutdown_tx: broadcast::Sender<()>,
}

impl Gateway {
    /// Bind the gateway to `addr`.
    pub async fn bind(
        addr: SocketAddr,
        state: Arc<ServerState>,
        resolver: HostResolver,
        shutdown_tx: broadcast::Sender<()>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %listener.local_addr()?, "Listener bound");

        Ok(Self {
            listener,
            state,
            resolver,
            shutdown_tx,
        })
    }

    /// The address actually bound (useful with port 0).
    #[cfg(test)]
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let id = self.state.session_ids.next();
                    info!(%id, %addr, "Connection accepted");

                    if let Err(e) = stream.set_nodelay(true) {
                        error!(%id, error = %e, "Failed to set TCP_NODELAY");
                    }

                    let state = Arc::clone(&self.state);
                    let resolver = self.resolver.clone();
                    let shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        let span = spans::connection(&id, &addr.ip().to_string());
                        async move {
                            let remote_host = resolver.resolve(addr.ip()).await;
                            Connection::new(id, stream, remote_host, state, shutdown_rx)
                                .run()
                                .await;
                        }
                        .instrument(span)
                        .await;
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
