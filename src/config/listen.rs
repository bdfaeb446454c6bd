//! Network listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6667").
    pub address: SocketAddr,
    /// Reverse-resolve client addresses on accept.
    /// When off (or when the lookup fails) the textual IP is the host.
    #[serde(default)]
    pub resolve_hostnames: bool,
}
