//! State management module.
//!
//! Contains the per-connection [`Session`] record, the shared
//! [`PeerRegistry`], and [`ServerState`], the bundle every connection actor
//! is handed at spawn time.

mod registry;
mod session;
mod uid;

pub use registry::{PeerField, PeerRegistry};
pub use session::{Identity, Session};
pub use uid::{SessionId, SessionIdGenerator};

use crate::authority::AuthorityHandle;
use crate::config::Config;

/// Process-wide state shared by all connections.
pub struct ServerState {
    pub config: Config,
    pub registry: PeerRegistry,
    pub authority: AuthorityHandle,
    pub session_ids: SessionIdGenerator,
}

impl ServerState {
    pub fn new(config: Config, authority: AuthorityHandle) -> Self {
        Self {
            config,
            registry: PeerRegistry::new(),
            authority,
            session_ids: SessionIdGenerator::new(),
        }
    }
}
