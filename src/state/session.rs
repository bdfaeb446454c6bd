//! The per-connection session record.
//!
//! Owned by exactly one connection actor. Nothing here talks to the network;
//! the actor decides when fields change and when login completion runs.

use super::SessionId;
use skerry_proto::irc_eq;

/// What a USER command declares about the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub login_name: String,
    pub declared_hostname: String,
    pub declared_server_name: String,
    pub real_name: String,
}

/// Mutable state of one connection.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    /// Unset until a NICK is accepted.
    pub nickname: Option<String>,
    /// Resolved once at accept time.
    pub remote_host: String,
    /// Set once by USER.
    pub identity: Option<Identity>,
    pub mode: Option<String>,
    logged_in: bool,
}

impl Session {
    pub fn new(id: SessionId, remote_host: impl Into<String>) -> Self {
        Self {
            id,
            nickname: None,
            remote_host: remote_host.into(),
            identity: None,
            mode: None,
            logged_in: false,
        }
    }

    /// Name replies are addressed to: the nickname, or `*` before one exists.
    pub fn addressee(&self) -> &str {
        self.nickname.as_deref().unwrap_or("*")
    }

    /// Both halves of the handshake are present and login has not run yet.
    pub fn login_ready(&self) -> bool {
        !self.logged_in
            && self.nickname.as_deref().is_some_and(|nick| !nick.is_empty())
            && self.identity.is_some()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn mark_logged_in(&mut self) {
        self.logged_in = true;
    }

    /// Whether `nick` names this session (IRC case mapping).
    pub fn is_own_nickname(&self, nick: &str) -> bool {
        self.nickname
            .as_deref()
            .is_some_and(|own| irc_eq(own, nick))
    }
}
