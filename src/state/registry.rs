//! Peer registry: session id to display identity.
//!
//! Read by every connection actor when it renders a relay, written only by
//! the actor that owns the entry. Lookups clone the entry so no shard guard
//! outlives the call.

use super::SessionId;
use crate::error::RegistryError;
use dashmap::DashMap;
use skerry_proto::Prefix;

/// One registry row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerEntry {
    pub nickname: Option<String>,
    pub login_name: Option<String>,
    pub remote_host: String,
    pub mode: Option<String>,
}

/// Who a message is from, as stamped into its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayIdentity {
    pub nickname: String,
    pub login_name: String,
    pub remote_host: String,
}

impl DisplayIdentity {
    /// `nickname!loginName@remoteHost`
    pub fn prefix(&self) -> Prefix {
        Prefix::new(&self.nickname, &self.login_name, &self.remote_host)
    }
}

/// Fields an actor may update in its own entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerField {
    Nickname,
    LoginName,
    Mode,
}

/// Concurrent directory of connected sessions.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    entries: DashMap<SessionId, PeerEntry>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry for a freshly accepted session.
    pub fn register(&self, id: SessionId, remote_host: impl Into<String>) {
        self.entries.insert(
            id,
            PeerEntry {
                remote_host: remote_host.into(),
                ..PeerEntry::default()
            },
        );
    }

    /// Resolve a session to the identity used as message origin.
    pub fn lookup(&self, id: SessionId) -> Result<DisplayIdentity, RegistryError> {
        let entry = self
            .entries
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(RegistryError::NotFound(id))?;

        Ok(DisplayIdentity {
            nickname: entry.nickname.unwrap_or_else(|| "*".to_string()),
            login_name: entry.login_name.unwrap_or_else(|| "*".to_string()),
            remote_host: entry.remote_host,
        })
    }

    /// Snapshot of the raw entry.
    #[cfg(test)]
    pub fn entry(&self, id: SessionId) -> Option<PeerEntry> {
        self.entries.get(&id).map(|e| e.value().clone())
    }

    /// Set one field of the caller's own entry.
    pub fn update_own_entry(
        &self,
        id: SessionId,
        field: PeerField,
        value: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let mut entry = self.entries.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        let value = Some(value.into());
        match field {
            PeerField::Nickname => entry.nickname = value,
            PeerField::LoginName => entry.login_name = value,
            PeerField::Mode => entry.mode = value,
        }
        Ok(())
    }

    pub fn remove(&self, id: SessionId) {
        self.entries.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_composes_origin_prefix() {
        let registry = PeerRegistry::new();
        let id = SessionId::new(7);
        registry.register(id, "host1");
        registry.update_own_entry(id, PeerField::Nickname, "bob").unwrap();
        registry.update_own_entry(id, PeerField::LoginName, "bobby").unwrap();

        let identity = registry.lookup(id).unwrap();
        assert_eq!(identity.prefix().to_string(), "bob!bobby@host1");
    }

    #[test]
    fn missing_entries_are_not_found() {
        let registry = PeerRegistry::new();
        let id = SessionId::new(3);
        assert_eq!(registry.lookup(id), Err(RegistryError::NotFound(id)));
        assert_eq!(
            registry.update_own_entry(id, PeerField::Mode, "+i"),
            Err(RegistryError::NotFound(id))
        );

        registry.register(id, "host1");
        registry.remove(id);
        assert!(registry.lookup(id).is_err());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn mode_updates_touch_only_mode() {
        let registry = PeerRegistry::new();
        let id = SessionId::new(9);
        registry.register(id, "host1");
        registry.update_own_entry(id, PeerField::Mode, "+i").unwrap();

        let entry = registry.entry(id).unwrap();
        assert_eq!(entry.mode.as_deref(), Some("+i"));
        assert_eq!(entry.nickname, None);
        assert_eq!(entry.remote_host, "host1");
    }
}
