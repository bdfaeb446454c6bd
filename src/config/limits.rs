//! Line, mailbox and queue size configuration.

use super::defaults::{default_authority_queue, default_mailbox_capacity, default_max_line_len};
use serde::Deserialize;

/// Resource limits.
///
/// Every queue in the daemon is bounded; these set the bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted inbound line in bytes, CRLF included (default: 512).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Connection actor mailbox capacity (default: 256).
    /// Relays to a full mailbox are dropped rather than waited on.
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
    /// Central authority request queue (default: 1024).
    #[serde(default = "default_authority_queue")]
    pub authority_queue: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            mailbox_capacity: default_mailbox_capacity(),
            authority_queue: default_authority_queue(),
        }
    }
}
