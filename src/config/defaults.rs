//! Default value functions for configuration.
//!
//! Separated into its own module for reuse by serde attributes and `Default`
//! impls.

// =============================================================================
// Limits Defaults
// =============================================================================

pub fn default_max_line_len() -> usize {
    skerry_proto::line::DEFAULT_MAX_LINE_LEN
}

pub fn default_mailbox_capacity() -> usize {
    256
}

pub fn default_authority_queue() -> usize {
    1024
}

// =============================================================================
// MOTD Defaults
// =============================================================================

pub fn default_motd_lines() -> Vec<String> {
    vec!["Welcome to Skerry.".to_string()]
}
