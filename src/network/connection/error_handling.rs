//! Containment of per-message failures.
//!
//! Everything that reaches here has already aborted exactly one mailbox
//! message. The session keeps running; only the log level differs.

use crate::error::SessionError;
use skerry_proto::MessageParseError;
use tracing::{debug, trace, warn};

/// Log a non-terminal failure together with the line that caused it.
pub(super) fn report_contained(error: &SessionError, input: Option<&str>) {
    let input = input.unwrap_or("");
    match error {
        // Blank keep-alive lines are common and harmless
        SessionError::Parse(MessageParseError::EmptyMessage) => {
            trace!("Ignoring empty line");
        }
        SessionError::Parse(e) => {
            warn!(input, error = %e, error_code = error.error_code(), "Dropping malformed line");
        }
        SessionError::Unreadable(e) => {
            warn!(error = %e, error_code = error.error_code(), "Dropping unreadable line");
        }
        SessionError::UnknownCommand(name) => {
            debug!(command = %name, "Ignoring unrecognized command");
        }
        SessionError::Authority { command, source } => {
            warn!(
                input,
                command,
                reason = %source,
                numeric = ?source.numeric().map(|r| r.code()),
                error_code = error.error_code(),
                "Command refused by authority"
            );
        }
        SessionError::IdentityResolution(e) => {
            debug!(error = %e, "Dropping relay from vanished session");
        }
        SessionError::Transport(e) => {
            warn!(error = %e, "Transport failure");
        }
    }
}
