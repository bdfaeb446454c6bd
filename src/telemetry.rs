//! Log subscriber setup and span constructors.

use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// filter.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Standardized span constructors.
pub mod spans {
    use crate::state::SessionId;
    use tracing::{Span, debug_span, info_span};

    /// Create a span for a client connection.
    pub fn connection(id: &SessionId, ip: &str) -> Span {
        info_span!("connection", id = %id, ip = %ip)
    }

    /// Create a span for one command. `source` is the sender's nickname or `*`.
    pub fn command(name: &str, source: &str) -> Span {
        debug_span!("command", name = %name, source = %source)
    }
}
