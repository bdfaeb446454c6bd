//! Reverse DNS for client addresses.
//!
//! Run once per connection before its actor starts; the result becomes the
//! session's immutable remote host.

use hickory_resolver::TokioResolver;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Upper bound on one PTR lookup.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves client IPs to hostnames, falling back to the textual IP.
#[derive(Clone)]
pub struct HostResolver {
    resolver: Option<TokioResolver>,
}

impl HostResolver {
    /// Create a resolver. With `enabled == false` no lookups are made.
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::disabled();
        }

        // Try system config, fall back to defaults
        let resolver = TokioResolver::builder_tokio()
            .map(|b| b.build())
            .unwrap_or_else(|_| {
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .build()
            });

        Self {
            resolver: Some(resolver),
        }
    }

    pub fn disabled() -> Self {
        Self { resolver: None }
    }

    /// Hostname for `ip`, or `ip` itself when lookup is off, slow or fails.
    pub async fn resolve(&self, ip: IpAddr) -> String {
        let Some(resolver) = &self.resolver else {
            return ip.to_string();
        };

        match timeout(LOOKUP_TIMEOUT, resolver.reverse_lookup(ip)).await {
            Ok(Ok(lookup)) => match lookup.iter().next() {
                Some(name) => {
                    let host = name.to_string().trim_end_matches('.').to_string();
                    debug!(%ip, %host, "Reverse lookup succeeded");
                    host
                }
                None => ip.to_string(),
            },
            Ok(Err(e)) => {
                debug!(%ip, error = %e, "Reverse lookup failed");
                ip.to_string()
            }
            Err(_) => {
                debug!(%ip, "Reverse lookup timed out");
                ip.to_string()
            }
        }
    }
}
