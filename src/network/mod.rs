//! Network module.
//!
//! Contains the Gateway (TCP listener), the per-client Connection actor, and
//! reverse DNS for client addresses.

mod connection;
mod gateway;
mod resolve;

pub use connection::Connection;
pub use gateway::Gateway;
pub use resolve::HostResolver;
