//! Server Module
//!
//! TCP listener and the per-connection request loop.

mod connection;
mod listener;
mod stats;

pub use connection::{handle_connection, CloseReason, ConnectionSettings};
pub use listener::Server;
pub use stats::{ActiveConnection, ConnectionStats, ConnectionStatsSnapshot};
