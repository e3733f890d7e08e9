//! Socketmap - A Postfix socketmap lookup responder
//!
//! Answers `user-exists`, `virtual-domains` and `virtual-aliases` lookups
//! over the netstring socketmap protocol, with a TTL cache in front of a
//! pluggable directory.

pub mod api;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod lookup;
pub mod models;
pub mod protocol;
pub mod server;

pub use api::AppState;
pub use config::Config;
pub use directory::{DirectoryProvider, StaticDirectory};
pub use lookup::Dispatcher;
pub use server::Server;
