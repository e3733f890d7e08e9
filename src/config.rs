//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::lookup::TableTtls;
use crate::protocol::DEFAULT_MAX_FRAME_LEN;
use crate::server::ConnectionSettings;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bind host
    pub host: String,
    /// Socketmap TCP port
    pub port: u16,
    /// Idle read timeout in seconds
    pub read_timeout: u64,
    /// Response write timeout in seconds
    pub write_timeout: u64,
    /// Largest accepted request payload in bytes
    pub max_frame_len: usize,
    /// `user-exists` cache TTL in seconds
    pub user_ttl: u64,
    /// `virtual-domains` cache TTL in seconds
    pub domain_ttl: u64,
    /// `virtual-aliases` cache TTL in seconds
    pub alias_ttl: u64,
    /// Admin HTTP port, disabled when unset
    pub admin_port: Option<u16>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SOCKETMAP_HOST` - Bind host (default: 127.0.0.1)
    /// - `SOCKETMAP_PORT` - Socketmap port (default: 9100)
    /// - `SOCKETMAP_READ_TIMEOUT` - Idle read timeout in seconds (default: 30)
    /// - `SOCKETMAP_WRITE_TIMEOUT` - Write timeout in seconds (default: 5)
    /// - `SOCKETMAP_MAX_FRAME_LEN` - Largest request payload (default: 100000)
    /// - `SOCKETMAP_USER_TTL` - `user-exists` TTL in seconds (default: 60)
    /// - `SOCKETMAP_DOMAIN_TTL` - `virtual-domains` TTL in seconds (default: 300)
    /// - `SOCKETMAP_ALIAS_TTL` - `virtual-aliases` TTL in seconds (default: 300)
    /// - `SOCKETMAP_ADMIN_PORT` - Admin HTTP port (default: disabled)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("SOCKETMAP_HOST")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.host),
            port: env_or("SOCKETMAP_PORT", defaults.port),
            read_timeout: env_or("SOCKETMAP_READ_TIMEOUT", defaults.read_timeout),
            write_timeout: env_or("SOCKETMAP_WRITE_TIMEOUT", defaults.write_timeout),
            max_frame_len: env_or("SOCKETMAP_MAX_FRAME_LEN", defaults.max_frame_len),
            user_ttl: env_or("SOCKETMAP_USER_TTL", defaults.user_ttl),
            domain_ttl: env_or("SOCKETMAP_DOMAIN_TTL", defaults.domain_ttl),
            alias_ttl: env_or("SOCKETMAP_ALIAS_TTL", defaults.alias_ttl),
            admin_port: env::var("SOCKETMAP_ADMIN_PORT")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Socketmap listen address.
    ///
    /// The host may be an IP literal or a name; names are resolved when the
    /// listener binds.
    pub fn bind_addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    /// Admin HTTP listen address, if enabled.
    pub fn admin_addr(&self) -> Option<(&str, u16)> {
        self.admin_port.map(|port| (self.host.as_str(), port))
    }

    /// Per-connection limits.
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            read_timeout: Duration::from_secs(self.read_timeout),
            write_timeout: Duration::from_secs(self.write_timeout),
            max_frame_len: self.max_frame_len,
        }
    }

    /// Cache lifetimes per table.
    pub fn table_ttls(&self) -> TableTtls {
        TableTtls {
            user_exists: Duration::from_secs(self.user_ttl),
            virtual_domains: Duration::from_secs(self.domain_ttl),
            virtual_aliases: Duration::from_secs(self.alias_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9100,
            read_timeout: 30,
            write_timeout: 5,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            user_ttl: 60,
            domain_ttl: 300,
            alias_ttl: 300,
            admin_port: None,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
