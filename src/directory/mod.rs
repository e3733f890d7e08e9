//! Directory Module
//!
//! The authoritative source of user, domain and alias answers. The
//! dispatcher only sees the [`DirectoryProvider`] trait; backends are
//! injected at startup.

mod static_dir;

use async_trait::async_trait;

use crate::error::ProviderResult;

pub use static_dir::StaticDirectory;

/// Answers existence and alias questions for the lookup tables.
///
/// Implementations may block on network I/O; they are always called
/// outside the cache lock.
#[async_trait]
pub trait DirectoryProvider: Send + Sync + 'static {
    /// Returns whether a mailbox exists for `email`.
    async fn user_exists(&self, email: &str) -> ProviderResult<bool>;

    /// Returns whether mail for `domain` is accepted.
    async fn domain_exists(&self, domain: &str) -> ProviderResult<bool>;

    /// Returns the destination `address` forwards to, if it is an alias.
    async fn resolve_alias(&self, address: &str) -> ProviderResult<Option<String>>;
}
