//! In-memory directory backend.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::DirectoryProvider;
use crate::error::ProviderResult;

/// Directory held in memory, matched case-insensitively.
///
/// A user exists when the address is listed explicitly or its domain is
/// listed as a user domain.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: HashSet<String>,
    user_domains: HashSet<String>,
    domains: HashSet<String>,
    aliases: HashMap<String, String>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Data set served by the binary out of the box.
    pub fn demo() -> Self {
        let mut directory = Self::new()
            .with_user("test@example.com")
            .with_user("user@example.com")
            .with_user("admin@example.com")
            .with_user("postmaster@example.com")
            .with_user_domain("example.com")
            .with_user_domain("test.com")
            .with_domain("example.com")
            .with_domain("test.com")
            .with_domain("localhost");

        for alias in ["postmaster", "abuse", "hostmaster", "webmaster", "info"] {
            directory = directory.with_alias(format!("{alias}@example.com"), "admin@example.com");
        }
        directory.with_alias("support@test.com", "help@test.com")
    }

    /// Adds a single mailbox.
    pub fn with_user(mut self, email: impl AsRef<str>) -> Self {
        self.users.insert(normalize(email.as_ref()));
        self
    }

    /// Accepts every mailbox at `domain`.
    pub fn with_user_domain(mut self, domain: impl AsRef<str>) -> Self {
        self.user_domains.insert(normalize(domain.as_ref()));
        self
    }

    /// Adds an accepted mail domain.
    pub fn with_domain(mut self, domain: impl AsRef<str>) -> Self {
        self.domains.insert(normalize(domain.as_ref()));
        self
    }

    /// Adds an alias. The destination is returned as given.
    pub fn with_alias(mut self, address: impl AsRef<str>, destination: impl Into<String>) -> Self {
        self.aliases
            .insert(normalize(address.as_ref()), destination.into());
        self
    }
}

fn normalize(value: &str) -> String {
    value.to_ascii_lowercase()
}

#[async_trait]
impl DirectoryProvider for StaticDirectory {
    async fn user_exists(&self, email: &str) -> ProviderResult<bool> {
        let email = normalize(email);
        if self.users.contains(&email) {
            return Ok(true);
        }

        Ok(email
            .rsplit_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && self.user_domains.contains(domain)))
    }

    async fn domain_exists(&self, domain: &str) -> ProviderResult<bool> {
        Ok(self.domains.contains(&normalize(domain)))
    }

    async fn resolve_alias(&self, address: &str) -> ProviderResult<Option<String>> {
        Ok(self.aliases.get(&normalize(address)).cloned())
    }
}
