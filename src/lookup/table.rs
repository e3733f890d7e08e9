//! Lookup tables known to the dispatcher.

use std::time::Duration;

/// A named socketmap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `user-exists`: answers with the address itself
    UserExists,
    /// `virtual-domains`: answers with a bare `OK`
    VirtualDomains,
    /// `virtual-aliases`: answers with the alias destination
    VirtualAliases,
}

impl Table {
    /// Every supported table.
    pub const ALL: [Table; 3] = [Table::UserExists, Table::VirtualDomains, Table::VirtualAliases];

    /// Resolves a table from its request name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.name() == name)
    }

    /// Name used in requests.
    pub fn name(self) -> &'static str {
        match self {
            Table::UserExists => "user-exists",
            Table::VirtualDomains => "virtual-domains",
            Table::VirtualAliases => "virtual-aliases",
        }
    }

    /// Cache namespace for this table's entries.
    pub fn namespace(self) -> &'static str {
        match self {
            Table::UserExists => "user",
            Table::VirtualDomains => "domain",
            Table::VirtualAliases => "alias",
        }
    }
}

/// Cache lifetime of each table's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableTtls {
    /// `user-exists` lifetime
    pub user_exists: Duration,
    /// `virtual-domains` lifetime
    pub virtual_domains: Duration,
    /// `virtual-aliases` lifetime
    pub virtual_aliases: Duration,
}

impl TableTtls {
    /// Returns the TTL for `table`.
    pub fn for_table(&self, table: Table) -> Duration {
        match table {
            Table::UserExists => self.user_exists,
            Table::VirtualDomains => self.virtual_domains,
            Table::VirtualAliases => self.virtual_aliases,
        }
    }
}

impl Default for TableTtls {
    fn default() -> Self {
        Self {
            user_exists: Duration::from_secs(60),
            virtual_domains: Duration::from_secs(300),
            virtual_aliases: Duration::from_secs(300),
        }
    }
}
