//! Request Dispatcher
//!
//! Parses a request, routes it to its table and answers from the cache,
//! falling back to the directory on a miss.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CachedResult, LookupCache};
use crate::directory::DirectoryProvider;
use crate::error::{ProviderResult, RequestError};
use crate::lookup::{Table, TableTtls};
use crate::protocol::{Request, Response};

/// Message sent with `TEMP` when the directory fails.
const DIRECTORY_UNAVAILABLE: &str = "directory unavailable";

/// Answers socketmap requests. Cheap to clone; clones share the cache and
/// directory.
#[derive(Clone)]
pub struct Dispatcher {
    cache: Arc<LookupCache>,
    directory: Arc<dyn DirectoryProvider>,
    ttls: TableTtls,
}

impl Dispatcher {
    /// Creates a dispatcher with the default table TTLs.
    pub fn new(cache: Arc<LookupCache>, directory: Arc<dyn DirectoryProvider>) -> Self {
        Self {
            cache,
            directory,
            ttls: TableTtls::default(),
        }
    }

    /// Overrides the table TTLs.
    pub fn with_ttls(mut self, ttls: TableTtls) -> Self {
        self.ttls = ttls;
        self
    }

    /// Shared lookup cache.
    pub fn cache(&self) -> &Arc<LookupCache> {
        &self.cache
    }

    /// Answers a raw frame payload.
    pub async fn dispatch_payload(&self, payload: &[u8]) -> Response {
        match Request::from_payload(payload) {
            Ok(request) => self.lookup(&request).await,
            Err(err) => reject(err),
        }
    }

    /// Answers request text of the form `<table> <key>`.
    pub async fn dispatch(&self, raw: &str) -> Response {
        match Request::parse(raw) {
            Ok(request) => self.lookup(&request).await,
            Err(err) => reject(err),
        }
    }

    /// Answers a parsed request.
    ///
    /// Unknown tables answer `NOTFOUND` so the caller treats them like an
    /// absent key.
    pub async fn lookup(&self, request: &Request) -> Response {
        let Some(table) = Table::from_name(&request.table) else {
            debug!(table = %request.table, "unknown table");
            return Response::NotFound;
        };

        match self.resolve(table, &request.key).await {
            Ok(result) => render(table, &request.key, result),
            Err(err) => {
                warn!(table = table.name(), key = %request.key, error = %err, "directory lookup failed");
                Response::TemporaryFailure(DIRECTORY_UNAVAILABLE.to_string())
            }
        }
    }

    /// Returns the live cached result, or queries the directory and caches
    /// its answer. Directory errors are not cached.
    async fn resolve(&self, table: Table, key: &str) -> ProviderResult<CachedResult> {
        if let Some(entry) = self.cache.get(table.namespace(), key) {
            debug!(table = table.name(), key, "cache hit");
            return Ok(entry.result);
        }

        let result = match table {
            Table::UserExists => CachedResult::from_exists(self.directory.user_exists(key).await?),
            Table::VirtualDomains => {
                CachedResult::from_exists(self.directory.domain_exists(key).await?)
            }
            Table::VirtualAliases => {
                CachedResult::from_destination(self.directory.resolve_alias(key).await?)
            }
        };

        debug!(table = table.name(), key, exists = result.exists(), "cache miss, directory answered");
        self.cache
            .put(table.namespace(), key, result.clone(), self.ttls.for_table(table));
        Ok(result)
    }
}

fn reject(err: RequestError) -> Response {
    debug!(error = %err, "rejected request");
    Response::PermanentFailure(err.to_string())
}

fn render(table: Table, key: &str, result: CachedResult) -> Response {
    match (table, result) {
        (Table::UserExists, CachedResult::Exists(_)) => Response::Found(key.to_string()),
        (Table::VirtualDomains, CachedResult::Exists(_)) => Response::Found(String::new()),
        (Table::VirtualAliases, CachedResult::Exists(Some(destination))) => {
            Response::Found(destination)
        }
        _ => Response::NotFound,
    }
}
