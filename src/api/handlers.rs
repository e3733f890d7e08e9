//! API Handlers
//!
//! HTTP request handlers for the admin endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::LookupCache;
use crate::models::{HealthResponse, StatsResponse};
use crate::server::ConnectionStats;

/// Application state shared across all handlers.
///
/// Holds the same cache and counters the socketmap listener updates.
#[derive(Clone)]
pub struct AppState {
    /// Shared lookup cache
    pub cache: Arc<LookupCache>,
    /// Listener counters
    pub connections: Arc<ConnectionStats>,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(cache: Arc<LookupCache>, connections: Arc<ConnectionStats>) -> Self {
        Self { cache, connections }
    }
}

/// Handler for GET /stats
///
/// Returns current cache and connection statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.cache.stats(),
        state.connections.snapshot(),
    ))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedResult;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stats_handler() {
        let state = AppState::new(
            Arc::new(LookupCache::new()),
            Arc::new(ConnectionStats::new()),
        );
        state.cache.put(
            "user",
            "test@example.com",
            CachedResult::Exists(None),
            Duration::from_secs(60),
        );
        state.cache.get("user", "test@example.com");

        let response = stats_handler(State(state)).await;
        assert_eq!(response.cache.hits, 1);
        assert_eq!(response.cache.total_entries, 1);
        assert_eq!(response.connections.accepted, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
