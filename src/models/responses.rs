//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::server::ConnectionStatsSnapshot;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookup cache counters
    pub cache: CacheStats,
    /// Cache hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Listener counters
    pub connections: ConnectionStatsSnapshot,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache and connection statistics
    pub fn new(cache: CacheStats, connections: ConnectionStatsSnapshot) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            connections,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_hit_rate() {
        let cache = CacheStats {
            hits: 80,
            misses: 20,
            ..CacheStats::default()
        };
        let resp = StatsResponse::new(cache, ConnectionStatsSnapshot::default());
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_serialize() {
        let connections = ConnectionStatsSnapshot {
            accepted: 3,
            active: 1,
            requests: 7,
        };
        let resp = StatsResponse::new(CacheStats::default(), connections);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["connections"]["requests"], 7);
        assert_eq!(json["cache"]["hits"], 0);
        assert_eq!(json["hit_rate"], 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
