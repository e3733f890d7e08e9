//! Connection Statistics Module

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Snapshot of listener counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStatsSnapshot {
    /// Connections accepted since startup
    pub accepted: u64,
    /// Connections currently open
    pub active: usize,
    /// Requests answered across all connections
    pub requests: u64,
}

/// Counters shared by the listener and every connection task.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    accepted: AtomicU64,
    active: AtomicUsize,
    requests: AtomicU64,
}

impl ConnectionStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted connection. It counts as active until the
    /// returned guard is dropped.
    pub fn open(self: &Arc<Self>) -> ActiveConnection {
        let id = self.accepted.fetch_add(1, Ordering::Relaxed) + 1;
        self.active.fetch_add(1, Ordering::Relaxed);
        ActiveConnection {
            id,
            stats: Arc::clone(self),
        }
    }

    /// Records one answered request.
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters.
    pub fn snapshot(&self) -> ConnectionStatsSnapshot {
        ConnectionStatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
        }
    }
}

/// Marks a connection as open for as long as it lives.
#[derive(Debug)]
pub struct ActiveConnection {
    id: u64,
    stats: Arc<ConnectionStats>,
}

impl ActiveConnection {
    /// Connection number, counting from 1.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        self.stats.active.fetch_sub(1, Ordering::Relaxed);
    }
}
