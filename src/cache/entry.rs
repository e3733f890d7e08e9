//! Cache Entry Module
//!
//! Defines cached lookup results and their expiry.

use std::time::Duration;

use tokio::time::Instant;

// == Cached Result ==
/// Outcome of a directory lookup worth remembering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedResult {
    /// Key exists, with an optional resolved destination
    Exists(Option<String>),
    /// Directory confirmed the key does not exist
    Absent,
}

impl CachedResult {
    /// Builds a result from an existence check.
    pub fn from_exists(exists: bool) -> Self {
        if exists {
            CachedResult::Exists(None)
        } else {
            CachedResult::Absent
        }
    }

    /// Builds a result from an optional destination.
    pub fn from_destination(destination: Option<String>) -> Self {
        match destination {
            Some(destination) => CachedResult::Exists(Some(destination)),
            None => CachedResult::Absent,
        }
    }

    /// Returns true for `Exists`.
    pub fn exists(&self) -> bool {
        matches!(self, CachedResult::Exists(_))
    }
}

// == Cache Entry ==
/// A single cached answer.
///
/// Time is measured with `tokio::time::Instant` so tests can drive expiry
/// with a paused clock.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Lookup key, without namespace
    pub key: String,
    /// Cached answer
    pub result: CachedResult,
    /// Instant after which the entry is ignored
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(key: String, result: CachedResult, ttl: Duration) -> Self {
        Self {
            key,
            result,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches
    /// `expires_at`, so a 60s entry is stale at exactly T+60s.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Checks if the entry has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns how long the entry stays live, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
