//! Caching layer for resolved itineraries.
//!
//! Results are keyed by snapshot version as well as the stop pair, so a
//! refresh of the network data naturally bypasses stale entries; they age
//! out through the TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;

use crate::domain::StopId;
use crate::planner::Itineraries;

/// Cache key: (snapshot version, departure, arrival).
type ItineraryKey = (u64, StopId, StopId);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Cache of resolved itineraries.
pub struct ItineraryCache {
    entries: MokaCache<ItineraryKey, Arc<Itineraries>>,
}

impl ItineraryCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { entries }
    }

    /// Get cached itineraries for a stop pair at a snapshot version.
    pub fn get(&self, version: u64, departure: StopId, arrival: StopId) -> Option<Arc<Itineraries>> {
        self.entries.get(&(version, departure, arrival))
    }

    /// Cache itineraries for a stop pair at a snapshot version.
    pub fn insert(
        &self,
        version: u64,
        departure: StopId,
        arrival: StopId,
        itineraries: Arc<Itineraries>,
    ) {
        self.entries.insert((version, departure, arrival), itineraries);
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}
