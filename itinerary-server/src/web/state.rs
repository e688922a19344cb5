//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, ItineraryCache};
use crate::history::InMemoryHistory;
use crate::planner::ResolverConfig;
use crate::snapshot::SnapshotStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Current network snapshot
    pub snapshot: Arc<SnapshotStore>,

    /// Riders' search history
    pub history: Arc<InMemoryHistory>,

    /// Resolved itineraries
    pub cache: Arc<ItineraryCache>,

    /// Resolver configuration
    pub config: Arc<ResolverConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        snapshot: Arc<SnapshotStore>,
        history: InMemoryHistory,
        cache_config: &CacheConfig,
        config: ResolverConfig,
    ) -> Self {
        Self {
            snapshot,
            history: Arc::new(history),
            cache: Arc::new(ItineraryCache::new(cache_config)),
            config: Arc::new(config),
        }
    }
}
