//! Itinerary assembler.
//!
//! Validates a query, runs the direct and transfer searches, and records
//! the search in the rider's history.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::cache::ItineraryCache;
use crate::domain::{Stop, StopId, UserId};
use crate::history::HistorySink;
use crate::snapshot::{SnapshotError, SnapshotProvider};

use super::config::ResolverConfig;
use super::direct::find_direct;
use super::itinerary::{Itineraries, ItineraryResult};
use super::transfer::find_transfers;

/// Which end of a query an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Departure,
    Arrival,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Departure => write!(f, "Arrêt de départ"),
            Self::Arrival => write!(f, "Arrêt d'arrivée"),
        }
    }
}

/// Error from itinerary resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Missing or malformed stop id
    #[error("{0}")]
    BadRequest(String),

    /// Stop id not present in the snapshot
    #[error("{endpoint} introuvable: {id}")]
    NotFound { endpoint: Endpoint, id: StopId },

    /// Snapshot could not be scanned
    #[error("internal error: {0}")]
    Internal(#[from] SnapshotError),
}

/// An itinerary query as received from a caller.
///
/// Ids are kept as raw strings so validation can tell "missing" from
/// "malformed".
#[derive(Debug, Clone, Default)]
pub struct ItineraryRequest {
    pub departure: Option<String>,
    pub arrival: Option<String>,
    /// Authenticated rider, if any. Only identified riders get history.
    pub user: Option<UserId>,
}

impl ItineraryRequest {
    /// Create a request for two stop ids.
    pub fn new(departure: impl Into<String>, arrival: impl Into<String>) -> Self {
        Self {
            departure: Some(departure.into()),
            arrival: Some(arrival.into()),
            user: None,
        }
    }

    /// Attach the calling rider.
    pub fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Validate the request, returning the parsed (departure, arrival) ids.
    pub fn validate(&self) -> Result<(StopId, StopId), ResolveError> {
        let departure = present(self.departure.as_deref());
        let arrival = present(self.arrival.as_deref());

        let (Some(departure), Some(arrival)) = (departure, arrival) else {
            return Err(ResolveError::BadRequest(
                "depart_id et arrivee_id sont requis".to_string(),
            ));
        };

        let departure = StopId::parse(departure)
            .map_err(|e| ResolveError::BadRequest(format!("depart_id: {e}")))?;
        let arrival = StopId::parse(arrival)
            .map_err(|e| ResolveError::BadRequest(format!("arrivee_id: {e}")))?;

        Ok((departure, arrival))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Itinerary resolver.
///
/// Borrows everything it needs for one query. Build one per request.
pub struct Resolver<'a, P: SnapshotProvider + ?Sized> {
    provider: &'a P,
    config: &'a ResolverConfig,
    history: Option<&'a dyn HistorySink>,
    cache: Option<(&'a ItineraryCache, u64)>,
}

impl<'a, P: SnapshotProvider + ?Sized> Resolver<'a, P> {
    /// Create a new resolver.
    pub fn new(provider: &'a P, config: &'a ResolverConfig) -> Self {
        Self {
            provider,
            config,
            history: None,
            cache: None,
        }
    }

    /// Record successful searches by identified riders in `history`.
    pub fn with_history(mut self, history: &'a dyn HistorySink) -> Self {
        self.history = Some(history);
        self
    }

    /// Serve and store results in `cache`, for the snapshot at `version`.
    pub fn with_cache(mut self, cache: &'a ItineraryCache, version: u64) -> Self {
        self.cache = Some((cache, version));
        self
    }

    /// Resolve a query at the current time.
    pub fn resolve(&self, request: &ItineraryRequest) -> Result<ItineraryResult, ResolveError> {
        self.resolve_at(request, Utc::now())
    }

    /// Resolve a query, using `now` as the history timestamp.
    pub fn resolve_at(
        &self,
        request: &ItineraryRequest,
        now: DateTime<Utc>,
    ) -> Result<ItineraryResult, ResolveError> {
        let (departure_id, arrival_id) = request.validate()?;

        let departure = self.lookup(Endpoint::Departure, departure_id)?;
        let arrival = self.lookup(Endpoint::Arrival, arrival_id)?;

        let itineraries = self.itineraries(departure_id, arrival_id)?;

        debug!(
            departure = %departure_id,
            arrival = %arrival_id,
            direct = itineraries.direct.len(),
            transfers = itineraries.transfers.len(),
            "Itinerary resolved"
        );

        if let (Some(history), Some(user)) = (self.history, request.user) {
            if let Err(e) = history.record_search(user, &departure, &arrival, now) {
                warn!(
                    user = %user,
                    departure = %departure_id,
                    arrival = %arrival_id,
                    error = %e,
                    "Failed to record search history"
                );
            }
        }

        Ok(ItineraryResult {
            departure,
            arrival,
            itineraries,
        })
    }

    fn lookup(&self, endpoint: Endpoint, id: StopId) -> Result<Stop, ResolveError> {
        self.provider
            .stop(id)?
            .cloned()
            .ok_or(ResolveError::NotFound { endpoint, id })
    }

    fn itineraries(
        &self,
        departure: StopId,
        arrival: StopId,
    ) -> Result<Arc<Itineraries>, ResolveError> {
        if let Some((cache, version)) = self.cache {
            if let Some(cached) = cache.get(version, departure, arrival) {
                debug!(departure = %departure, arrival = %arrival, "Itinerary cache hit");
                return Ok(cached);
            }
        }

        let direct = find_direct(self.provider, departure, arrival, self.config.default_fare)?;
        let transfers = find_transfers(self.provider, departure, arrival, self.config)?;
        let itineraries = Arc::new(Itineraries { direct, transfers });

        if let Some((cache, version)) = self.cache {
            cache.insert(version, departure, arrival, itineraries.clone());
        }

        Ok(itineraries)
    }
}
