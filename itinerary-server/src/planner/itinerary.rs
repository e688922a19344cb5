//! Itinerary option types.
//!
//! These are query-scoped values: built for one resolve call, never
//! persisted.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{Direction, Line, LineId, RouteStop, Stop};

/// The line a direct option rides, with its fare already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSummary {
    pub id: LineId,
    pub number: String,
    /// Effective fare (fallback applied)
    pub fare: Decimal,
}

impl LineSummary {
    pub fn from_line(line: &Line, default_fare: Decimal) -> Self {
        Self {
            id: line.id,
            number: line.number.clone(),
            fare: line.effective_fare(default_fare),
        }
    }
}

/// A single-line ride between two stops.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectOption {
    pub line: LineSummary,
    pub direction: Direction,
    pub description: Option<String>,
    /// Number of hops from departure to arrival
    pub stop_count: usize,
    /// Stops from departure through arrival, inclusive, in traversal order
    pub stops: Vec<RouteStop>,
}

impl DirectOption {
    /// The boarding stop.
    pub fn departure(&self) -> Option<&Stop> {
        self.stops.first().map(|s| s.stop.as_ref())
    }

    /// The alighting stop.
    pub fn arrival(&self) -> Option<&Stop> {
        self.stops.last().map(|s| s.stop.as_ref())
    }
}

/// A two-line itinerary via one intermediate stop.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOption {
    pub first: DirectOption,
    pub second: DirectOption,
    pub transfer_stop: Stop,
    pub total_fare: Decimal,
    pub total_stops: usize,
}

impl TransferOption {
    /// Combine two legs meeting at `transfer_stop`.
    pub fn new(first: DirectOption, second: DirectOption, transfer_stop: Stop) -> Self {
        let total_fare = first.line.fare + second.line.fare;
        let total_stops = first.stop_count + second.stop_count;
        Self {
            first,
            second,
            transfer_stop,
            total_fare,
            total_stops,
        }
    }

    /// Transfer options always change lines exactly once.
    pub fn transfer_count(&self) -> usize {
        1
    }
}

/// The options found between two stops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Itineraries {
    pub direct: Vec<DirectOption>,
    pub transfers: Vec<TransferOption>,
}

impl Itineraries {
    pub fn total(&self) -> usize {
        self.direct.len() + self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Complete answer to one itinerary query.
#[derive(Debug, Clone)]
pub struct ItineraryResult {
    pub departure: Stop,
    pub arrival: Stop,
    pub itineraries: Arc<Itineraries>,
}

impl ItineraryResult {
    pub fn direct(&self) -> &[DirectOption] {
        &self.itineraries.direct
    }

    pub fn transfers(&self) -> &[TransferOption] {
        &self.itineraries.transfers
    }

    /// Number of direct plus transfer options.
    pub fn total(&self) -> usize {
        self.itineraries.total()
    }
}
