//! Data transfer objects for web requests and responses.
//!
//! Field names follow the JSON contract the existing frontend consumes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{LineId, RouteStop, Stop, StopId, UserId};
use crate::history::HistoryEntry;
use crate::planner::{DirectOption, ItineraryResult, LineSummary, TransferOption};

/// Query string of the itinerary search.
#[derive(Debug, Default, Deserialize)]
pub struct ItineraryQuery {
    pub depart_id: Option<String>,
    pub arrivee_id: Option<String>,
}

/// A stop as echoed in responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopView {
    pub id: StopId,
    pub nom: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl StopView {
    /// Create from a domain Stop.
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.id,
            nom: stop.name.clone(),
            latitude: stop.latitude,
            longitude: stop.longitude,
        }
    }
}

/// A stop along a ride, with its position on the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStopView {
    pub id: StopId,
    pub nom: String,
    pub ordre: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl RouteStopView {
    pub fn from_route_stop(route_stop: &RouteStop) -> Self {
        Self {
            id: route_stop.stop.id,
            nom: route_stop.stop.name.clone(),
            ordre: route_stop.position,
            latitude: route_stop.stop.latitude,
            longitude: route_stop.stop.longitude,
        }
    }
}

/// The bus a ride uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    pub id: LineId,
    pub numero: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub frais: Decimal,
}

impl LineView {
    pub fn from_summary(line: &LineSummary) -> Self {
        Self {
            id: line.id,
            numero: line.number.clone(),
            frais: line.fare,
        }
    }
}

/// The route a ride follows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteView {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: Option<String>,
}

/// A single-line ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectOptionView {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub bus: LineView,
    pub trajet: RouteView,
    pub nb_arrets: usize,
    pub arrets: Vec<RouteStopView>,
}

impl DirectOptionView {
    /// Create from a domain DirectOption.
    pub fn from_option(option: &DirectOption) -> Self {
        Self {
            kind: "direct",
            bus: LineView::from_summary(&option.line),
            trajet: RouteView {
                kind: option.direction.label(),
                description: option.description.clone(),
            },
            nb_arrets: option.stop_count,
            arrets: option
                .stops
                .iter()
                .map(RouteStopView::from_route_stop)
                .collect(),
        }
    }
}

/// A two-line ride through one transfer stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferOptionView {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub nb_correspondances: usize,
    pub trajet1: DirectOptionView,
    pub trajet2: DirectOptionView,
    pub arret_correspondance: StopView,
    #[serde(with = "rust_decimal::serde::float")]
    pub frais_total: Decimal,
    pub nb_arrets_total: usize,
}

impl TransferOptionView {
    /// Create from a domain TransferOption.
    pub fn from_option(option: &TransferOption) -> Self {
        Self {
            kind: "correspondance",
            nb_correspondances: option.transfer_count(),
            trajet1: DirectOptionView::from_option(&option.first),
            trajet2: DirectOptionView::from_option(&option.second),
            arret_correspondance: StopView::from_stop(&option.transfer_stop),
            frais_total: option.total_fare,
            nb_arrets_total: option.total_stops,
        }
    }
}

/// Response to an itinerary search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryResponse {
    pub depart: StopView,
    pub arrivee: StopView,
    pub itineraires_directs: Vec<DirectOptionView>,
    pub itineraires_correspondances: Vec<TransferOptionView>,
    pub total: usize,
}

impl ItineraryResponse {
    /// Create from a resolved ItineraryResult.
    pub fn from_result(result: &ItineraryResult) -> Self {
        Self {
            depart: StopView::from_stop(&result.departure),
            arrivee: StopView::from_stop(&result.arrival),
            itineraires_directs: result
                .direct()
                .iter()
                .map(DirectOptionView::from_option)
                .collect(),
            itineraires_correspondances: result
                .transfers()
                .iter()
                .map(TransferOptionView::from_option)
                .collect(),
            total: result.total(),
        }
    }
}

/// A stop id in a JSON body, sent either as a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StopIdInput {
    Number(u64),
    Text(String),
}

impl StopIdInput {
    /// The raw id as text, for validation alongside query-string ids.
    pub fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Body of an explicit history record request.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryCreateRequest {
    pub depart: Option<StopIdInput>,
    pub arrivee: Option<StopIdInput>,
}

/// Query string of the history listing.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryListQuery {
    /// Case-insensitive substring filter on stop names
    pub q: Option<String>,
}

/// A recorded search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntryView {
    pub id: u64,
    #[serde(rename = "userRef")]
    pub user_ref: UserId,
    pub depart: StopId,
    pub depart_nom: String,
    pub arrivee: StopId,
    pub arrivee_nom: String,
    pub date_recherche: DateTime<Utc>,
}

impl HistoryEntryView {
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id,
            user_ref: entry.user,
            depart: entry.departure,
            depart_nom: entry.departure_name.clone(),
            arrivee: entry.arrival,
            arrivee_nom: entry.arrival_name.clone(),
            date_recherche: entry.searched_at,
        }
    }
}

/// Response to clearing a rider's history.
#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub deleted: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
