//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{Stop, StopId};
use crate::history::{HistoryError, HistoryOutcome, HistorySink};
use crate::planner::{Endpoint, ItineraryRequest, ResolveError, Resolver};
use crate::snapshot::{NetworkSnapshot, SnapshotProvider};

use super::auth::{caller, require_caller};
use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/transport/bus/recherche_itineraire/",
            get(search_itinerary),
        )
        .route(
            "/api/interaction/historiques/",
            get(list_history).post(record_history),
        )
        .route("/api/interaction/historiques/clear/", delete(clear_history))
        .route("/api/interaction/historiques/:id/", delete(delete_history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Find direct and one-transfer itineraries between two stops.
async fn search_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ItineraryQuery>,
) -> Result<Json<ItineraryResponse>, AppError> {
    let request = ItineraryRequest {
        departure: query.depart_id,
        arrival: query.arrivee_id,
        user: caller(&headers)?,
    };

    let handle = state.snapshot.current().await;
    let result = Resolver::new(handle.snapshot.as_ref(), &state.config)
        .with_history(state.history.as_ref())
        .with_cache(&state.cache, handle.version)
        .resolve(&request)?;

    Ok(Json(ItineraryResponse::from_result(&result)))
}

/// List the caller's searches, most recent first.
async fn list_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryListQuery>,
) -> Result<Json<Vec<HistoryEntryView>>, AppError> {
    let user = require_caller(&headers)?;
    let needle = query
        .q
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let entries = state
        .history
        .entries_for(user)?
        .iter()
        .filter(|e| {
            needle.as_ref().is_none_or(|n| {
                e.departure_name.to_lowercase().contains(n)
                    || e.arrival_name.to_lowercase().contains(n)
            })
        })
        .map(HistoryEntryView::from_entry)
        .collect();

    Ok(Json(entries))
}

/// Record a search explicitly.
///
/// Answers 201 for a new entry and 200 when a recent identical search was
/// refreshed instead.
async fn record_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<HistoryCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_caller(&headers)?;

    let (Some(departure), Some(arrival)) = (body.depart, body.arrivee) else {
        return Err(AppError::BadRequest {
            message: "depart et arrivee sont requis".to_string(),
        });
    };

    let handle = state.snapshot.current().await;
    let departure = known_stop(&handle.snapshot, Endpoint::Departure, departure.into_text())?;
    let arrival = known_stop(&handle.snapshot, Endpoint::Arrival, arrival.into_text())?;

    let outcome = state
        .history
        .record_search(user, departure, arrival, Utc::now())?;

    let entry = state
        .history
        .get(user, outcome.id())?
        .ok_or_else(|| AppError::Internal {
            message: format!("history entry {} vanished", outcome.id()),
        })?;

    let status = match outcome {
        HistoryOutcome::Inserted(_) => StatusCode::CREATED,
        HistoryOutcome::Refreshed(_) => StatusCode::OK,
    };

    Ok((status, Json(HistoryEntryView::from_entry(&entry))))
}

/// Resolve a stop referenced by a history body; unknown ids are invalid input.
fn known_stop<'a>(
    snapshot: &'a NetworkSnapshot,
    endpoint: Endpoint,
    raw: String,
) -> Result<&'a Stop, AppError> {
    let id = StopId::parse(&raw).map_err(|e| AppError::BadRequest {
        message: format!("{endpoint}: {e}"),
    })?;

    snapshot
        .stop(id)
        .map_err(|e| AppError::Internal {
            message: e.to_string(),
        })?
        .ok_or_else(|| AppError::BadRequest {
            message: format!("{endpoint} introuvable: {id}"),
        })
}

/// Delete all of the caller's searches.
async fn clear_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ClearHistoryResponse>, AppError> {
    let user = require_caller(&headers)?;
    let deleted = state.history.clear(user)?;

    info!(user = %user, deleted, "Cleared search history");

    Ok(Json(ClearHistoryResponse { deleted }))
}

/// Delete one of the caller's searches.
async fn delete_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let user = require_caller(&headers)?;

    if state.history.delete(user, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            message: format!("historique {id} introuvable"),
        })
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::BadRequest(message) => AppError::BadRequest { message },
            ResolveError::NotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            ResolveError::Internal(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<HistoryError> for AppError {
    fn from(e: HistoryError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => {
                error!(%message, "Internal error");
                // Details stay in the log
                let body = Json(ErrorResponse {
                    error: "erreur interne du serveur".to_string(),
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        warn!(status = status.as_u16(), %message, "Request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
