//! Web layer for the itinerary service.
//!
//! Provides HTTP endpoints for itinerary search and search history.

mod auth;
mod dto;
mod routes;
mod state;

pub use auth::{USER_ID_HEADER, caller, require_caller};
pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
