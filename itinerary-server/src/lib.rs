//! Bus itinerary server.
//!
//! A web service that answers: "which buses take me from this stop to
//! that one, directly or with one change?"

pub mod cache;
pub mod domain;
pub mod history;
pub mod planner;
pub mod snapshot;
pub mod web;
