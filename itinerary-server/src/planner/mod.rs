//! Itinerary planner.
//!
//! Answers "which buses take me from this stop to that one?" in two tiers:
//! single-line rides first, then two-line rides through one transfer stop.
//! Both tiers scan the snapshot directly; there is no precomputed graph.

mod config;
mod direct;
mod itinerary;
mod resolve;
mod select;
mod transfer;


pub use config::ResolverConfig;
pub use direct::find_direct;
pub use itinerary::{DirectOption, Itineraries, ItineraryResult, LineSummary, TransferOption};
pub use resolve::{Endpoint, ItineraryRequest, ResolveError, Resolver};
pub use select::{InvalidLegSelection, LegSelection, select_legs};
pub use transfer::find_transfers;
