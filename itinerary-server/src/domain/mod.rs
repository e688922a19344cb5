//! Domain types for the itinerary resolver.
//!
//! This module contains read-only views over the transit network owned by
//! the CRUD backend. Types enforce their invariants at construction time,
//! so code that receives them can trust their validity.

mod error;
mod line;
mod route;
mod stop;
mod user;

pub use error::DomainError;
pub use line::{Line, LineId, LineStatus};
pub use route::{Direction, Route, RouteStop};
pub use stop::{InvalidStopId, Stop, StopId};
pub use user::UserId;
