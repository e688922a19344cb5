//! Directional routes ("trajets") and their ordered stops.

use std::collections::HashSet;
use std::sync::Arc;

use super::{DomainError, Stop, StopId};

/// Travel direction of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// "Aller"
    Outbound,
    /// "Retour"
    Inbound,
    /// "AllerRetour"
    Combined,
}

impl Direction {
    /// Parse a backend direction label.
    pub fn from_label(label: &str) -> Result<Self, DomainError> {
        match label.trim() {
            "Aller" => Ok(Direction::Outbound),
            "Retour" => Ok(Direction::Inbound),
            "AllerRetour" => Ok(Direction::Combined),
            other => Err(DomainError::UnknownDirection(other.to_string())),
        }
    }

    /// The label riders see, as stored by the backend.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Outbound => "Aller",
            Direction::Inbound => "Retour",
            Direction::Combined => "AllerRetour",
        }
    }
}

/// A stop served by a route, with its passage position.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub stop: Arc<Stop>,
    pub position: u32,
}

impl RouteStop {
    pub fn new(stop: Arc<Stop>, position: u32) -> Self {
        Self { stop, position }
    }
}

/// One directional traversal of stops for a line.
///
/// # Invariants
///
/// - Stops are ordered by strictly increasing position
/// - Positions start at 1 and are unique within the route
///
/// The same stop may appear more than once (loops are not rejected); the
/// first occurrence is the one used when matching.
#[derive(Debug, Clone)]
pub struct Route {
    direction: Direction,
    description: Option<String>,
    stops: Vec<RouteStop>,
}

impl Route {
    /// Build a route, ordering stops by position.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a position is 0 or two stops share a position.
    pub fn new(
        direction: Direction,
        description: Option<String>,
        mut stops: Vec<RouteStop>,
    ) -> Result<Self, DomainError> {
        stops.sort_by_key(|s| s.position);

        let mut seen = HashSet::with_capacity(stops.len());
        for stop in &stops {
            if stop.position == 0 {
                return Err(DomainError::InvalidPosition(stop.position));
            }
            if !seen.insert(stop.position) {
                return Err(DomainError::DuplicatePosition(stop.position));
            }
        }

        Ok(Self {
            direction,
            description,
            stops,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Stops in traversal order.
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    /// A route needs at least two stops to carry anyone anywhere.
    pub fn is_usable(&self) -> bool {
        self.stops.len() >= 2
    }

    /// Index of the first occurrence of `stop` in traversal order.
    pub fn index_of(&self, stop: StopId) -> Option<usize> {
        self.stops.iter().position(|s| s.stop.id == stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: u64, name: &str) -> Arc<Stop> {
        Arc::new(Stop::new(StopId::new(id), name, -18.9, 47.5))
    }

    #[test]
    fn direction_labels() {
        assert_eq!(Direction::from_label("Aller").unwrap(), Direction::Outbound);
        assert_eq!(Direction::from_label("Retour").unwrap(), Direction::Inbound);
        assert_eq!(
            Direction::from_label("AllerRetour").unwrap(),
            Direction::Combined
        );
        assert!(Direction::from_label("aller").is_err());
        assert_eq!(Direction::Combined.label(), "AllerRetour");
    }

    #[test]
    fn stops_are_sorted_by_position() {
        let route = Route::new(
            Direction::Outbound,
            None,
            vec![
                RouteStop::new(stop(3, "C"), 3),
                RouteStop::new(stop(1, "A"), 1),
                RouteStop::new(stop(2, "B"), 2),
            ],
        )
        .unwrap();

        let ids: Vec<u64> = route.stops().iter().map(|s| s.stop.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn gaps_in_positions_are_allowed() {
        let route = Route::new(
            Direction::Outbound,
            None,
            vec![RouteStop::new(stop(1, "A"), 1), RouteStop::new(stop(2, "B"), 5)],
        );
        assert!(route.is_ok());
    }

    #[test]
    fn duplicate_position_rejected() {
        let err = Route::new(
            Direction::Outbound,
            None,
            vec![RouteStop::new(stop(1, "A"), 2), RouteStop::new(stop(2, "B"), 2)],
        )
        .unwrap_err();
        assert_eq!(err, DomainError::DuplicatePosition(2));
    }

    #[test]
    fn zero_position_rejected() {
        let err = Route::new(
            Direction::Inbound,
            None,
            vec![RouteStop::new(stop(1, "A"), 0)],
        )
        .unwrap_err();
        assert_eq!(err, DomainError::InvalidPosition(0));
    }

    #[test]
    fn usability() {
        let empty = Route::new(Direction::Outbound, None, vec![]).unwrap();
        assert!(!empty.is_usable());

        let single = Route::new(
            Direction::Outbound,
            None,
            vec![RouteStop::new(stop(1, "A"), 1)],
        )
        .unwrap();
        assert!(!single.is_usable());

        let pair = Route::new(
            Direction::Outbound,
            Some("Centre".into()),
            vec![RouteStop::new(stop(1, "A"), 1), RouteStop::new(stop(2, "B"), 2)],
        )
        .unwrap();
        assert!(pair.is_usable());
        assert_eq!(pair.description(), Some("Centre"));
    }

    #[test]
    fn index_of_returns_first_occurrence() {
        let a = stop(1, "A");
        let route = Route::new(
            Direction::Combined,
            None,
            vec![
                RouteStop::new(a.clone(), 1),
                RouteStop::new(stop(2, "B"), 2),
                RouteStop::new(a, 3),
            ],
        )
        .unwrap();

        assert_eq!(route.index_of(StopId::new(1)), Some(0));
        assert_eq!(route.index_of(StopId::new(2)), Some(1));
        assert_eq!(route.index_of(StopId::new(9)), None);
    }
}
