//! Direct-match finder.
//!
//! Scans every route of every active line for a ride from the departure
//! stop to the arrival stop in traversal order.

use rust_decimal::Decimal;
use tracing::trace;

use crate::domain::{Line, Route, StopId};
use crate::snapshot::{SnapshotError, SnapshotProvider};

use super::itinerary::{DirectOption, LineSummary};

/// Find all single-line rides from `departure` to `arrival`.
///
/// Each route contributes at most one option. Direction matters: a route
/// only matches when the departure comes before the arrival; the reverse
/// trip is only found if the line has a separate route for it.
///
/// An empty result means "no direct service", not an error. Errors only
/// come from the provider.
pub fn find_direct<P: SnapshotProvider + ?Sized>(
    provider: &P,
    departure: StopId,
    arrival: StopId,
    default_fare: Decimal,
) -> Result<Vec<DirectOption>, SnapshotError> {
    let mut options = Vec::new();

    if departure == arrival {
        return Ok(options);
    }

    for line in provider.active_lines()? {
        for route in &line.routes {
            if let Some(option) = match_route(line, route, departure, arrival, default_fare) {
                options.push(option);
            }
        }
    }

    trace!(
        departure = %departure,
        arrival = %arrival,
        found = options.len(),
        "Direct scan complete"
    );

    Ok(options)
}

/// Match one route against a (departure, arrival) pair.
///
/// Boarding happens at the first occurrence of the departure stop and
/// alighting at the first occurrence of the arrival stop. The route only
/// matches when the former comes before the latter.
fn match_route(
    line: &Line,
    route: &Route,
    departure: StopId,
    arrival: StopId,
    default_fare: Decimal,
) -> Option<DirectOption> {
    if !route.is_usable() {
        return None;
    }

    let stops = route.stops();
    let board_idx = route.index_of(departure)?;
    let alight_idx = route.index_of(arrival)?;
    if board_idx >= alight_idx {
        return None;
    }

    Some(DirectOption {
        line: LineSummary::from_line(line, default_fare),
        direction: route.direction(),
        description: route.description().map(str::to_string),
        stop_count: alight_idx - board_idx,
        stops: stops[board_idx..=alight_idx].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, LineStatus};
    use crate::snapshot::{NetworkSnapshot, NetworkSnapshotBuilder};

    const ANALAKELY: u64 = 1;
    const AMBOHIJATOVO: u64 = 2;
    const ANTANIMENA: u64 = 3;
    const FARAVOHITRA: u64 = 4;

    fn fare() -> Decimal {
        Decimal::from(600)
    }

    fn id(n: u64) -> StopId {
        StopId::new(n)
    }

    fn stops() -> NetworkSnapshotBuilder {
        NetworkSnapshotBuilder::new()
            .stop(ANALAKELY, "Analakely", -18.905, 47.525)
            .stop(AMBOHIJATOVO, "Ambohijatovo", -18.910, 47.527)
            .stop(ANTANIMENA, "Antanimena", -18.898, 47.522)
            .stop(FARAVOHITRA, "Faravohitra", -18.903, 47.530)
    }

    fn line_21() -> NetworkSnapshot {
        stops()
            .line(21, "21", Some(Decimal::from(600)), LineStatus::Active)
            .route(
                Direction::Outbound,
                Some("Analakely - Antanimena"),
                &[ANALAKELY, AMBOHIJATOVO, ANTANIMENA],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn forward_match() {
        let network = line_21();
        let options = find_direct(&network, id(ANALAKELY), id(ANTANIMENA), fare()).unwrap();

        assert_eq!(options.len(), 1);
        let option = &options[0];
        assert_eq!(option.stop_count, 2);
        assert_eq!(option.line.number, "21");
        assert_eq!(option.line.fare, Decimal::from(600));
        assert_eq!(option.direction, Direction::Outbound);
        assert_eq!(option.description.as_deref(), Some("Analakely - Antanimena"));

        let names: Vec<&str> = option.stops.iter().map(|s| s.stop.name.as_str()).collect();
        assert_eq!(names, vec!["Analakely", "Ambohijatovo", "Antanimena"]);
        let positions: Vec<u32> = option.stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn reverse_direction_not_matched() {
        let network = line_21();
        let options = find_direct(&network, id(ANTANIMENA), id(ANALAKELY), fare()).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn separate_reverse_route_matches_only_in_its_own_direction() {
        let network = stops()
            .line(21, "21", None, LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, AMBOHIJATOVO, ANTANIMENA])
            .route(Direction::Inbound, None, &[ANTANIMENA, AMBOHIJATOVO, ANALAKELY])
            .build()
            .unwrap();

        let back = find_direct(&network, id(ANTANIMENA), id(ANALAKELY), fare()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].direction, Direction::Inbound);

        let forward = find_direct(&network, id(ANALAKELY), id(ANTANIMENA), fare()).unwrap();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].direction, Direction::Outbound);
    }

    #[test]
    fn sub_slice_of_longer_route() {
        let network = line_21();
        let options = find_direct(&network, id(AMBOHIJATOVO), id(ANTANIMENA), fare()).unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].stop_count, 1);
        assert_eq!(options[0].departure().map(|s| s.id), Some(id(AMBOHIJATOVO)));
        assert_eq!(options[0].arrival().map(|s| s.id), Some(id(ANTANIMENA)));
        // Position is the route's own numbering, not the slice index
        assert_eq!(options[0].stops[0].position, 2);
    }

    #[test]
    fn inactive_lines_ignored() {
        let network = stops()
            .line(21, "21", None, LineStatus::Inactive)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .build()
            .unwrap();

        assert!(find_direct(&network, id(ANALAKELY), id(ANTANIMENA), fare()).unwrap().is_empty());
    }

    #[test]
    fn fare_fallback_applied() {
        let network = stops()
            .line(1, "1", None, LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .line(2, "2", Some(Decimal::ZERO), LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .build()
            .unwrap();

        let options = find_direct(&network, id(ANALAKELY), id(ANTANIMENA), fare()).unwrap();
        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|o| o.line.fare == Decimal::from(600)));
    }

    #[test]
    fn every_matching_route_returned() {
        let network = stops()
            .line(1, "1", None, LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .route(Direction::Combined, None, &[FARAVOHITRA, ANALAKELY, AMBOHIJATOVO, ANTANIMENA])
            .line(2, "2", None, LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .build()
            .unwrap();

        let options = find_direct(&network, id(ANALAKELY), id(ANTANIMENA), fare()).unwrap();
        let summary: Vec<(u64, usize)> = options
            .iter()
            .map(|o| (o.line.id.get(), o.stop_count))
            .collect();
        assert_eq!(summary, vec![(1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn loop_route_contributes_once() {
        // A -> B -> A -> C: both stops located at their first occurrence
        let network = stops()
            .line(7, "7", None, LineStatus::Active)
            .route(
                Direction::Combined,
                None,
                &[ANALAKELY, AMBOHIJATOVO, ANALAKELY, ANTANIMENA],
            )
            .build()
            .unwrap();

        let options = find_direct(&network, id(ANALAKELY), id(ANTANIMENA), fare()).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].stop_count, 3);

        // Positions are first occurrences: Analakely sits before Ambohijatovo
        let options = find_direct(&network, id(AMBOHIJATOVO), id(ANALAKELY), fare()).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn same_stop_has_no_ride() {
        let network = line_21();
        assert!(find_direct(&network, id(ANALAKELY), id(ANALAKELY), fare()).unwrap().is_empty());
    }

    #[test]
    fn unknown_stops_yield_empty() {
        let network = line_21();
        assert!(find_direct(&network, id(99), id(ANTANIMENA), fare()).unwrap().is_empty());
        assert!(find_direct(&network, id(ANALAKELY), id(99), fare()).unwrap().is_empty());
    }

    #[test]
    fn single_stop_route_unusable() {
        let network = stops()
            .line(1, "1", None, LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY])
            .build()
            .unwrap();

        assert!(find_direct(&network, id(ANALAKELY), id(ANALAKELY), fare()).unwrap().is_empty());
        assert!(find_direct(&network, id(ANALAKELY), id(ANTANIMENA), fare()).unwrap().is_empty());
    }
}
