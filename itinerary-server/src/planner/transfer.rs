//! Transfer resolver.
//!
//! Composes two direct rides on different lines through one intermediate
//! stop. Candidates are tried in provider order and results are returned
//! in discovery order, capped; no attempt is made to find the best
//! itinerary.

use tracing::debug;

use crate::domain::StopId;
use crate::snapshot::{SnapshotError, SnapshotProvider};

use super::config::ResolverConfig;
use super::direct::find_direct;
use super::itinerary::TransferOption;
use super::select::select_legs;

/// Find two-leg itineraries from `departure` to `arrival`.
///
/// Returns at most `config.max_transfer_results` options. Generation stops
/// as soon as that many have been produced.
pub fn find_transfers<P: SnapshotProvider + ?Sized>(
    provider: &P,
    departure: StopId,
    arrival: StopId,
    config: &ResolverConfig,
) -> Result<Vec<TransferOption>, SnapshotError> {
    let mut options = Vec::new();

    if departure == arrival || config.max_transfer_results == 0 {
        return Ok(options);
    }

    let candidates = provider.transfer_candidates(config.max_transfer_candidates)?;
    let mut candidates_tried = 0;

    'candidates: for candidate in candidates {
        if candidate.id == departure || candidate.id == arrival {
            continue;
        }
        candidates_tried += 1;

        let first_legs = find_direct(provider, departure, candidate.id, config.default_fare)?;
        if first_legs.is_empty() {
            continue;
        }

        let second_legs = find_direct(provider, candidate.id, arrival, config.default_fare)?;
        if second_legs.is_empty() {
            continue;
        }

        let first_legs = select_legs(
            first_legs,
            config.leg_selection,
            config.max_legs_per_transfer,
        );
        let second_legs = select_legs(
            second_legs,
            config.leg_selection,
            config.max_legs_per_transfer,
        );

        for first in &first_legs {
            for second in &second_legs {
                // Staying on the same line is not a transfer
                if first.line.id == second.line.id {
                    continue;
                }

                options.push(TransferOption::new(
                    first.clone(),
                    second.clone(),
                    candidate.clone(),
                ));

                if options.len() >= config.max_transfer_results {
                    break 'candidates;
                }
            }
        }
    }

    options.truncate(config.max_transfer_results);

    debug!(
        departure = %departure,
        arrival = %arrival,
        candidates_tried,
        found = options.len(),
        "Transfer search complete"
    );

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use rust_decimal::Decimal;

    use crate::domain::{Direction, Line, LineStatus, Stop};
    use crate::planner::LegSelection;
    use crate::snapshot::{NetworkSnapshot, NetworkSnapshotBuilder};

    const ANALAKELY: u64 = 1;
    const AMBOHIJATOVO: u64 = 2;
    const ANTANIMENA: u64 = 3;
    const FARAVOHITRA: u64 = 4;
    const ISOTRY: u64 = 5;

    fn id(n: u64) -> StopId {
        StopId::new(n)
    }

    fn stops() -> NetworkSnapshotBuilder {
        NetworkSnapshotBuilder::new()
            .stop(ANALAKELY, "Analakely", -18.905, 47.525)
            .stop(AMBOHIJATOVO, "Ambohijatovo", -18.910, 47.527)
            .stop(ANTANIMENA, "Antanimena", -18.898, 47.522)
            .stop(FARAVOHITRA, "Faravohitra", -18.903, 47.530)
            .stop(ISOTRY, "Isotry", -18.912, 47.512)
    }

    /// Line 21 (600) Analakely -> Ambohijatovo -> Antanimena,
    /// Line 5 (500) Antanimena -> Faravohitra.
    fn scenario() -> NetworkSnapshot {
        stops()
            .line(21, "21", Some(Decimal::from(600)), LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, AMBOHIJATOVO, ANTANIMENA])
            .line(5, "5", Some(Decimal::from(500)), LineStatus::Active)
            .route(Direction::Outbound, None, &[ANTANIMENA, FARAVOHITRA])
            .build()
            .unwrap()
    }

    #[test]
    fn single_transfer_via_antanimena() {
        let network = scenario();
        let config = ResolverConfig::default();

        let options = find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), &config).unwrap();

        assert_eq!(options.len(), 1);
        let option = &options[0];
        assert_eq!(option.transfer_stop.name, "Antanimena");
        assert_eq!(option.total_fare, Decimal::from(1100));
        assert_eq!(option.total_stops, 3);
        assert_eq!(option.first.line.number, "21");
        assert_eq!(option.second.line.number, "5");
        assert_eq!(option.transfer_count(), 1);
    }

    #[test]
    fn fare_fallback_in_totals() {
        let network = stops()
            .line(1, "1", None, LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .line(2, "2", Some(Decimal::ZERO), LineStatus::Active)
            .route(Direction::Outbound, None, &[ANTANIMENA, FARAVOHITRA])
            .build()
            .unwrap();

        let options =
            find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), &ResolverConfig::default())
                .unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].first.line.fare, Decimal::from(600));
        assert_eq!(options[0].second.line.fare, Decimal::from(600));
        assert_eq!(options[0].total_fare, Decimal::from(1200));
    }

    #[test]
    fn same_line_is_not_a_transfer() {
        // Line 1 passes Antanimena on two routes that chain together
        let network = stops()
            .line(1, "1", None, LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .route(Direction::Inbound, None, &[ANTANIMENA, FARAVOHITRA])
            .build()
            .unwrap();

        let options =
            find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), &ResolverConfig::default())
                .unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn endpoints_never_used_as_transfer() {
        let network = scenario();
        let options =
            find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), &ResolverConfig::default())
                .unwrap();
        assert!(options.iter().all(|o| {
            o.transfer_stop.id != id(ANALAKELY) && o.transfer_stop.id != id(FARAVOHITRA)
        }));
    }

    #[test]
    fn candidate_window_limits_search() {
        let network = scenario();
        // Antanimena has id 3; only the first two stops are candidates
        let config = ResolverConfig {
            max_transfer_candidates: 2,
            ..ResolverConfig::default()
        };

        let options = find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), &config).unwrap();
        assert!(options.is_empty());
    }

    /// `count` parallel lines on each leg, all meeting at Antanimena.
    fn fan_network(first_leg_lines: u64, second_leg_lines: u64) -> NetworkSnapshot {
        let mut builder = stops();
        for n in 0..first_leg_lines {
            builder = builder
                .line(100 + n, &format!("A{n}"), None, LineStatus::Active)
                .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA]);
        }
        for n in 0..second_leg_lines {
            builder = builder
                .line(200 + n, &format!("B{n}"), None, LineStatus::Active)
                .route(Direction::Outbound, None, &[ANTANIMENA, FARAVOHITRA]);
        }
        builder.build().unwrap()
    }

    #[test]
    fn at_most_two_by_two_per_candidate() {
        let network = fan_network(4, 4);
        let config = ResolverConfig {
            max_transfer_results: 100,
            ..ResolverConfig::default()
        };

        let options = find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), &config).unwrap();

        assert_eq!(options.len(), 4);
        let pairs: Vec<(u64, u64)> = options
            .iter()
            .map(|o| (o.first.line.id.get(), o.second.line.id.get()))
            .collect();
        assert_eq!(pairs, vec![(100, 200), (100, 201), (101, 200), (101, 201)]);
    }

    #[test]
    fn capped_at_five_across_candidates() {
        // Two transfer points, each offering 2x2 combinations
        let mut builder = stops();
        for n in 0..2 {
            builder = builder
                .line(100 + n, &format!("A{n}"), None, LineStatus::Active)
                .route(Direction::Outbound, None, &[ANALAKELY, AMBOHIJATOVO, ANTANIMENA]);
        }
        for n in 0..2 {
            builder = builder
                .line(200 + n, &format!("B{n}"), None, LineStatus::Active)
                .route(Direction::Outbound, None, &[AMBOHIJATOVO, ANTANIMENA, FARAVOHITRA]);
        }
        let network = builder.build().unwrap();

        let options =
            find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), &ResolverConfig::default())
                .unwrap();

        assert_eq!(options.len(), 5);
        // Candidate order: Ambohijatovo (2) is exhausted before Antanimena (3)
        let via: Vec<u64> = options.iter().map(|o| o.transfer_stop.id.get()).collect();
        assert_eq!(via, vec![2, 2, 2, 2, 3]);
    }

    #[test]
    fn zero_result_cap() {
        let network = scenario();
        let config = ResolverConfig {
            max_transfer_results: 0,
            ..ResolverConfig::default()
        };
        assert!(
            find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), &config)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn lowest_fare_selection_changes_combinations() {
        let network = stops()
            .line(1, "1", Some(Decimal::from(800)), LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .line(2, "2", Some(Decimal::from(700)), LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .line(3, "3", Some(Decimal::from(300)), LineStatus::Active)
            .route(Direction::Outbound, None, &[ANALAKELY, ANTANIMENA])
            .line(4, "4", Some(Decimal::from(400)), LineStatus::Active)
            .route(Direction::Outbound, None, &[ANTANIMENA, FARAVOHITRA])
            .build()
            .unwrap();

        let source = ResolverConfig::default();
        let cheapest = ResolverConfig::default().with_leg_selection(LegSelection::LowestFare);

        let first_lines = |config: &ResolverConfig| -> Vec<u64> {
            find_transfers(&network, id(ANALAKELY), id(FARAVOHITRA), config)
                .unwrap()
                .iter()
                .map(|o| o.first.line.id.get())
                .collect()
        };

        assert_eq!(first_lines(&source), vec![1, 2]);
        assert_eq!(first_lines(&cheapest), vec![3, 2]);
    }

    /// Provider wrapper that counts line scans.
    struct CountingProvider {
        inner: NetworkSnapshot,
        scans: Cell<usize>,
    }

    impl SnapshotProvider for CountingProvider {
        fn active_lines(&self) -> Result<Vec<&Line>, SnapshotError> {
            self.scans.set(self.scans.get() + 1);
            self.inner.active_lines()
        }

        fn stop(&self, id: StopId) -> Result<Option<&Stop>, SnapshotError> {
            self.inner.stop(id)
        }

        fn transfer_candidates(&self, limit: usize) -> Result<Vec<&Stop>, SnapshotError> {
            self.inner.transfer_candidates(limit)
        }
    }

    #[test]
    fn second_leg_skipped_when_first_leg_empty() {
        // No line leaves Isotry, so no candidate has a first leg
        let provider = CountingProvider {
            inner: scenario(),
            scans: Cell::new(0),
        };

        let options =
            find_transfers(&provider, id(ISOTRY), id(FARAVOHITRA), &ResolverConfig::default())
                .unwrap();

        assert!(options.is_empty());
        // Five stops minus the two endpoints, one scan each
        assert_eq!(provider.scans.get(), 3);
    }

    #[test]
    fn early_termination_stops_scanning() {
        let provider = CountingProvider {
            inner: fan_network(3, 3),
            scans: Cell::new(0),
        };
        let config = ResolverConfig {
            max_transfer_results: 1,
            ..ResolverConfig::default()
        };

        let options = find_transfers(&provider, id(ANALAKELY), id(FARAVOHITRA), &config).unwrap();

        assert_eq!(options.len(), 1);
        // Ambohijatovo: one scan (no first leg). Antanimena: two scans, then done.
        assert_eq!(provider.scans.get(), 3);
    }

    /// Serves candidates from a real network but cannot list lines.
    struct FailingLines(NetworkSnapshot);

    impl SnapshotProvider for FailingLines {
        fn active_lines(&self) -> Result<Vec<&Line>, SnapshotError> {
            Err(SnapshotError::Unavailable("database gone".into()))
        }

        fn stop(&self, id: StopId) -> Result<Option<&Stop>, SnapshotError> {
            self.0.stop(id)
        }

        fn transfer_candidates(&self, limit: usize) -> Result<Vec<&Stop>, SnapshotError> {
            self.0.transfer_candidates(limit)
        }
    }

    #[test]
    fn provider_failure_propagates() {
        let result = find_transfers(
            &FailingLines(scenario()),
            id(ANALAKELY),
            id(FARAVOHITRA),
            &ResolverConfig::default(),
        );
        assert!(matches!(result, Err(SnapshotError::Unavailable(_))));
    }
}
