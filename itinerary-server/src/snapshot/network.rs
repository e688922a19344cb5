//! In-memory network snapshot.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{Direction, Line, LineId, LineStatus, Route, RouteStop, Stop, StopId};

use super::error::SnapshotError;
use super::provider::SnapshotProvider;

/// An immutable, validated copy of the network.
///
/// Stops are kept in ascending id order, which is also the order in which
/// transfer candidates are offered.
#[derive(Debug, Clone, Default)]
pub struct NetworkSnapshot {
    stops: BTreeMap<StopId, Arc<Stop>>,
    lines: Vec<Line>,
}

impl NetworkSnapshot {
    /// Number of known stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of lines, active or not.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl SnapshotProvider for NetworkSnapshot {
    fn active_lines(&self) -> Result<Vec<&Line>, SnapshotError> {
        Ok(self.lines.iter().filter(|l| l.is_active()).collect())
    }

    fn stop(&self, id: StopId) -> Result<Option<&Stop>, SnapshotError> {
        Ok(self.stops.get(&id).map(|s| s.as_ref()))
    }

    fn transfer_candidates(&self, limit: usize) -> Result<Vec<&Stop>, SnapshotError> {
        Ok(self.stops.values().take(limit).map(|s| s.as_ref()).collect())
    }
}

/// A route waiting for its stop references to be resolved.
#[derive(Debug)]
struct PendingRoute {
    direction: Direction,
    description: Option<String>,
    stops: Vec<(StopId, u32)>,
}

#[derive(Debug)]
struct PendingLine {
    id: LineId,
    number: String,
    status: LineStatus,
    fare: Option<Decimal>,
    routes: Vec<PendingRoute>,
}

/// Builder for creating network snapshots.
///
/// Provides a fluent API for adding stops, lines and routes. Stop
/// references are resolved and route invariants checked in [`build`].
///
/// # Example
///
/// ```
/// use itinerary_server::domain::{Direction, LineStatus, StopId};
/// use itinerary_server::snapshot::{NetworkSnapshotBuilder, SnapshotProvider};
///
/// let network = NetworkSnapshotBuilder::new()
///     .stop(1, "Analakely", -18.905, 47.525)
///     .stop(2, "Ambohijatovo", -18.910, 47.527)
///     .line(21, "21", None, LineStatus::Active)
///     .route(Direction::Outbound, None, &[1, 2])
///     .build()
///     .unwrap();
///
/// assert_eq!(network.active_lines().unwrap().len(), 1);
/// assert!(network.stop(StopId::new(2)).unwrap().is_some());
/// ```
///
/// [`build`]: NetworkSnapshotBuilder::build
#[derive(Debug, Default)]
pub struct NetworkSnapshotBuilder {
    stops: Vec<Stop>,
    lines: Vec<PendingLine>,
    errors: Vec<String>,
}

impl NetworkSnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop.
    pub fn stop(mut self, id: u64, name: &str, latitude: f64, longitude: f64) -> Self {
        self.stops
            .push(Stop::new(StopId::new(id), name, latitude, longitude));
        self
    }

    /// Add an already-built stop.
    pub fn with_stop(mut self, stop: Stop) -> Self {
        self.stops.push(stop);
        self
    }

    /// Start a new line. Subsequent routes attach to it.
    pub fn line(mut self, id: u64, number: &str, fare: Option<Decimal>, status: LineStatus) -> Self {
        self.lines.push(PendingLine {
            id: LineId::new(id),
            number: number.to_string(),
            status,
            fare,
            routes: Vec::new(),
        });
        self
    }

    /// Add a route to the most recent line, numbering stops from 1.
    pub fn route(self, direction: Direction, description: Option<&str>, stop_ids: &[u64]) -> Self {
        let stops = stop_ids
            .iter()
            .zip(1u32..)
            .map(|(id, position)| (StopId::new(*id), position))
            .collect();
        self.route_with_positions(direction, description.map(str::to_string), stops)
    }

    /// Add a route to the most recent line with explicit positions.
    pub fn route_with_positions(
        mut self,
        direction: Direction,
        description: Option<String>,
        stops: Vec<(StopId, u32)>,
    ) -> Self {
        match self.lines.last_mut() {
            Some(line) => line.routes.push(PendingRoute {
                direction,
                description,
                stops,
            }),
            None => self
                .errors
                .push("route added before any line".to_string()),
        }
        self
    }

    /// Resolve references and validate the network.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Invalid` if a stop id is duplicated, a route
    /// references an unknown stop, or a route breaks a position invariant.
    pub fn build(self) -> Result<NetworkSnapshot, SnapshotError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(SnapshotError::Invalid(err));
        }

        let mut stops = BTreeMap::new();
        for stop in self.stops {
            match stops.entry(stop.id) {
                Entry::Occupied(_) => {
                    return Err(SnapshotError::Invalid(format!(
                        "duplicate stop id {}",
                        stop.id
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(stop));
                }
            }
        }

        let mut lines = Vec::with_capacity(self.lines.len());
        for pending in self.lines {
            let mut routes = Vec::with_capacity(pending.routes.len());
            for route in pending.routes {
                let route_stops = route
                    .stops
                    .into_iter()
                    .map(|(id, position)| {
                        stops
                            .get(&id)
                            .map(|stop| RouteStop::new(stop.clone(), position))
                            .ok_or_else(|| {
                                SnapshotError::Invalid(format!(
                                    "line {} references unknown stop {}",
                                    pending.number, id
                                ))
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let route = Route::new(route.direction, route.description, route_stops)
                    .map_err(|e| {
                        SnapshotError::Invalid(format!("line {}: {}", pending.number, e))
                    })?;
                routes.push(route);
            }

            lines.push(Line {
                id: pending.id,
                number: pending.number,
                status: pending.status,
                fare: pending.fare,
                routes,
            });
        }

        // Scan order follows the line number, whatever the input order
        lines.sort_by(|a, b| a.number.cmp(&b.number));

        Ok(NetworkSnapshot { stops, lines })
    }
}
