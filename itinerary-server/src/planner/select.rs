//! Leg selection for transfer composition.
//!
//! When a leg has more direct options than the per-leg cap, something has
//! to decide which ones are combined. The historical behavior keeps the
//! first ones found (network order), which is arbitrary with respect to
//! rider cost; the other policies rank before truncating.

use std::fmt;
use std::str::FromStr;

use super::itinerary::DirectOption;

/// Policy for choosing which direct options to keep per transfer leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegSelection {
    /// Keep the first options in network scan order.
    #[default]
    SourceOrder,
    /// Prefer rides with fewer stops, then lower fare.
    FewestStops,
    /// Prefer cheaper lines, then fewer stops.
    LowestFare,
}

/// Error returned when parsing an unknown leg selection name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown leg selection {0:?}: expected source, fewest-stops or lowest-fare")]
pub struct InvalidLegSelection(String);

impl FromStr for LegSelection {
    type Err = InvalidLegSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" | "source-order" => Ok(LegSelection::SourceOrder),
            "fewest-stops" => Ok(LegSelection::FewestStops),
            "lowest-fare" => Ok(LegSelection::LowestFare),
            _ => Err(InvalidLegSelection(s.to_string())),
        }
    }
}

impl fmt::Display for LegSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LegSelection::SourceOrder => "source",
            LegSelection::FewestStops => "fewest-stops",
            LegSelection::LowestFare => "lowest-fare",
        })
    }
}

/// Keep at most `limit` legs according to `policy`.
///
/// Sorting is stable, so ties keep network scan order.
pub fn select_legs(
    mut legs: Vec<DirectOption>,
    policy: LegSelection,
    limit: usize,
) -> Vec<DirectOption> {
    match policy {
        LegSelection::SourceOrder => {}
        LegSelection::FewestStops => {
            legs.sort_by(|a, b| {
                a.stop_count
                    .cmp(&b.stop_count)
                    .then_with(|| a.line.fare.cmp(&b.line.fare))
            });
        }
        LegSelection::LowestFare => {
            legs.sort_by(|a, b| {
                a.line
                    .fare
                    .cmp(&b.line.fare)
                    .then_with(|| a.stop_count.cmp(&b.stop_count))
            });
        }
    }

    legs.truncate(limit);
    legs
}
