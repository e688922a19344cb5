//! Resolver configuration.

use rust_decimal::Decimal;

use super::select::LegSelection;

/// Configuration parameters for itinerary resolution.
///
/// The caps are load-shedding limits rather than business rules. Networks
/// much larger than a single city's bus map will want smarter transfer
/// candidate selection (spatial indexing, a precomputed line adjacency
/// graph) instead of raising `max_transfer_candidates`.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum number of stops tried as transfer points.
    pub max_transfer_candidates: usize,

    /// Maximum number of direct options kept per leg when combining
    /// transfers, so at most this squared pairs per candidate.
    pub max_legs_per_transfer: usize,

    /// Maximum number of transfer options returned.
    pub max_transfer_results: usize,

    /// Fare charged for a line with no (or a zero) fare on record.
    pub default_fare: Decimal,

    /// Which direct options to keep per leg.
    pub leg_selection: LegSelection,
}

impl ResolverConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_transfer_candidates: usize,
        max_legs_per_transfer: usize,
        max_transfer_results: usize,
        default_fare: Decimal,
        leg_selection: LegSelection,
    ) -> Self {
        Self {
            max_transfer_candidates,
            max_legs_per_transfer,
            max_transfer_results,
            default_fare,
            leg_selection,
        }
    }

    /// Replace the leg selection policy.
    pub fn with_leg_selection(mut self, leg_selection: LegSelection) -> Self {
        self.leg_selection = leg_selection;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_transfer_candidates: 50,
            max_legs_per_transfer: 2,
            max_transfer_results: 5,
            default_fare: Decimal::from(600),
            leg_selection: LegSelection::SourceOrder,
        }
    }
}
