//! Bus lines.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::Route;

/// Identifier of a bus line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LineId(u64);

impl LineId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational status of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Active,
    Inactive,
}

impl LineStatus {
    /// Interpret a status label from the backend.
    ///
    /// `Actif` (the backend default) and `active` mean active regardless of
    /// case; every other label, including an empty one, means inactive.
    ///
    /// ```
    /// use itinerary_server::domain::LineStatus;
    ///
    /// assert_eq!(LineStatus::from_label("Actif"), LineStatus::Active);
    /// assert_eq!(LineStatus::from_label("ACTIVE"), LineStatus::Active);
    /// assert_eq!(LineStatus::from_label("Suspendu"), LineStatus::Inactive);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("actif") || label.eq_ignore_ascii_case("active") {
            LineStatus::Active
        } else {
            LineStatus::Inactive
        }
    }
}

/// A numbered bus service with its directional routes.
#[derive(Debug, Clone)]
pub struct Line {
    pub id: LineId,

    /// Human-readable number shown to riders (e.g. "21", "129B")
    pub number: String,

    pub status: LineStatus,

    /// Flat fare, if the backend has one on record
    pub fare: Option<Decimal>,

    pub routes: Vec<Route>,
}

impl Line {
    /// Returns true if the line is in service.
    pub fn is_active(&self) -> bool {
        self.status == LineStatus::Active
    }

    /// Returns the fare to charge for riding this line.
    ///
    /// An unset or zero fare falls back to `fallback`.
    pub fn effective_fare(&self, fallback: Decimal) -> Decimal {
        match self.fare {
            Some(fare) if !fare.is_zero() => fare,
            _ => fallback,
        }
    }
}
