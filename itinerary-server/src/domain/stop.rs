//! Stop identifiers and records.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// Identifier of a physical stop ("arrêt").
///
/// Stop ids are the integer primary keys assigned by the CRUD backend.
///
/// # Examples
///
/// ```
/// use itinerary_server::domain::StopId;
///
/// let id = StopId::parse("42").unwrap();
/// assert_eq!(id.get(), 42);
///
/// // Surrounding whitespace is tolerated
/// assert_eq!(StopId::parse(" 7 ").unwrap(), StopId::new(7));
///
/// // Empty and non-numeric input is rejected
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("abc").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StopId(u64);

impl StopId {
    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse a stop id from request input.
    ///
    /// The input must be a non-empty decimal integer, optionally surrounded
    /// by whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStopId {
                reason: "must be a decimal integer",
            });
        }

        trimmed.parse().map(StopId).map_err(|_| InvalidStopId {
            reason: "out of range",
        })
    }

    /// Returns the raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical boarding/alighting point.
///
/// The name is already normalized by the snapshot layer, so consumers never
/// need to fall back between legacy name fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    /// Create a new stop.
    pub fn new(id: StopId, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Display name used when the source record carries no usable name.
    pub fn fallback_name(id: StopId) -> String {
        format!("Arrêt #{id}")
    }
}
