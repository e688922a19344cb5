//! The read-only boundary the resolver consumes.

use crate::domain::{Line, Stop, StopId};

use super::error::SnapshotError;

/// Trait for reading a consistent view of the network.
///
/// This abstraction allows the resolver to run against the in-memory
/// snapshot in production and against mock data in tests. Implementations
/// must return stable results for the duration of one resolve call.
pub trait SnapshotProvider {
    /// Lines currently in service, each with all of its routes.
    fn active_lines(&self) -> Result<Vec<&Line>, SnapshotError>;

    /// Look up a stop by id. `Ok(None)` means the stop does not exist.
    fn stop(&self, id: StopId) -> Result<Option<&Stop>, SnapshotError>;

    /// Stops to consider as transfer points, at most `limit` of them.
    ///
    /// Stops are returned in ascending id order so that results are
    /// reproducible between calls.
    fn transfer_candidates(&self, limit: usize) -> Result<Vec<&Stop>, SnapshotError>;
}
