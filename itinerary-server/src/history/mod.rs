//! Search history.
//!
//! Each successful itinerary query by an identified rider is recorded.
//! Repeating the same (departure, arrival) search within the dedup window
//! refreshes the existing entry's timestamp instead of adding a new one.
//!
//! The in-memory store is bounded: entries older than the retention period
//! are dropped and each rider keeps at most a fixed number of entries.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use crate::domain::{Stop, StopId, UserId};

/// Repeat searches within this many minutes collapse into one entry.
pub const DEDUP_WINDOW_MINS: i64 = 30;

/// The dedup window as a duration.
pub fn dedup_window() -> Duration {
    Duration::minutes(DEDUP_WINDOW_MINS)
}

/// One recorded search.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: u64,
    pub user: UserId,
    pub departure: StopId,
    pub departure_name: String,
    pub arrival: StopId,
    pub arrival_name: String,
    pub searched_at: DateTime<Utc>,
}

/// What `record_search` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// A new entry with this id was created.
    Inserted(u64),
    /// The existing entry with this id had its timestamp refreshed.
    Refreshed(u64),
}

impl HistoryOutcome {
    pub fn id(self) -> u64 {
        match self {
            Self::Inserted(id) | Self::Refreshed(id) => id,
        }
    }
}

/// Error from the history store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere to record searches.
///
/// Resolution never fails because of history; callers log and continue.
pub trait HistorySink: Send + Sync {
    /// Record that `user` searched from `departure` to `arrival` at `now`.
    fn record_search(
        &self,
        user: UserId,
        departure: &Stop,
        arrival: &Stop,
        now: DateTime<Utc>,
    ) -> Result<HistoryOutcome, HistoryError>;
}

/// Configuration for the in-memory history store.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Entries last searched longer ago than this are dropped.
    pub retention: Duration,

    /// Maximum number of entries kept per rider; the oldest go first.
    pub max_entries_per_user: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention: Duration::days(90),
            max_entries_per_user: 100,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    by_user: HashMap<UserId, Vec<HistoryEntry>>,
    next_id: u64,
}

/// Process-local history store.
#[derive(Debug)]
pub struct InMemoryHistory {
    inner: Mutex<Inner>,
    config: HistoryConfig,
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl InMemoryHistory {
    /// Create an empty store with the given limits.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            config,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, HistoryError> {
        self.inner
            .lock()
            .map_err(|_| HistoryError::Unavailable("history lock poisoned".to_string()))
    }

    /// A rider's entries, most recent first.
    pub fn entries_for(&self, user: UserId) -> Result<Vec<HistoryEntry>, HistoryError> {
        let inner = self.lock()?;
        let mut entries = inner.by_user.get(&user).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.searched_at.cmp(&a.searched_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    /// One of a rider's entries by id.
    pub fn get(&self, user: UserId, id: u64) -> Result<Option<HistoryEntry>, HistoryError> {
        let inner = self.lock()?;
        Ok(inner
            .by_user
            .get(&user)
            .and_then(|entries| entries.iter().find(|e| e.id == id))
            .cloned())
    }

    /// Remove all of a rider's entries. Returns how many were removed.
    pub fn clear(&self, user: UserId) -> Result<usize, HistoryError> {
        let mut inner = self.lock()?;
        Ok(inner.by_user.remove(&user).map_or(0, |entries| entries.len()))
    }

    /// Remove one entry if it belongs to `user`.
    ///
    /// Returns `false` when no such entry exists for that rider, so other
    /// riders' entries are indistinguishable from missing ones.
    pub fn delete(&self, user: UserId, id: u64) -> Result<bool, HistoryError> {
        let mut inner = self.lock()?;
        let Some(entries) = inner.by_user.get_mut(&user) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let deleted = entries.len() < before;
        if entries.is_empty() {
            inner.by_user.remove(&user);
        }
        Ok(deleted)
    }

    /// Drop every entry older than the retention period as of `now`.
    ///
    /// Returns how many entries were removed.
    pub fn prune(&self, now: DateTime<Utc>) -> Result<usize, HistoryError> {
        let mut inner = self.lock()?;
        let cutoff = now - self.config.retention;
        let mut removed = 0;
        inner.by_user.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|e| e.searched_at >= cutoff);
            removed += before - entries.len();
            !entries.is_empty()
        });
        Ok(removed)
    }

    /// Total number of entries across all riders.
    pub fn len(&self) -> Result<usize, HistoryError> {
        let inner = self.lock()?;
        Ok(inner.by_user.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool, HistoryError> {
        Ok(self.len()? == 0)
    }
}

impl HistorySink for InMemoryHistory {
    fn record_search(
        &self,
        user: UserId,
        departure: &Stop,
        arrival: &Stop,
        now: DateTime<Utc>,
    ) -> Result<HistoryOutcome, HistoryError> {
        let mut inner = self.lock()?;
        let next_id = inner.next_id + 1;

        let entries = inner.by_user.entry(user).or_default();
        let retention_cutoff = now - self.config.retention;
        entries.retain(|e| e.searched_at >= retention_cutoff);

        let dedup_cutoff = now - dedup_window();
        let recent = entries
            .iter_mut()
            .filter(|e| {
                e.departure == departure.id
                    && e.arrival == arrival.id
                    && e.searched_at >= dedup_cutoff
            })
            .max_by_key(|e| e.searched_at);

        let outcome = match recent {
            Some(entry) => {
                entry.searched_at = now;
                HistoryOutcome::Refreshed(entry.id)
            }
            None => {
                entries.push(HistoryEntry {
                    id: next_id,
                    user,
                    departure: departure.id,
                    departure_name: departure.name.clone(),
                    arrival: arrival.id,
                    arrival_name: arrival.name.clone(),
                    searched_at: now,
                });
                HistoryOutcome::Inserted(next_id)
            }
        };

        while entries.len() > self.config.max_entries_per_user {
            let Some(oldest) = entries
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| (e.searched_at, e.id))
                .map(|(idx, _)| idx)
            else {
                break;
            };
            entries.remove(oldest);
        }

        if entries.is_empty() {
            inner.by_user.remove(&user);
        }

        if let HistoryOutcome::Inserted(id) = outcome {
            inner.next_id = id;
        }

        Ok(outcome)
    }
}
