//! Shared, refreshable snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::client::SnapshotClient;
use super::document::SnapshotDocument;
use super::error::SnapshotError;
use super::network::NetworkSnapshot;

/// Where snapshot documents come from.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    /// A JSON document on disk
    File(PathBuf),
    /// The backend's HTTP export
    Http(SnapshotClient),
}

impl SnapshotSource {
    /// Load and validate a snapshot from this source.
    pub async fn load(&self) -> Result<NetworkSnapshot, SnapshotError> {
        let document = match self {
            SnapshotSource::File(path) => {
                let json = tokio::fs::read_to_string(path).await.map_err(|e| {
                    SnapshotError::Io {
                        message: format!("failed to read {}: {}", path.display(), e),
                    }
                })?;
                SnapshotDocument::from_json(&json)?
            }
            SnapshotSource::Http(client) => client.fetch().await?,
        };

        NetworkSnapshot::from_document(document)
    }
}

/// A snapshot together with the version it was published under.
///
/// Versions increase by one on every successful refresh, so results
/// computed against an older version can be told apart.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    pub version: u64,
    pub snapshot: Arc<NetworkSnapshot>,
}

/// Thread-safe holder of the current snapshot.
///
/// Readers take a cheap handle and keep a consistent view for the whole
/// request even if a refresh lands meanwhile.
pub struct SnapshotStore {
    current: RwLock<SnapshotHandle>,
    source: Option<SnapshotSource>,
}

impl SnapshotStore {
    /// Load the initial snapshot from `source`.
    ///
    /// This will fail if the source is unreachable or invalid.
    pub async fn load(source: SnapshotSource) -> Result<Self, SnapshotError> {
        let snapshot = source.load().await?;
        info!(
            stops = snapshot.stop_count(),
            lines = snapshot.line_count(),
            "Loaded network snapshot"
        );

        Ok(Self {
            current: RwLock::new(SnapshotHandle {
                version: 1,
                snapshot: Arc::new(snapshot),
            }),
            source: Some(source),
        })
    }

    /// Wrap a fixed snapshot with no source to refresh from.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Self {
        Self {
            current: RwLock::new(SnapshotHandle {
                version: 1,
                snapshot: Arc::new(snapshot),
            }),
            source: None,
        }
    }

    /// Get the current snapshot.
    pub async fn current(&self) -> SnapshotHandle {
        self.current.read().await.clone()
    }

    /// Replace the current snapshot.
    ///
    /// Returns the new version.
    pub async fn replace(&self, snapshot: NetworkSnapshot) -> u64 {
        let mut guard = self.current.write().await;
        guard.version += 1;
        guard.snapshot = Arc::new(snapshot);
        guard.version
    }

    /// Reload from the configured source.
    ///
    /// On success, replaces the current snapshot and returns the new
    /// version. On failure, the existing snapshot is preserved and the
    /// error is returned.
    pub async fn refresh(&self) -> Result<u64, SnapshotError> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| SnapshotError::Unavailable("no snapshot source configured".into()))?;

        let snapshot = source.load().await?;
        let stops = snapshot.stop_count();
        let lines = snapshot.line_count();
        let version = self.replace(snapshot).await;

        info!(version, stops, lines, "Refreshed network snapshot");
        Ok(version)
    }
}
