//! Snapshot error types.

/// Errors that can occur while loading or reading a network snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected our credentials
    #[error("unauthorized: check ITINERARY_SNAPSHOT_API_KEY")]
    Unauthorized,

    /// The backend returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the snapshot document
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Failed to read the snapshot file
    #[error("IO error: {message}")]
    Io { message: String },

    /// The document violates a network invariant
    #[error("invalid snapshot: {0}")]
    Invalid(String),

    /// The backing store could not serve the read
    #[error("snapshot unavailable: {0}")]
    Unavailable(String),
}
