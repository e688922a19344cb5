//! Network snapshot: the read-only view of lines, routes and stops.
//!
//! The CRUD backend owns the data. This module loads it (from a file or the
//! backend's HTTP export), validates it into immutable domain values, and
//! serves it to the resolver through [`SnapshotProvider`].

mod client;
mod document;
mod error;
mod network;
mod provider;
mod store;

pub use client::{SnapshotClient, SnapshotClientConfig};
pub use document::{LineRecord, RouteRecord, RouteStopRecord, SnapshotDocument, StopRecord};
pub use error::SnapshotError;
pub use network::{NetworkSnapshot, NetworkSnapshotBuilder};
pub use provider::SnapshotProvider;
pub use store::{SnapshotHandle, SnapshotSource, SnapshotStore};
