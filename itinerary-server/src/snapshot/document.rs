//! JSON interchange format exported by the CRUD backend.
//!
//! Field names follow the backend's serializers. Older exports name the stop
//! `nom` instead of `nomArret`; both are accepted and normalized into a
//! single display name here so that nothing downstream needs to care.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Direction, LineStatus, Stop, StopId};

use super::error::SnapshotError;
use super::network::{NetworkSnapshot, NetworkSnapshotBuilder};

/// Top-level snapshot document.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub arrets: Vec<StopRecord>,

    #[serde(default)]
    pub bus: Vec<LineRecord>,
}

/// A stop as exported by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct StopRecord {
    pub id: u64,

    #[serde(rename = "nomArret", default)]
    pub nom_arret: Option<String>,

    #[serde(default)]
    pub nom: Option<String>,

    pub latitude: f64,
    pub longitude: f64,
}

impl StopRecord {
    /// Resolve the display name: `nomArret`, then `nom`, then a synthesized
    /// `Arrêt #<id>`. Blank names count as missing.
    pub fn display_name(&self) -> String {
        [self.nom_arret.as_deref(), self.nom.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Stop::fallback_name(StopId::new(self.id)))
    }
}

/// A bus line as exported by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    pub id: u64,

    #[serde(rename = "numeroBus")]
    pub numero_bus: String,

    #[serde(default = "default_status")]
    pub status: String,

    /// Decimal fields arrive either as JSON numbers or as strings
    #[serde(default)]
    pub frais: Option<Decimal>,

    #[serde(default)]
    pub trajets: Vec<RouteRecord>,
}

fn default_status() -> String {
    "Actif".to_string()
}

/// A directional route of a line.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRecord {
    #[serde(rename = "typeTrajet")]
    pub type_trajet: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub arrets: Vec<RouteStopRecord>,
}

/// One stop of a route with its passage order.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteStopRecord {
    #[serde(rename = "arretRef")]
    pub arret_ref: u64,

    #[serde(rename = "ordrePassage")]
    pub ordre_passage: u32,
}

impl SnapshotDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Json {
            message: e.to_string(),
        })
    }
}

impl NetworkSnapshot {
    /// Validate a backend document and build a snapshot from it.
    pub fn from_document(document: SnapshotDocument) -> Result<Self, SnapshotError> {
        let mut builder = NetworkSnapshotBuilder::new();

        for record in &document.arrets {
            builder = builder.with_stop(Stop::new(
                StopId::new(record.id),
                record.display_name(),
                record.latitude,
                record.longitude,
            ));
        }

        for line in document.bus {
            builder = builder.line(
                line.id,
                &line.numero_bus,
                line.frais,
                LineStatus::from_label(&line.status),
            );

            for route in line.trajets {
                let direction = Direction::from_label(&route.type_trajet).map_err(|e| {
                    SnapshotError::Invalid(format!("line {}: {}", line.numero_bus, e))
                })?;
                let stops = route
                    .arrets
                    .iter()
                    .map(|s| (StopId::new(s.arret_ref), s.ordre_passage))
                    .collect();
                builder = builder.route_with_positions(direction, route.description, stops);
            }
        }

        builder.build()
    }
}
