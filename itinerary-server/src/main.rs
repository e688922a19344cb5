use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use itinerary_server::cache::CacheConfig;
use itinerary_server::history::{HistoryConfig, InMemoryHistory};
use itinerary_server::planner::{LegSelection, ResolverConfig};
use itinerary_server::snapshot::{
    SnapshotClient, SnapshotClientConfig, SnapshotSource, SnapshotStore,
};
use itinerary_server::web::{AppState, create_router};

/// Default interval between snapshot refreshes.
const DEFAULT_REFRESH_SECS: u64 = 300;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// How often expired history is swept (1 hour).
const HISTORY_PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(message) = run().await {
        error!("{message}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let source = snapshot_source()?;
    let resolver_config = resolver_config()?;
    let refresh_interval = Duration::from_secs(
        env_parse("ITINERARY_SNAPSHOT_REFRESH_SECS")?.unwrap_or(DEFAULT_REFRESH_SECS),
    );

    // Fail fast if the network cannot be loaded
    let store = SnapshotStore::load(source)
        .await
        .map_err(|e| format!("Failed to load network snapshot: {e}"))?;
    let store = Arc::new(store);

    let state = AppState::new(
        store.clone(),
        InMemoryHistory::new(HistoryConfig::default()),
        &CacheConfig::default(),
        resolver_config,
    );

    // Refresh in the background; a failed refresh keeps the previous snapshot
    let cache = state.cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match store.refresh().await {
                // Entries for older versions can no longer be hit
                Ok(_) => cache.invalidate_all(),
                Err(e) => warn!(error = %e, "Failed to refresh network snapshot"),
            }
        }
    });

    // Sweep expired history of riders who stopped searching
    let history = state.history.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HISTORY_PRUNE_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            match history.prune(Utc::now()) {
                Ok(removed) if removed > 0 => info!(removed, "Pruned search history"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Failed to prune search history"),
            }
        }
    });

    let app = create_router(state);

    let addr: SocketAddr = std::env::var("ITINERARY_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .map_err(|e| format!("Invalid ITINERARY_BIND_ADDR: {e}"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    info!(%addr, "Itinerary server listening");
    info!("  GET    /health");
    info!("  GET    /api/transport/bus/recherche_itineraire/");
    info!("  GET    /api/interaction/historiques/");
    info!("  POST   /api/interaction/historiques/");
    info!("  DELETE /api/interaction/historiques/clear/");
    info!("  DELETE /api/interaction/historiques/:id/");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {e}"))
}

/// Snapshot source from `ITINERARY_SNAPSHOT_PATH` or `ITINERARY_SNAPSHOT_URL`.
fn snapshot_source() -> Result<SnapshotSource, String> {
    if let Ok(path) = std::env::var("ITINERARY_SNAPSHOT_PATH") {
        return Ok(SnapshotSource::File(PathBuf::from(path)));
    }

    let url = std::env::var("ITINERARY_SNAPSHOT_URL").map_err(|_| {
        "Set ITINERARY_SNAPSHOT_PATH or ITINERARY_SNAPSHOT_URL to locate the network".to_string()
    })?;

    let mut config = SnapshotClientConfig::new(url);
    match std::env::var("ITINERARY_SNAPSHOT_API_KEY") {
        Ok(key) => config = config.with_api_key(key),
        Err(_) => warn!("ITINERARY_SNAPSHOT_API_KEY not set. Fetching without credentials."),
    }

    let client = SnapshotClient::new(config)
        .map_err(|e| format!("Failed to create snapshot client: {e}"))?;
    Ok(SnapshotSource::Http(client))
}

fn resolver_config() -> Result<ResolverConfig, String> {
    let mut config = ResolverConfig::default();

    if let Some(max) = env_parse("ITINERARY_MAX_TRANSFER_CANDIDATES")? {
        config.max_transfer_candidates = max;
    }
    if let Some(policy) = env_parse::<LegSelection>("ITINERARY_LEG_SELECTION")? {
        config = config.with_leg_selection(policy);
    }

    Ok(config)
}

/// Parse an optional environment variable.
fn env_parse<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("Invalid {name}: {e}")),
        Err(_) => Ok(None),
    }
}
