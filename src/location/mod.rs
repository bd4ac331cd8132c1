//! Device position acquisition
//!
//! Three-tier fallback so the feed always has an anchor to query:
//! live position source, then the last-known stored fix, then a
//! configured fallback anchor. Precision degrades, availability never.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::LAST_KNOWN_FILE;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::warn;

/// Label used when a live or stored fix has no place name
pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

/// A device position fix
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
    /// Place name reported by the source, when available
    pub place: Option<String>,
}

/// Trait for live position sources
pub trait PositionSource: Send + Sync {
    /// Obtain the current device position
    fn current(&self) -> impl std::future::Future<Output = Result<Position>> + Send;
}

/// Which tier produced an acquired position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionTier {
    Live,
    LastKnown,
    Fallback,
}

/// Result of three-tier acquisition
#[derive(Debug, Clone)]
pub struct AcquiredPosition {
    pub coords: Coordinates,
    pub label: String,
    pub tier: PositionTier,
}

/// Configured final fallback anchor
#[derive(Debug, Clone)]
pub struct FallbackAnchor {
    pub coords: Coordinates,
    pub label: String,
}

/// Acquire a position: live source, then last-known fix, then fallback
///
/// Never fails; a live success refreshes the last-known store.
pub async fn acquire(
    source: &impl PositionSource,
    store: &LastKnownStore,
    fallback: &FallbackAnchor,
) -> AcquiredPosition {
    match source.current().await {
        Ok(position) => {
            store.save(&position);
            AcquiredPosition {
                coords: position.coords,
                label: position
                    .place
                    .unwrap_or_else(|| CURRENT_LOCATION_LABEL.to_string()),
                tier: PositionTier::Live,
            }
        }
        Err(e) => {
            warn!(error = %e, "live position unavailable, falling back");
            match store.load() {
                Some(position) => AcquiredPosition {
                    coords: position.coords,
                    label: position
                        .place
                        .unwrap_or_else(|| CURRENT_LOCATION_LABEL.to_string()),
                    tier: PositionTier::LastKnown,
                },
                None => AcquiredPosition {
                    coords: fallback.coords,
                    label: fallback.label.clone(),
                    tier: PositionTier::Fallback,
                },
            }
        }
    }
}

/// IP-based position source (ip-api.com)
#[derive(Debug)]
pub struct IpPositionSource {
    client: reqwest::Client,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    country: Option<String>,
}

impl IpPositionSource {
    /// Create a new IP position source
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for IpPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for IpPositionSource {
    async fn current(&self) -> Result<Position> {
        let response = self
            .client
            .get(IP_API_URL)
            .send()
            .await
            .map_err(|e| Error::Location(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Location(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Location(format!("Failed to parse IP location response: {}", e)))?;

        if data.status != "success" {
            return Err(Error::Location("IP location lookup failed".to_string()));
        }

        let lat = data
            .lat
            .ok_or_else(|| Error::Location("No latitude in response".to_string()))?;
        let lng = data
            .lon
            .ok_or_else(|| Error::Location("No longitude in response".to_string()))?;

        let place = [data.city, data.country]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Position {
            coords: Coordinates::new(lat, lng),
            place: if place.is_empty() { None } else { Some(place) },
        })
    }
}

/// A fixed position source
///
/// Used when coordinates are supplied explicitly (CLI flags, tests).
#[derive(Debug, Clone)]
pub struct StaticPosition {
    position: Position,
}

impl StaticPosition {
    /// Create a source that always reports the given coordinates
    pub fn new(coords: Coordinates) -> Self {
        Self {
            position: Position {
                coords,
                place: None,
            },
        }
    }

    /// Create a source with a place name attached
    pub fn with_place(coords: Coordinates, place: impl Into<String>) -> Self {
        Self {
            position: Position {
                coords,
                place: Some(place.into()),
            },
        }
    }
}

impl PositionSource for StaticPosition {
    async fn current(&self) -> Result<Position> {
        Ok(self.position.clone())
    }
}

/// Stored last-known fix
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPosition {
    coords: Coordinates,
    place: Option<String>,
    /// Unix seconds of the save, informational only
    saved_at: u64,
}

/// File-backed store for the last successful fix
#[derive(Debug)]
pub struct LastKnownStore {
    path: Option<PathBuf>,
}

impl LastKnownStore {
    /// Create a store at the default cache path
    pub fn new() -> Self {
        let path = dirs::cache_dir().map(|p| p.join("castle-feed").join(LAST_KNOWN_FILE));
        Self { path }
    }

    /// Create a store at a specific path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Create a store that never persists anything
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Load the last-known fix, if any
    pub fn load(&self) -> Option<Position> {
        let path = self.path.as_ref()?;
        if !path.exists() {
            return None;
        }
        let content = fs::read_to_string(path).ok()?;
        let stored: StoredPosition = serde_json::from_str(&content).ok()?;
        Some(Position {
            coords: stored.coords,
            place: stored.place,
        })
    }

    /// Save a fix, best-effort
    pub fn save(&self, position: &Position) {
        let Some(path) = &self.path else {
            return;
        };

        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let saved_at = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let stored = StoredPosition {
            coords: position.coords,
            place: position.place.clone(),
            saved_at,
        };

        if let Ok(content) = serde_json::to_string_pretty(&stored) {
            let _ = fs::write(path, content);
        }
    }

    /// Clear the stored fix
    pub fn clear(&self) {
        if let Some(path) = &self.path {
            let _ = fs::remove_file(path);
        }
    }
}

impl Default for LastKnownStore {
    fn default() -> Self {
        Self::new()
    }
}
