//! Location-aware incremental feed
//!
//! The controller orchestrates location acquisition, a distance-bounded
//! query cache, paginated catalog fetches, and a bounded silent re-poll
//! that picks up server-side enrichment without disturbing the list.

pub mod cache;
pub mod controller;

pub use cache::QueryCache;
pub use controller::{FeedController, FeedSettings};

use crate::catalog::{Anchor, Category, Place};
use crate::geo::Coordinates;
use serde::Serialize;

/// A geographic query anchor
///
/// Replaced wholesale on every location change, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub coords: Coordinates,
    /// Human-readable name ("Current Location", or a resolved place)
    pub label: String,
    /// True when set via explicit search rather than the device
    pub manual: bool,
}

impl Location {
    /// A device-derived location
    pub fn from_device(coords: Coordinates, label: impl Into<String>) -> Self {
        Self {
            coords,
            label: label.into(),
            manual: false,
        }
    }

    /// A location chosen through manual place search
    pub fn from_search(coords: Coordinates, label: impl Into<String>) -> Self {
        Self {
            coords,
            label: label.into(),
            manual: true,
        }
    }

    /// The catalog anchor for this location
    ///
    /// Manual locations query by text so the backend can disambiguate
    /// by name; device locations query by coordinates. Never both.
    pub fn anchor(&self) -> Anchor {
        if self.manual {
            Anchor::Text(self.label.clone())
        } else {
            Anchor::Coords(self.coords)
        }
    }
}

/// Controller phase, for display and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    Idle,
    Locating,
    Fetching,
    Ready,
    PollingEnrichment,
}

/// Consumer-facing view of the feed
///
/// Consumers only ever see this snapshot: items plus boolean flags.
/// Errors never propagate past the controller.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    pub items: Vec<Place>,
    pub phase: FeedPhase,
    pub loading: bool,
    pub refreshing: bool,
    pub loading_more: bool,
    pub has_more: bool,
    pub page: u32,
    pub category: Category,
    pub location: Option<Location>,
    /// Transient, non-blocking notice (degraded location, failed load)
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_location_anchors_by_text() {
        let location = Location::from_search(Coordinates::new(47.8095, 13.0550), "Salzburg");
        assert_eq!(location.anchor(), Anchor::Text("Salzburg".to_string()));
    }

    #[test]
    fn test_device_location_anchors_by_coords() {
        let coords = Coordinates::new(48.2082, 16.3738);
        let location = Location::from_device(coords, "Current Location");
        assert_eq!(location.anchor(), Anchor::Coords(coords));
    }
}
