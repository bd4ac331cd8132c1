//! Distance-bounded result cache
//!
//! A single slot holding the last successful query's anchor, category,
//! and result set. A new query within the validity radius and with the
//! same category is served from here instead of the network.
//!
//! Injected into the controller rather than kept as a global, so feed
//! instances can be isolated (and tested) independently.

use crate::catalog::{Category, Place};
use crate::geo::{haversine_km, Coordinates};
use std::sync::Mutex;
use tracing::debug;

/// The cached query result
#[derive(Debug, Clone)]
pub struct CachedQuery {
    pub anchor: Coordinates,
    pub category: Category,
    pub label: String,
    pub places: Vec<Place>,
}

/// Single-slot query cache bounded by great-circle distance
#[derive(Debug)]
pub struct QueryCache {
    radius_km: f64,
    slot: Mutex<Option<CachedQuery>>,
}

impl QueryCache {
    /// Create a cache with the given validity radius in kilometers
    pub fn new(radius_km: f64) -> Self {
        Self {
            radius_km,
            slot: Mutex::new(None),
        }
    }

    /// Validity radius in kilometers
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Serve the cached places when the candidate query is close enough
    ///
    /// Hit iff: a slot exists, the category matches, the cached result
    /// is non-empty, and the candidate anchor lies strictly within the
    /// radius. Anything else forces a network fetch.
    pub fn try_serve(&self, anchor: Coordinates, category: Category) -> Option<Vec<Place>> {
        let slot = self.slot.lock().expect("cache lock poisoned");
        let cached = slot.as_ref()?;

        if cached.category != category || cached.places.is_empty() {
            return None;
        }

        let distance = haversine_km(anchor, cached.anchor);
        if distance < self.radius_km {
            debug!(distance_km = distance, label = %cached.label, "serving feed from cache");
            Some(cached.places.clone())
        } else {
            None
        }
    }

    /// Overwrite the slot
    ///
    /// Called only after a non-silent page-1 fetch succeeds; silent
    /// re-polls never move the anchor.
    pub fn store(
        &self,
        anchor: Coordinates,
        label: impl Into<String>,
        category: Category,
        places: &[Place],
    ) {
        let mut slot = self.slot.lock().expect("cache lock poisoned");
        *slot = Some(CachedQuery {
            anchor,
            category,
            label: label.into(),
            places: places.to_vec(),
        });
    }

    /// Drop the cached result
    pub fn clear(&self) {
        let mut slot = self.slot.lock().expect("cache lock poisoned");
        *slot = None;
    }
}
