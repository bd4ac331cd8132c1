//! Centralized constants for the castle-feed crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers (WGS84 approximation)
    pub const EARTH_RADIUS_KM: f64 = 6_371.0;
}

/// External API endpoints
pub mod api {
    /// Photon geocoding API (Komoot, OSM-backed)
    pub const PHOTON_URL: &str = "https://photon.komoot.io/api/";

    /// OpenStreetMap Nominatim geocoding API (fallback)
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Catalog service path, relative to the configured base URL
    pub const CATALOG_PATH: &str = "/api/localizaciones";
}

/// Enrichment detection
pub mod markers {
    /// Description fragments that mark a record as not yet enriched.
    ///
    /// The backend fills in descriptions asynchronously after a place is
    /// first referenced; until then it emits stubs containing one of these.
    pub const PLACEHOLDER_MARKERS: &[&str] = &["placeholder", "pending", "coming soon"];
}

/// Cache settings
pub mod cache {
    /// Last-known position cache file name
    pub const LAST_KNOWN_FILE: &str = "last_known_position.json";
}
