//! Geographic primitives and place search
//!
//! Provides coordinates, great-circle distance, and the tiered place
//! search used for manual location changes (curated city table, then
//! Photon, then Nominatim as a fallback).

pub mod cities;
pub mod nominatim;
pub mod photon;
pub mod resolver;

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Calculate the great-circle distance between two points in kilometers
/// (Haversine formula)
///
/// Used for the cache-radius decision, not for ranking.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat * PI / 180.0;
    let lat2 = b.lat * PI / 180.0;
    let delta_lat = (b.lat - a.lat) * PI / 180.0;
    let delta_lng = (b.lng - a.lng) * PI / 180.0;

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// A resolved place suggestion from any search tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    /// Place coordinates
    pub coords: Coordinates,
    /// Bare place name (e.g. "Salzburg")
    pub name: String,
    /// Country name, when the backend provides one
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code, uppercase
    pub country_code: Option<String>,
}

impl ResolvedPlace {
    /// Full display label, e.g. "Salzburg, Austria"
    pub fn display_label(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// Trait for geocoding backends
pub trait GeocodeBackend: Send + Sync {
    /// Search a free-text place name, returning up to `limit` suggestions
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ResolvedPlace>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_validate_in_range() {
        assert!(Coordinates::new(48.2082, 16.3738).validate().is_ok());
        assert!(Coordinates::new(-90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -181.0).validate().is_err());
    }

    #[test]
    fn test_haversine_zero_distance() {
        let vienna = Coordinates::new(48.2082, 16.3738);
        assert_abs_diff_eq!(haversine_km(vienna, vienna), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let vienna = Coordinates::new(48.2082, 16.3738);
        let salzburg = Coordinates::new(47.8095, 13.0550);
        assert_abs_diff_eq!(
            haversine_km(vienna, salzburg),
            haversine_km(salzburg, vienna),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_haversine_vienna_salzburg() {
        let vienna = Coordinates::new(48.2082, 16.3738);
        let salzburg = Coordinates::new(47.8095, 13.0550);
        let distance = haversine_km(vienna, salzburg);
        // Roughly 250 km apart
        assert!(distance > 240.0 && distance < 260.0, "got {}", distance);
    }

    #[test]
    fn test_haversine_small_offset_under_one_km() {
        // A ~100m shift must stay well inside a 1 km cache radius
        let a = Coordinates::new(48.2082, 16.3738);
        let b = Coordinates::new(48.2090, 16.3740);
        let distance = haversine_km(a, b);
        assert!(distance < 0.15, "got {}", distance);
    }

    #[test]
    fn test_display_label() {
        let place = ResolvedPlace {
            coords: Coordinates::new(47.8095, 13.0550),
            name: "Salzburg".to_string(),
            country: Some("Austria".to_string()),
            country_code: Some("AT".to_string()),
        };
        assert_eq!(place.display_label(), "Salzburg, Austria");

        let bare = ResolvedPlace {
            coords: Coordinates::new(0.0, 0.0),
            name: "Nowhere".to_string(),
            country: None,
            country_code: None,
        };
        assert_eq!(bare.display_label(), "Nowhere");
    }
}
