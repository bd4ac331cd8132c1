//! Photon geocoding backend (Komoot)
//!
//! Primary remote tier for manual place search. Free, OSM-backed, no
//! API key. Results are filtered to the configured country allow-list
//! so the feed never lands in a region the catalog has no data for.

use crate::constants::api::PHOTON_URL;
use crate::error::{Error, Result};
use crate::geo::{Coordinates, GeocodeBackend, ResolvedPlace};
use serde::Deserialize;

const USER_AGENT: &str = "castle-feed/0.1.0";

/// Photon geocoding backend
#[derive(Debug, Clone)]
pub struct PhotonBackend {
    client: reqwest::Client,
    allowed_countries: Vec<String>,
}

/// Photon search response (GeoJSON FeatureCollection)
#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    properties: PhotonProperties,
    geometry: PhotonGeometry,
}

#[derive(Debug, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    country: Option<String>,
    countrycode: Option<String>,
}

/// Geometry is a GeoJSON point: coordinates are [lon, lat]
#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

impl PhotonBackend {
    /// Create a new Photon backend
    ///
    /// `allowed_countries` holds uppercase ISO alpha-2 codes; an empty
    /// list disables the filter.
    pub fn new(allowed_countries: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            allowed_countries,
        }
    }

    fn country_allowed(&self, code: Option<&str>) -> bool {
        if self.allowed_countries.is_empty() {
            return true;
        }
        match code {
            Some(code) => {
                let code = code.to_uppercase();
                self.allowed_countries.iter().any(|c| c == &code)
            }
            None => false,
        }
    }

    fn adapt(&self, feature: PhotonFeature) -> Option<ResolvedPlace> {
        let name = feature.properties.name?;
        if name.trim().is_empty() {
            return None;
        }
        let code = feature
            .properties
            .countrycode
            .as_deref()
            .map(str::to_uppercase);
        if !self.country_allowed(code.as_deref()) {
            return None;
        }
        // GeoJSON order: [lon, lat]
        let (lng, lat) = match feature.geometry.coordinates.as_slice() {
            [lng, lat, ..] => (*lng, *lat),
            _ => return None,
        };

        Some(ResolvedPlace {
            coords: Coordinates::new(lat, lng),
            name,
            country: feature.properties.country,
            country_code: code,
        })
    }
}

impl GeocodeBackend for PhotonBackend {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ResolvedPlace>> {
        let url = format!(
            "{}?q={}&lang=en&limit={}",
            PHOTON_URL,
            urlencoding::encode(query),
            limit
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Photon request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Photon returned status: {}",
                response.status()
            )));
        }

        let body: PhotonResponse = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Photon response: {}", e)))?;

        Ok(body
            .features
            .into_iter()
            .filter_map(|f| self.adapt(f))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(name: &str, code: &str, lng: f64, lat: f64) -> PhotonFeature {
        PhotonFeature {
            properties: PhotonProperties {
                name: Some(name.to_string()),
                country: Some("Somewhere".to_string()),
                countrycode: Some(code.to_string()),
            },
            geometry: PhotonGeometry {
                coordinates: vec![lng, lat],
            },
        }
    }

    #[test]
    fn test_adapt_swaps_geojson_order() {
        let backend = PhotonBackend::new(vec!["AT".to_string()]);
        let place = backend.adapt(feature("Salzburg", "at", 13.0550, 47.8095)).unwrap();
        assert!((place.coords.lat - 47.8095).abs() < 1e-9);
        assert!((place.coords.lng - 13.0550).abs() < 1e-9);
        assert_eq!(place.country_code.as_deref(), Some("AT"));
    }

    #[test]
    fn test_country_filter() {
        let backend = PhotonBackend::new(vec!["AT".to_string(), "DE".to_string()]);
        assert!(backend.adapt(feature("Munich", "DE", 11.582, 48.1351)).is_some());
        assert!(backend.adapt(feature("Tokyo", "JP", 139.6917, 35.6895)).is_none());
    }

    #[test]
    fn test_empty_filter_allows_all() {
        let backend = PhotonBackend::new(Vec::new());
        assert!(backend.adapt(feature("Tokyo", "JP", 139.6917, 35.6895)).is_some());
    }

    #[test]
    fn test_missing_country_code_rejected_when_filtered() {
        let backend = PhotonBackend::new(vec!["AT".to_string()]);
        let mut f = feature("Ghost", "AT", 0.0, 0.0);
        f.properties.countrycode = None;
        assert!(backend.adapt(f).is_none());
    }

    #[test]
    fn test_bad_geometry_rejected() {
        let backend = PhotonBackend::new(Vec::new());
        let mut f = feature("Broken", "AT", 0.0, 0.0);
        f.geometry.coordinates = vec![13.0];
        assert!(backend.adapt(f).is_none());
    }

    #[test]
    fn test_parse_response_shape() {
        let json = r#"{
            "features": [{
                "properties": {"name": "Vienna", "country": "Austria", "countrycode": "AT"},
                "geometry": {"type": "Point", "coordinates": [16.3738, 48.2082]}
            }]
        }"#;
        let parsed: PhotonResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.features.len(), 1);
        assert_eq!(parsed.features[0].properties.name.as_deref(), Some("Vienna"));
    }
}
