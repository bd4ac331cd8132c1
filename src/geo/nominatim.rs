//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Fallback tier when Photon fails or filters every result away.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::constants::api::NOMINATIM_URL;
use crate::error::{Error, Result};
use crate::geo::{Coordinates, GeocodeBackend, ResolvedPlace};
use serde::Deserialize;

const USER_AGENT: &str = "castle-feed/0.1.0";

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    allowed_countries: Vec<String>,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

impl NominatimBackend {
    /// Create a new Nominatim backend
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

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lng)))?;
        Ok((lat, lng))
    }

    fn adapt(&self, result: NominatimResult) -> Option<ResolvedPlace> {
        let (lat, lng) = Self::parse_coords(&result.lat, &result.lon).ok()?;

        // Prefer the bare name; fall back to the first display_name segment
        let name = result
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                result
                    .display_name
                    .split(',')
                    .next()
                    .unwrap_or(&result.display_name)
                    .trim()
                    .to_string()
            });

        let (country, code) = match result.address {
            Some(addr) => (addr.country, addr.country_code.map(|c| c.to_uppercase())),
            None => (None, None),
        };

        if !self.allowed_countries.is_empty() {
            let code = code.as_deref()?;
            if !self.allowed_countries.iter().any(|c| c == code) {
                return None;
            }
        }

        Some(ResolvedPlace {
            coords: Coordinates::new(lat, lng),
            name,
            country,
            country_code: code,
        })
    }
}

impl GeocodeBackend for NominatimBackend {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ResolvedPlace>> {
        let url = format!(
            "{}/search?q={}&format=json&addressdetails=1&limit={}&accept-language=en",
            NOMINATIM_URL,
            urlencoding::encode(query),
            limit
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        Ok(results
            .into_iter()
            .filter_map(|r| self.adapt(r))
            .collect())
    }
}
