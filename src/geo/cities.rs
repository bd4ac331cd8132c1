//! Curated city table
//!
//! First tier of place search: a static list of cities the catalog has
//! good coverage for. A hit here avoids a remote geocoding round-trip.

use crate::geo::{Coordinates, ResolvedPlace};

/// One curated city entry
pub struct City {
    pub name: &'static str,
    pub country: &'static str,
    pub country_code: &'static str,
    pub lat: f64,
    pub lng: f64,
}

/// Curated cities, Austria first, then major European capitals and a
/// handful of cities in the Americas.
pub const TOP_CITIES: &[City] = &[
    // Austria
    City { name: "Vienna", country: "Austria", country_code: "AT", lat: 48.2082, lng: 16.3738 },
    City { name: "Salzburg", country: "Austria", country_code: "AT", lat: 47.8095, lng: 13.0550 },
    City { name: "Innsbruck", country: "Austria", country_code: "AT", lat: 47.2692, lng: 11.4041 },
    City { name: "Graz", country: "Austria", country_code: "AT", lat: 47.0707, lng: 15.4395 },
    City { name: "Linz", country: "Austria", country_code: "AT", lat: 48.3069, lng: 14.2858 },
    City { name: "Klagenfurt", country: "Austria", country_code: "AT", lat: 46.6365, lng: 14.3122 },
    City { name: "Bregenz", country: "Austria", country_code: "AT", lat: 47.5008, lng: 9.7423 },
    City { name: "Eisenstadt", country: "Austria", country_code: "AT", lat: 47.8460, lng: 16.5331 },
    City { name: "St. Pölten", country: "Austria", country_code: "AT", lat: 48.2032, lng: 15.6305 },
    // Austrian castle and ruin hubs
    City { name: "Hallstatt", country: "Austria", country_code: "AT", lat: 47.5622, lng: 13.6493 },
    City { name: "Melk", country: "Austria", country_code: "AT", lat: 48.2269, lng: 15.3317 },
    City { name: "Dürnstein", country: "Austria", country_code: "AT", lat: 48.3965, lng: 15.5215 },
    City { name: "Krems an der Donau", country: "Austria", country_code: "AT", lat: 48.4092, lng: 15.6142 },
    City { name: "Kufstein", country: "Austria", country_code: "AT", lat: 47.5830, lng: 12.1706 },
    City { name: "Werfen", country: "Austria", country_code: "AT", lat: 47.4771, lng: 13.1895 },
    City { name: "Steyr", country: "Austria", country_code: "AT", lat: 48.0416, lng: 14.4214 },
    City { name: "Bad Ischl", country: "Austria", country_code: "AT", lat: 47.7127, lng: 13.6231 },
    City { name: "Feldkirch", country: "Austria", country_code: "AT", lat: 47.2371, lng: 9.5977 },
    City { name: "Hochosterwitz", country: "Austria", country_code: "AT", lat: 46.7560, lng: 14.4526 },
    City { name: "Gmunden", country: "Austria", country_code: "AT", lat: 47.9184, lng: 13.7993 },
    City { name: "Riegersburg", country: "Austria", country_code: "AT", lat: 47.0007, lng: 15.9326 },
    // European capitals and major cities
    City { name: "London", country: "United Kingdom", country_code: "GB", lat: 51.5074, lng: -0.1278 },
    City { name: "Paris", country: "France", country_code: "FR", lat: 48.8566, lng: 2.3522 },
    City { name: "Berlin", country: "Germany", country_code: "DE", lat: 52.5200, lng: 13.4050 },
    City { name: "Rome", country: "Italy", country_code: "IT", lat: 41.9028, lng: 12.4964 },
    City { name: "Madrid", country: "Spain", country_code: "ES", lat: 40.4168, lng: -3.7038 },
    City { name: "Prague", country: "Czechia", country_code: "CZ", lat: 50.0755, lng: 14.4378 },
    City { name: "Amsterdam", country: "Netherlands", country_code: "NL", lat: 52.3676, lng: 4.9041 },
    City { name: "Brussels", country: "Belgium", country_code: "BE", lat: 50.8503, lng: 4.3517 },
    City { name: "Lisbon", country: "Portugal", country_code: "PT", lat: 38.7223, lng: -9.1393 },
    City { name: "Budapest", country: "Hungary", country_code: "HU", lat: 47.4979, lng: 19.0402 },
    City { name: "Warsaw", country: "Poland", country_code: "PL", lat: 52.2297, lng: 21.0122 },
    City { name: "Copenhagen", country: "Denmark", country_code: "DK", lat: 55.6761, lng: 12.5683 },
    City { name: "Stockholm", country: "Sweden", country_code: "SE", lat: 59.3293, lng: 18.0686 },
    City { name: "Athens", country: "Greece", country_code: "GR", lat: 37.9838, lng: 23.7275 },
    City { name: "Dublin", country: "Ireland", country_code: "IE", lat: 53.3498, lng: -6.2603 },
    City { name: "Edinburgh", country: "United Kingdom", country_code: "GB", lat: 55.9533, lng: -3.1883 },
    City { name: "Barcelona", country: "Spain", country_code: "ES", lat: 41.3851, lng: 2.1734 },
    City { name: "Munich", country: "Germany", country_code: "DE", lat: 48.1351, lng: 11.5820 },
    City { name: "Venice", country: "Italy", country_code: "IT", lat: 45.4408, lng: 12.3155 },
    City { name: "Florence", country: "Italy", country_code: "IT", lat: 43.7696, lng: 11.2558 },
    City { name: "Krakow", country: "Poland", country_code: "PL", lat: 50.0647, lng: 19.9450 },
    City { name: "Zurich", country: "Switzerland", country_code: "CH", lat: 47.3769, lng: 8.5417 },
    City { name: "Bratislava", country: "Slovakia", country_code: "SK", lat: 48.1486, lng: 17.1077 },
    // Americas
    City { name: "New York", country: "United States", country_code: "US", lat: 40.7128, lng: -74.0060 },
    City { name: "Buenos Aires", country: "Argentina", country_code: "AR", lat: -34.6037, lng: -58.3816 },
    City { name: "Mexico City", country: "Mexico", country_code: "MX", lat: 19.4326, lng: -99.1332 },
    City { name: "Rio de Janeiro", country: "Brazil", country_code: "BR", lat: -22.9068, lng: -43.1729 },
];

impl City {
    fn to_resolved(&self) -> ResolvedPlace {
        ResolvedPlace {
            coords: Coordinates::new(self.lat, self.lng),
            name: self.name.to_string(),
            country: Some(self.country.to_string()),
            country_code: Some(self.country_code.to_string()),
        }
    }
}

/// Look up suggestions in the curated table
///
/// Exact (case-insensitive) matches rank before prefix matches; table
/// order breaks ties, so Austrian entries surface first.
pub fn suggest(query: &str, limit: usize) -> Vec<ResolvedPlace> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut exact = Vec::new();
    let mut prefix = Vec::new();
    for city in TOP_CITIES {
        let name = city.name.to_lowercase();
        if name == query {
            exact.push(city.to_resolved());
        } else if name.starts_with(&query) {
            prefix.push(city.to_resolved());
        }
    }

    exact.extend(prefix);
    exact.truncate(limit);
    exact
}

/// Look up the single best curated match for a query
pub fn lookup(query: &str) -> Option<ResolvedPlace> {
    suggest(query, 1).into_iter().next()
}
