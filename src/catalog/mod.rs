//! Catalog service client
//!
//! Typed client for the remote points-of-interest catalog. The backend
//! enriches records asynchronously after first reference, emits ids as
//! strings or integers depending on version, and wraps result arrays in
//! a `data` envelope only sometimes; everything here is written to
//! tolerate all of that.

use crate::constants::api::CATALOG_PATH;
use crate::constants::markers::PLACEHOLDER_MARKERS;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "castle-feed/0.1.0";

/// Category filter for catalog queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    All,
    Castles,
    Ruins,
    Museums,
    Others,
}

impl Category {
    /// All selectable values, in display order
    pub const VALUES: &'static [Category] = &[
        Category::All,
        Category::Castles,
        Category::Ruins,
        Category::Museums,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Castles => "Castles",
            Category::Ruins => "Ruins",
            Category::Museums => "Museums",
            Category::Others => "Others",
        }
    }

    /// Query parameter value; `All` means no filter and is omitted
    pub fn query_param(&self) -> Option<&'static str> {
        match self {
            Category::All => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Category::All),
            "castles" => Ok(Category::Castles),
            "ruins" => Ok(Category::Ruins),
            "museums" => Ok(Category::Museums),
            "others" => Ok(Category::Others),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// One point of interest returned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Stable unique id; the backend emits strings or integers
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_place_category", deserialize_with = "de_category")]
    pub category: Category,
    #[serde(default, alias = "lat", deserialize_with = "de_opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon", deserialize_with = "de_opt_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Place {
    /// True when the record still awaits server-side enrichment
    ///
    /// Incomplete means: no images yet, or the description is missing,
    /// blank, or still a placeholder stub.
    pub fn needs_enrichment(&self) -> bool {
        if self.images.is_empty() {
            return true;
        }
        match &self.description {
            None => true,
            Some(d) => {
                let d = d.trim();
                if d.is_empty() {
                    return true;
                }
                let lower = d.to_lowercase();
                PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
            }
        }
    }

    /// Coordinates, when the record carries both
    pub fn coords(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

fn default_place_category() -> Category {
    Category::Castles
}

/// Accept a string or integer id, normalized to a string
fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Str(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

/// Accept a number or a numeric string; anything else becomes None
fn de_opt_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawF64 {
        Num(f64),
        Str(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<RawF64>::deserialize(deserializer)? {
        Some(RawF64::Num(n)) => Some(n),
        Some(RawF64::Str(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Unknown categories become Others, absent ones keep the default
fn de_category<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Category, D::Error> {
    Ok(match Option::<String>::deserialize(deserializer)? {
        Some(s) => Category::from_str(&s).unwrap_or(Category::Others),
        None => default_place_category(),
    })
}

/// The query anchor: device-derived coordinates, or the free text of a
/// manual search (the backend disambiguates names itself)
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    Coords(Coordinates),
    Text(String),
}

/// One catalog page request
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub category: Category,
    pub anchor: Anchor,
}

/// Catalog responses come in two shapes depending on backend version:
/// a wrapped `{"data": [...]}` object or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogBody {
    Wrapped { data: Vec<Place> },
    Bare(Vec<Place>),
}

impl CatalogBody {
    fn into_places(self) -> Vec<Place> {
        match self {
            CatalogBody::Wrapped { data } => data,
            CatalogBody::Bare(places) => places,
        }
    }
}

/// Trait for catalog backends
///
/// The feed controller is generic over this so tests can script
/// responses without a network.
pub trait CatalogBackend: Send + Sync {
    /// Fetch one page of places
    fn fetch_page(
        &self,
        query: &PageQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Place>>> + Send;
}

/// HTTP catalog client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn page_url(&self, query: &PageQuery) -> String {
        let mut url = format!(
            "{}{}?page={}&limit={}",
            self.base_url.trim_end_matches('/'),
            CATALOG_PATH,
            query.page,
            query.limit
        );

        if let Some(category) = query.category.query_param() {
            url.push_str(&format!("&category={}", urlencoding::encode(category)));
        }

        match &query.anchor {
            Anchor::Coords(coords) => {
                url.push_str(&format!("&lat={}&lon={}", coords.lat, coords.lng));
            }
            Anchor::Text(text) => {
                url.push_str(&format!("&q={}", urlencoding::encode(text)));
            }
        }

        url
    }
}

impl CatalogBackend for CatalogClient {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Place>> {
        let url = self.page_url(query);
        debug!(%url, "fetching catalog page");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Catalog(format!(
                "Catalog returned status: {}",
                response.status()
            )));
        }

        let body: CatalogBody = response
            .json()
            .await
            .map_err(|e| Error::Catalog(format!("Failed to parse catalog response: {}", e)))?;

        Ok(body.into_places())
    }
}
