//! Tiered place search resolver
//!
//! Resolution order for a manual city search:
//! 1. Curated city table (no network)
//! 2. Photon
//! 3. Nominatim, when Photon errors out or filters every hit

use crate::error::Result;
use crate::geo::nominatim::NominatimBackend;
use crate::geo::photon::PhotonBackend;
use crate::geo::{cities, GeocodeBackend, ResolvedPlace};
use tracing::debug;

/// Composed place search over the curated table and remote backends
#[derive(Debug, Clone)]
pub struct SearchResolver {
    photon: PhotonBackend,
    nominatim: NominatimBackend,
    limit: usize,
}

impl SearchResolver {
    /// Create a resolver
    ///
    /// `allowed_countries` (uppercase ISO alpha-2) is applied by both
    /// remote tiers; `limit` caps suggestions per search.
    pub fn new(allowed_countries: Vec<String>, limit: usize) -> Self {
        Self {
            photon: PhotonBackend::new(allowed_countries.clone()),
            nominatim: NominatimBackend::new(allowed_countries),
            limit: limit.max(1),
        }
    }

    /// Return suggestions for a free-text query
    pub async fn suggest(&self, query: &str) -> Result<Vec<ResolvedPlace>> {
        let local = cities::suggest(query, self.limit);
        if !local.is_empty() {
            debug!(query, hits = local.len(), "resolved from curated city table");
            return Ok(local);
        }

        match self.photon.search(query, self.limit).await {
            Ok(hits) if !hits.is_empty() => Ok(hits),
            Ok(_) => {
                debug!(query, "Photon returned no usable hits, trying Nominatim");
                self.nominatim.search(query, self.limit).await
            }
            Err(e) => {
                debug!(query, error = %e, "Photon failed, trying Nominatim");
                self.nominatim.search(query, self.limit).await
            }
        }
    }

    /// Resolve a query to its single best match
    pub async fn resolve(&self, query: &str) -> Result<Option<ResolvedPlace>> {
        Ok(self.suggest(query).await?.into_iter().next())
    }
}
