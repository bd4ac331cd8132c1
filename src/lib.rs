//! castle-feed: Location-Aware Feed Client
//!
//! A library and CLI for the client-side data layer of a historic
//! points-of-interest feed: device location acquisition with graceful
//! degradation, tiered place search, a distance-bounded query cache,
//! paginated catalog fetches, and a bounded silent re-poll that picks
//! up server-side record enrichment without disturbing the list.
//!
//! ## Features
//!
//! - Three-tier location acquisition (live, last-known, fallback anchor)
//! - Place search over a curated city table, Photon, and Nominatim
//! - Single-slot result cache keyed by distance and category
//! - Deduplicated pagination driven by short-page detection
//! - Cancellable silent enrichment re-poll with in-place merging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use castle_feed::catalog::CatalogClient;
//! use castle_feed::feed::{FeedController, FeedSettings, QueryCache};
//! use castle_feed::geo::Coordinates;
//! use castle_feed::location::{LastKnownStore, StaticPosition};
//! use castle_feed::location::FallbackAnchor;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let catalog = Arc::new(CatalogClient::new(
//!     "https://example.com",
//!     Duration::from_secs(30),
//! ));
//! let cache = Arc::new(QueryCache::new(1.0));
//! let feed = FeedController::new(catalog, cache, FeedSettings::default());
//!
//! let vienna = Coordinates::new(48.2082, 16.3738);
//! let fallback = FallbackAnchor { coords: vienna, label: "Vienna".to_string() };
//! feed.start(
//!     &StaticPosition::new(vienna),
//!     &LastKnownStore::disabled(),
//!     &fallback,
//! )
//! .await;
//!
//! println!("{} places", feed.snapshot().items.len());
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod feed;
pub mod geo;
pub mod location;

// Re-export commonly used types
pub use catalog::{CatalogBackend, CatalogClient, Category, Place};
pub use config::Config;
pub use error::{Error, Result};
pub use feed::{FeedController, FeedSettings, FeedSnapshot, Location, QueryCache};
pub use geo::{haversine_km, Coordinates};
