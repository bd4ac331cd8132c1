//! Feed command handler
//!
//! Drives the feed controller end to end: acquire or resolve a
//! location, load the first page, optionally paginate, and wait out
//! the silent enrichment re-poll before rendering.

use crate::catalog::{CatalogClient, Category};
use crate::cli::output;
use crate::config::Config;
use crate::error::Result;
use crate::feed::{FeedController, FeedPhase, QueryCache};
use crate::geo::resolver::SearchResolver;
use crate::geo::Coordinates;
use crate::location::{IpPositionSource, LastKnownStore, StaticPosition};
use clap::Args;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Feed command arguments
#[derive(Args)]
pub struct FeedArgs {
    /// Named place (resolved through place search; text query path)
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub place: Option<String>,

    /// Latitude (coordinate query path)
    #[arg(long, requires = "lng")]
    pub lat: Option<f64>,

    /// Longitude (coordinate query path)
    #[arg(long, requires = "lat")]
    pub lng: Option<f64>,

    /// Category filter
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Number of pages to load
    #[arg(long, short = 'p', default_value = "1")]
    pub pages: u32,

    /// Don't wait for the enrichment re-poll to settle
    #[arg(long)]
    pub no_wait: bool,

    /// Output JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Override the catalog base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Run the feed command
pub async fn run(args: FeedArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(base_url) = args.base_url {
        config.catalog.base_url = base_url;
    }

    let category = match &args.category {
        Some(raw) => Category::from_str(raw).map_err(crate::error::Error::Config)?,
        None => Category::All,
    };

    let catalog = Arc::new(CatalogClient::new(
        config.catalog.base_url.clone(),
        Duration::from_secs(config.catalog.timeout_secs),
    ));
    let cache = Arc::new(QueryCache::new(config.feed.cache_radius_km));
    let settings = config.feed_settings();
    let feed = FeedController::new(catalog, cache, settings.clone());

    if category != Category::All {
        // Applied before the first load so only one fetch is issued
        feed.set_category(category).await;
    }

    let store = LastKnownStore::new();
    let fallback = config.fallback_anchor();

    if let Some(place_query) = &args.place {
        let resolver = SearchResolver::new(
            config.search.allowed_countries.clone(),
            config.search.limit,
        );
        match resolver.resolve(place_query).await? {
            Some(place) => {
                eprintln!("Resolved to: {}", place.display_label());
                feed.select_place(place.coords, place.name).await;
            }
            None => {
                eprintln!("Error: Could not resolve '{}'", place_query);
                std::process::exit(1);
            }
        }
    } else if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let coords = Coordinates::new(lat, lng);
        coords.validate()?;
        feed.start(&StaticPosition::new(coords), &store, &fallback)
            .await;
    } else {
        feed.start(&IpPositionSource::new(), &store, &fallback).await;
    }

    if let Some(notice) = feed.take_notice() {
        eprintln!("Note: {}", notice);
    }

    for _ in 1..args.pages {
        if !feed.snapshot().has_more {
            break;
        }
        feed.load_more().await;
    }

    if !args.no_wait {
        wait_for_enrichment(&feed, &settings).await;
    }

    let snapshot = feed.snapshot();
    if args.json {
        println!("{}", output::render_feed_json(&snapshot)?);
    } else {
        print!("{}", output::render_feed_text(&snapshot));
    }

    Ok(())
}

/// Block until the silent re-poll cycle has settled
async fn wait_for_enrichment(
    feed: &FeedController<CatalogClient>,
    settings: &crate::feed::FeedSettings,
) {
    // Upper bound: every allowed attempt plus a little slack each
    let per_attempt = settings.repoll_delay + Duration::from_secs(2);
    for _ in 0..settings.repoll_max_attempts {
        if feed.snapshot().phase != FeedPhase::PollingEnrichment {
            return;
        }
        eprintln!("Waiting for enrichment...");
        tokio::time::sleep(per_attempt).await;
    }
}
