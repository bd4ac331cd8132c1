//! Feed refresh controller
//!
//! Orchestrates the feed lifecycle: location acquisition, cache
//! consult, catalog fetch, pagination, and the silent enrichment
//! re-poll. Logically single-writer: duplicate refresh and pagination
//! triggers are dropped by in-flight guards, and every dispatch carries
//! a generation token so a slow stale response can never clobber the
//! result of a newer one.

use crate::catalog::{CatalogBackend, Category, PageQuery, Place};
use crate::feed::cache::QueryCache;
use crate::feed::{FeedPhase, FeedSnapshot, Location};
use crate::geo::Coordinates;
use crate::location::{acquire, FallbackAnchor, LastKnownStore, PositionSource, PositionTier};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Tunable controller parameters
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Fixed page size sent with every catalog request
    pub page_size: u32,
    /// Delay before a silent enrichment re-poll
    pub repoll_delay: Duration,
    /// Silent re-poll attempts per load before giving up
    pub repoll_max_attempts: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        use crate::config::defaults::*;
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            repoll_delay: Duration::from_secs(DEFAULT_REPOLL_DELAY_SECS),
            repoll_max_attempts: DEFAULT_REPOLL_MAX_ATTEMPTS,
        }
    }
}

/// What kind of dispatch a load is; decides guards and merge policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    /// Full reset-and-reload (start, location change, category change)
    Reset,
    /// Pull-to-refresh of page 1
    Refresh,
    /// Pagination
    More,
    /// Background enrichment re-poll
    Silent,
}

#[derive(Debug)]
struct FeedState {
    location: Option<Location>,
    category: Category,
    items: Vec<Place>,
    page: u32,
    has_more: bool,
    phase: FeedPhase,
    loading: bool,
    refreshing: bool,
    loading_more: bool,
    notice: Option<String>,
    generation: u64,
    repoll_attempts: u32,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            location: None,
            category: Category::All,
            items: Vec::new(),
            page: 1,
            has_more: true,
            phase: FeedPhase::Idle,
            loading: false,
            refreshing: false,
            loading_more: false,
            notice: None,
            generation: 0,
            repoll_attempts: 0,
        }
    }
}

struct FeedCore<C> {
    catalog: Arc<C>,
    cache: Arc<QueryCache>,
    settings: FeedSettings,
    state: Mutex<FeedState>,
    repoll: Mutex<Option<JoinHandle<()>>>,
}

/// The feed refresh controller
///
/// Generic over the catalog backend; the cache is injected so feed
/// instances stay isolated from one another.
pub struct FeedController<C: CatalogBackend + 'static> {
    core: Arc<FeedCore<C>>,
}

impl<C: CatalogBackend + 'static> FeedController<C> {
    /// Create a controller
    pub fn new(catalog: Arc<C>, cache: Arc<QueryCache>, settings: FeedSettings) -> Self {
        Self {
            core: Arc::new(FeedCore {
                catalog,
                cache,
                settings,
                state: Mutex::new(FeedState::default()),
                repoll: Mutex::new(None),
            }),
        }
    }

    /// App start: acquire the device location and load the feed
    ///
    /// Acquisition never blocks the feed: live fix, then last-known,
    /// then the configured fallback anchor. Landing on the fallback
    /// surfaces a one-time notice instead of an error.
    pub async fn start(
        &self,
        source: &impl PositionSource,
        store: &LastKnownStore,
        fallback: &FallbackAnchor,
    ) {
        self.core.cancel_repoll();
        self.core.state().phase = FeedPhase::Locating;

        let acquired = acquire(source, store, fallback).await;
        let notice = (acquired.tier == PositionTier::Fallback)
            .then(|| format!("Location unavailable, showing {}", acquired.label));
        let location = Location::from_device(acquired.coords, acquired.label);

        self.core.reset_with(|st| {
            st.location = Some(location);
            st.notice = notice;
        });
        self.core.load(Dispatch::Reset).await;
    }

    /// Reset/home action: re-acquire the device location, dropping any
    /// manual location, and reload
    pub async fn reset_home(
        &self,
        source: &impl PositionSource,
        store: &LastKnownStore,
        fallback: &FallbackAnchor,
    ) {
        self.start(source, store, fallback).await;
    }

    /// Adopt a manually searched place and reload
    pub async fn select_place(&self, coords: Coordinates, label: impl Into<String>) {
        let location = Location::from_search(coords, label);
        self.core.cancel_repoll();
        self.core.reset_with(|st| st.location = Some(location));
        self.core.load(Dispatch::Reset).await;
    }

    /// Change the category filter and reload; no-op if unchanged
    pub async fn set_category(&self, category: Category) {
        if self.core.state().category == category {
            return;
        }
        self.core.cancel_repoll();
        self.core.reset_with(|st| st.category = category);
        self.core.load(Dispatch::Reset).await;
    }

    /// Pull-to-refresh; dropped if a refresh or full load is in flight
    pub async fn refresh(&self) {
        self.core.load(Dispatch::Refresh).await;
    }

    /// Load the next page; dropped if already loading or exhausted
    pub async fn load_more(&self) {
        self.core.load(Dispatch::More).await;
    }

    /// Current consumer-facing view of the feed
    pub fn snapshot(&self) -> FeedSnapshot {
        let st = self.core.state();
        FeedSnapshot {
            items: st.items.clone(),
            phase: st.phase,
            loading: st.loading,
            refreshing: st.refreshing,
            loading_more: st.loading_more,
            has_more: st.has_more,
            page: st.page,
            category: st.category,
            location: st.location.clone(),
            notice: st.notice.clone(),
        }
    }

    /// Take the pending one-time notice, clearing it
    pub fn take_notice(&self) -> Option<String> {
        self.core.state().notice.take()
    }
}

impl<C: CatalogBackend + 'static> Drop for FeedController<C> {
    fn drop(&mut self) {
        self.core.cancel_repoll();
    }
}

impl<C: CatalogBackend + 'static> FeedCore<C> {
    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().expect("feed state lock poisoned")
    }

    /// Reset page state for a new anchor: bump the generation (which
    /// invalidates every in-flight dispatch), clear the list, release
    /// the guards, then apply the trigger-specific mutation.
    fn reset_with(&self, mutate: impl FnOnce(&mut FeedState)) {
        let mut st = self.state();
        st.generation += 1;
        st.items.clear();
        st.page = 1;
        st.has_more = true;
        st.loading = false;
        st.refreshing = false;
        st.loading_more = false;
        st.repoll_attempts = 0;
        st.notice = None;
        mutate(&mut st);
    }

    async fn load(self: &Arc<Self>, dispatch: Dispatch) {
        let (location, category, generation, target_page) = {
            let mut st = self.state();
            let Some(location) = st.location.clone() else {
                return;
            };
            let target_page = match dispatch {
                Dispatch::Reset => {
                    st.loading = true;
                    st.items.clear();
                    st.has_more = true;
                    st.phase = FeedPhase::Fetching;
                    1
                }
                Dispatch::Refresh => {
                    if st.refreshing || st.loading {
                        return;
                    }
                    st.refreshing = true;
                    1
                }
                Dispatch::More => {
                    if st.loading_more || st.loading || !st.has_more {
                        return;
                    }
                    st.loading_more = true;
                    st.page + 1
                }
                Dispatch::Silent => 1,
            };
            (location, st.category, st.generation, target_page)
        };

        // Cache consult: only a plain page-1 load may be served from it
        if dispatch == Dispatch::Reset {
            if let Some(places) = self.cache.try_serve(location.coords, category) {
                let mut st = self.state();
                if st.generation == generation {
                    st.items = places;
                    st.page = 1;
                    st.has_more = true;
                    st.loading = false;
                    st.phase = FeedPhase::Ready;
                }
                return;
            }
        }

        let query = PageQuery {
            page: target_page,
            limit: self.settings.page_size,
            category,
            anchor: location.anchor(),
        };
        let result = self.catalog.fetch_page(&query).await;

        let mut st = self.state();
        if st.generation != generation {
            debug!(generation, "dropping stale catalog response");
            return;
        }

        match result {
            Ok(places) => {
                let count = places.len() as u32;
                match dispatch {
                    Dispatch::Reset | Dispatch::Refresh => {
                        st.items = places;
                        st.page = 1;
                        st.has_more = count == self.settings.page_size;
                        st.loading = false;
                        st.refreshing = false;
                        st.notice = None;
                        st.repoll_attempts = 0;
                        self.cache
                            .store(location.coords, location.label.clone(), category, &st.items);
                        self.settle_page_one(st, generation);
                    }
                    Dispatch::More => {
                        for place in places {
                            if !st.items.iter().any(|p| p.id == place.id) {
                                st.items.push(place);
                            }
                        }
                        st.page = target_page;
                        st.has_more = count == self.settings.page_size;
                        st.loading_more = false;
                        if st.phase != FeedPhase::PollingEnrichment {
                            st.phase = FeedPhase::Ready;
                        }
                    }
                    Dispatch::Silent => {
                        // In-place merge per id: keeps list order (and the
                        // user's scroll position) while photos populate
                        let mut updated = 0;
                        for fresh in places {
                            if let Some(existing) =
                                st.items.iter_mut().find(|p| p.id == fresh.id)
                            {
                                *existing = fresh;
                                updated += 1;
                            }
                        }
                        debug!(updated, "applied silent enrichment pass");
                        self.settle_page_one(st, generation);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, page = target_page, "catalog fetch failed");
                st.loading = false;
                st.refreshing = false;
                st.loading_more = false;
                if matches!(dispatch, Dispatch::Reset | Dispatch::Refresh) {
                    st.notice = Some("Could not load places".to_string());
                }
                // Degraded but usable: existing items stay untouched
                st.phase = FeedPhase::Ready;
            }
        }
    }

    /// After a page-1 result has been applied: decide whether another
    /// silent enrichment pass is warranted and settle the phase.
    fn settle_page_one(self: &Arc<Self>, mut st: MutexGuard<'_, FeedState>, generation: u64) {
        let pending = st.items.iter().any(|p| p.needs_enrichment());
        if pending && st.repoll_attempts < self.settings.repoll_max_attempts {
            st.phase = FeedPhase::PollingEnrichment;
            drop(st);
            self.schedule_repoll(generation);
        } else {
            st.phase = FeedPhase::Ready;
            drop(st);
            // Nothing left to poll for; a stale timer must not fire
            self.cancel_repoll();
        }
    }

    /// Schedule one silent re-fetch of page 1 after the configured
    /// delay, replacing (and aborting) any previously scheduled one.
    fn schedule_repoll(self: &Arc<Self>, generation: u64) {
        {
            let mut st = self.state();
            if st.generation != generation
                || st.repoll_attempts >= self.settings.repoll_max_attempts
            {
                return;
            }
            st.repoll_attempts += 1;
            debug!(attempt = st.repoll_attempts, "scheduling silent enrichment re-poll");
        }

        let core = Arc::clone(self);
        let delay = self.settings.repoll_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if core.state().generation != generation {
                return;
            }
            core.load(Dispatch::Silent).await;
        });

        let mut pending = self.repoll.lock().expect("repoll lock poisoned");
        if let Some(old) = pending.replace(handle) {
            old.abort();
        }
    }

    fn cancel_repoll(&self) {
        let mut pending = self.repoll.lock().expect("repoll lock poisoned");
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Anchor, Place};
    use crate::error::{Error, Result};
    use crate::location::StaticPosition;
    use std::collections::VecDeque;
    use std::time::Duration;

    const VIENNA: Coordinates = Coordinates {
        lat: 48.2082,
        lng: 16.3738,
    };
    const SALZBURG: Coordinates = Coordinates {
        lat: 47.8095,
        lng: 13.0550,
    };

    fn place(id: &str) -> Place {
        Place {
            id: id.to_string(),
            name: format!("Place {}", id),
            country: Some("Austria".to_string()),
            category: Category::Castles,
            latitude: None,
            longitude: None,
            images: vec![format!("https://img.example/{}.jpg", id)],
            description: Some("A fine castle overlooking the valley.".to_string()),
        }
    }

    fn bare_place(id: &str) -> Place {
        Place {
            images: Vec::new(),
            description: None,
            ..place(id)
        }
    }

    struct Scripted {
        response: Result<Vec<Place>>,
        delay: Duration,
    }

    #[derive(Default)]
    struct MockCatalog {
        calls: Mutex<Vec<PageQuery>>,
        script: Mutex<VecDeque<Scripted>>,
    }

    impl MockCatalog {
        fn push_ok(&self, places: Vec<Place>) {
            self.push_ok_delayed(places, Duration::ZERO);
        }

        fn push_ok_delayed(&self, places: Vec<Place>, delay: Duration) {
            self.script.lock().unwrap().push_back(Scripted {
                response: Ok(places),
                delay,
            });
        }

        fn push_err(&self) {
            self.script.lock().unwrap().push_back(Scripted {
                response: Err(Error::Catalog("boom".to_string())),
                delay: Duration::ZERO,
            });
        }

        fn calls(&self) -> Vec<PageQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CatalogBackend for MockCatalog {
        async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Place>> {
            self.calls.lock().unwrap().push(query.clone());
            let scripted = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted catalog call");
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            scripted.response
        }
    }

    fn settings(page_size: u32) -> FeedSettings {
        FeedSettings {
            page_size,
            repoll_delay: Duration::from_secs(4),
            repoll_max_attempts: 3,
        }
    }

    fn controller(
        catalog: &Arc<MockCatalog>,
        page_size: u32,
    ) -> FeedController<MockCatalog> {
        FeedController::new(
            Arc::clone(catalog),
            Arc::new(QueryCache::new(1.0)),
            settings(page_size),
        )
    }

    fn fallback() -> FallbackAnchor {
        FallbackAnchor {
            coords: VIENNA,
            label: "Vienna".to_string(),
        }
    }

    async fn start_at(feed: &FeedController<MockCatalog>, coords: Coordinates) {
        feed.start(
            &StaticPosition::new(coords),
            &LastKnownStore::disabled(),
            &fallback(),
        )
        .await;
    }

    /// Wait until the controller settles into Ready (paused-time tests)
    async fn settle(feed: &FeedController<MockCatalog>) {
        for _ in 0..200 {
            if feed.snapshot().phase == FeedPhase::Ready {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("feed never settled: {:?}", feed.snapshot().phase);
    }

    #[tokio::test]
    async fn test_initial_load_queries_by_coords() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("1")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;

        let calls = catalog.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].page, 1);
        assert_eq!(calls[0].limit, 20);
        assert_eq!(calls[0].anchor, Anchor::Coords(VIENNA));
        assert_eq!(calls[0].category, Category::All);

        let snap = feed.snapshot();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].id, "1");
        assert!(!snap.loading);
        assert!(!snap.has_more); // short page
        assert_eq!(snap.phase, FeedPhase::Ready);
    }

    #[tokio::test]
    async fn test_nearby_relocation_hits_cache() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("1")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        // ~100m away, same category: must not touch the network
        start_at(&feed, Coordinates::new(48.2090, 16.3740)).await;

        assert_eq!(catalog.calls().len(), 1);
        let snap = feed.snapshot();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].id, "1");
        assert!(snap.has_more); // cache hits reopen pagination
    }

    #[tokio::test]
    async fn test_category_change_misses_cache() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("1")]);
        catalog.push_ok(vec![place("9")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        feed.set_category(Category::Castles).await;

        let calls = catalog.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].category, Category::Castles);
        assert_eq!(feed.snapshot().items[0].id, "9");
    }

    #[tokio::test]
    async fn test_same_category_is_noop() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("1")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        feed.set_category(Category::All).await;

        assert_eq!(catalog.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_manual_search_dispatches_text_anchor() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("1")]);
        catalog.push_ok(vec![place("2")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        feed.select_place(SALZBURG, "Salzburg").await;

        let calls = catalog.calls();
        assert_eq!(calls[1].anchor, Anchor::Text("Salzburg".to_string()));
        let snap = feed.snapshot();
        assert_eq!(snap.location.as_ref().unwrap().label, "Salzburg");
        assert!(snap.location.as_ref().unwrap().manual);
    }

    #[tokio::test]
    async fn test_reset_home_drops_manual_location() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("1")]);
        catalog.push_ok(vec![place("2")]);
        catalog.push_ok(vec![place("3")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        feed.select_place(SALZBURG, "Salzburg").await;
        feed.reset_home(
            &StaticPosition::new(SALZBURG),
            &LastKnownStore::disabled(),
            &fallback(),
        )
        .await;

        let snap = feed.snapshot();
        assert!(!snap.location.as_ref().unwrap().manual);
        // Back on the coordinate path
        let calls = catalog.calls();
        assert_eq!(calls[2].anchor, Anchor::Coords(SALZBURG));
    }

    #[tokio::test]
    async fn test_pagination_dedups_and_tracks_has_more() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("a"), place("b")]);
        catalog.push_ok(vec![place("b"), place("c")]); // overlapping page
        catalog.push_ok(vec![]); // end of data
        let feed = controller(&catalog, 2);

        start_at(&feed, VIENNA).await;
        assert!(feed.snapshot().has_more);

        feed.load_more().await;
        let snap = feed.snapshot();
        let ids: Vec<_> = snap.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(snap.page, 2);
        assert!(snap.has_more);

        feed.load_more().await;
        let snap = feed.snapshot();
        assert_eq!(snap.items.len(), 3);
        assert!(!snap.has_more);

        // Exhausted: further pagination is dropped without a call
        feed.load_more().await;
        assert_eq!(catalog.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_replaces_items_wholesale() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("a")]);
        catalog.push_ok(vec![place("b")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        feed.refresh().await;

        let snap = feed.snapshot();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].id, "b");
        assert!(!snap.refreshing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_refresh_is_dropped() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("a")]);
        catalog.push_ok_delayed(vec![place("b")], Duration::from_secs(1));
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        tokio::join!(feed.refresh(), feed.refresh());

        // Only one of the two refreshes reached the catalog
        assert_eq!(catalog.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_same_anchor_is_idempotent() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("a"), place("b")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        let first: Vec<_> = feed.snapshot().items;
        start_at(&feed, VIENNA).await;
        let second: Vec<_> = feed.snapshot().items;

        assert_eq!(first, second);
        assert_eq!(catalog.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_items_and_clears_flags() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("a")]);
        catalog.push_err();
        catalog.push_ok(vec![place("b")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        feed.refresh().await;

        let snap = feed.snapshot();
        assert_eq!(snap.items[0].id, "a"); // previous state intact
        assert!(!snap.refreshing);
        assert!(snap.notice.is_some());

        // The guard is not wedged: the next refresh goes through
        feed.refresh().await;
        assert_eq!(feed.snapshot().items[0].id, "b");
    }

    #[tokio::test]
    async fn test_initial_fetch_error_degrades_to_empty_ready() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_err();
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;

        let snap = feed.snapshot();
        assert!(snap.items.is_empty());
        assert!(!snap.loading);
        assert_eq!(snap.phase, FeedPhase::Ready);
        assert!(snap.notice.is_some());
        assert!(feed.take_notice().is_some());
        assert!(feed.snapshot().notice.is_none());
    }

    #[tokio::test]
    async fn test_no_location_is_noop() {
        let catalog = Arc::new(MockCatalog::default());
        let feed = controller(&catalog, 20);

        feed.refresh().await;
        feed.load_more().await;

        assert!(catalog.calls().is_empty());
        assert_eq!(feed.snapshot().phase, FeedPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrichment_repoll_merges_in_place() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![bare_place("1"), place("2")]);
        let mut enriched = place("1");
        enriched.images = vec!["https://img.example/1-real.jpg".to_string()];
        catalog.push_ok(vec![enriched.clone(), place("2")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        assert_eq!(feed.snapshot().phase, FeedPhase::PollingEnrichment);

        settle(&feed).await;

        let snap = feed.snapshot();
        // Same index, same order, new payload
        assert_eq!(snap.items[0].id, "1");
        assert_eq!(snap.items[0].images, enriched.images);
        assert_eq!(snap.items[1].id, "2");

        let calls = catalog.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrichment_attempts_are_bounded() {
        let catalog = Arc::new(MockCatalog::default());
        // Initial load plus three silent passes, never enriched
        for _ in 0..4 {
            catalog.push_ok(vec![bare_place("1")]);
        }
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        settle(&feed).await;

        assert_eq!(catalog.calls().len(), 4);

        // Long idle: polling has genuinely given up
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(catalog.calls().len(), 4);
        assert_eq!(feed.snapshot().phase, FeedPhase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_repoll_when_complete() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("1")]);
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        assert_eq!(feed.snapshot().phase, FeedPhase::Ready);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(catalog.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_repoll_does_not_move_cache_anchor() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![bare_place("1")]);
        catalog.push_ok(vec![bare_place("1")]); // silent pass, still bare
        catalog.push_ok(vec![bare_place("1")]);
        catalog.push_ok(vec![bare_place("1")]);
        let cache = Arc::new(QueryCache::new(1.0));
        let feed = FeedController::new(Arc::clone(&catalog), Arc::clone(&cache), settings(20));

        start_at(&feed, VIENNA).await;
        settle(&feed).await;

        // The slot still serves from the original non-silent anchor
        assert!(cache.try_serve(VIENNA, Category::All).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_location_change_cancels_pending_repoll() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![bare_place("1")]);
        catalog.push_ok(vec![place("2")]); // for the manual search
        let feed = controller(&catalog, 20);

        start_at(&feed, VIENNA).await;
        assert_eq!(feed.snapshot().phase, FeedPhase::PollingEnrichment);

        feed.select_place(SALZBURG, "Salzburg").await;
        settle(&feed).await;

        // Only the two non-silent fetches; the pending re-poll for the
        // old anchor never fired
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(catalog.calls().len(), 2);
        assert_eq!(feed.snapshot().items[0].id, "2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_cannot_clobber_newer_one() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok_delayed(vec![place("old")], Duration::from_secs(10));
        catalog.push_ok_delayed(vec![place("new")], Duration::from_secs(1));
        let feed = controller(&catalog, 20);

        tokio::join!(start_at(&feed, VIENNA), feed.set_category(Category::Ruins));

        let snap = feed.snapshot();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].id, "new");
        assert_eq!(snap.category, Category::Ruins);
        assert!(!snap.loading);
    }

    #[tokio::test]
    async fn test_items_never_contain_duplicate_ids() {
        let catalog = Arc::new(MockCatalog::default());
        catalog.push_ok(vec![place("a"), place("b")]);
        catalog.push_ok(vec![place("a"), place("b")]); // server echoes page 1
        catalog.push_ok(vec![place("b"), place("c")]);
        let feed = controller(&catalog, 2);

        start_at(&feed, VIENNA).await;
        feed.load_more().await;
        feed.load_more().await;

        let snap = feed.snapshot();
        let mut ids: Vec<_> = snap.items.iter().map(|p| p.id.clone()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(before, ids.len());
    }
}
