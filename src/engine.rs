/*!
 * The whole pipeline: fetch, parse, filter, restrict to the viewport, and cluster.
 *
 * An engine owns its source, its clock, and both caches. Every operation that may touch a cache
 * takes `&mut self`, so an engine shared between threads has to sit behind a lock, which also
 * keeps two callers from fetching or clustering the same thing at once.
 */

use crate::{
    cache::{CacheConfig, Clock, ClusterCache, ClusterKey, FetchCache, SystemClock},
    cluster::{ClusterList, ClusterParams},
    error::RadarMapError,
    filter::RadarFilter,
    geo::Viewport,
    radar::{parse_radars, RadarRecord},
    source::RadarSource,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Everything the user has chosen that affects what is shown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadarQuery {
    pub filter: RadarFilter,
    /// The region on screen, `None` until the map has reported one.
    pub viewport: Option<Viewport>,
    pub params: ClusterParams,
}

/// The result of a query, ready for display.
#[derive(Clone, Debug)]
pub struct RadarView {
    /// Radars passing the filters, used for markers.
    pub filtered: Vec<RadarRecord>,
    /// The filtered radars inside the viewport.
    pub visible: Vec<RadarRecord>,
    /// Clusters among the visible radars.
    pub clusters: Arc<ClusterList>,
    /// False when the map is zoomed out too far for individual markers.
    pub show_markers: bool,
    /// Set when the radar list could not be loaded; all the lists above are then empty.
    pub load_error: Option<RadarMapError>,
}

#[derive(Debug)]
pub struct RadarEngine<S, C = SystemClock> {
    source: S,
    clock: C,
    config: CacheConfig,
    fetch_cache: FetchCache,
    cluster_cache: ClusterCache,
}

impl<S: RadarSource> RadarEngine<S, SystemClock> {
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock, CacheConfig::default())
    }
}

impl<S: RadarSource, C: Clock> RadarEngine<S, C> {
    pub fn with_clock(source: S, clock: C, config: CacheConfig) -> Self {
        RadarEngine {
            source,
            clock,
            config,
            fetch_cache: FetchCache::default(),
            cluster_cache: ClusterCache::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /**
     * Get the full radar list, fetching and parsing only if the cached copy is too old.
     *
     * On a transport or schema error the cache is left alone, so an older copy stays available
     * through [RadarEngine::last_known].
     */
    pub fn radars(&mut self) -> Result<Arc<[RadarRecord]>, RadarMapError> {
        let now = self.clock.now();

        if let Some(radars) = self.fetch_cache.get(now, self.config.fetch_ttl) {
            log::debug!("Using {} cached radars.", radars.len());
            return Ok(radars);
        }

        log::info!("Loading radars from {}", self.source.name());
        let text = self.source.fetch()?;
        let radars: Arc<[RadarRecord]> = parse_radars(&text)?.into();

        self.fetch_cache.store(now, Arc::clone(&radars));
        Ok(radars)
    }

    /// Like [RadarEngine::radars], but log any error and return an empty list instead.
    pub fn radars_or_empty(&mut self) -> Arc<[RadarRecord]> {
        match self.radars() {
            Ok(radars) => radars,
            Err(err) => {
                log::error!("Error loading radars: {}", err);
                Arc::from(Vec::new())
            }
        }
    }

    /// The most recently loaded radar list and when it was loaded, however old it is.
    pub fn last_known(&self) -> Option<(DateTime<Utc>, Arc<[RadarRecord]>)> {
        self.fetch_cache
            .last()
            .map(|entry| (entry.timestamp, Arc::clone(&entry.value)))
    }

    /// Cluster the visible radars for a query, reusing a recent result for the same inputs.
    pub fn clusters(&mut self, visible: &[RadarRecord], query: &RadarQuery) -> Arc<ClusterList> {
        let now = self.clock.now();
        let ttl = self.config.cluster_ttl;
        let key = ClusterKey::new(query.viewport.as_ref(), &query.filter, &query.params, visible);

        if let Some(clusters) = self.cluster_cache.get(&key, now, ttl) {
            log::debug!("Cluster cache hit.");
            return clusters;
        }

        let clusters = Arc::new(ClusterList::from_radars(visible, query.params));
        self.cluster_cache.store(key, now, ttl, Arc::clone(&clusters));
        clusters
    }

    /// Run the full pipeline for a query.
    pub fn query(&mut self, query: &RadarQuery) -> RadarView {
        let show_markers = query.viewport.map_or(true, |vp| vp.shows_markers());

        let radars = match self.radars() {
            Ok(radars) => radars,
            Err(err) => {
                log::error!("Error loading radars: {}", err);
                return RadarView {
                    filtered: vec![],
                    visible: vec![],
                    clusters: Arc::new(ClusterList::from_radars(&[], query.params)),
                    show_markers,
                    load_error: Some(err),
                };
            }
        };

        let filtered = query.filter.apply(&radars);
        let visible = Viewport::restrict(query.viewport.as_ref(), &filtered);
        let clusters = self.clusters(&visible, query);

        log::debug!(
            "{} radars, {} after filtering, {} visible, {} clusters.",
            radars.len(),
            filtered.len(),
            visible.len(),
            clusters.len()
        );

        RadarView {
            filtered,
            visible,
            clusters,
            show_markers,
            load_error: None,
        }
    }
}
