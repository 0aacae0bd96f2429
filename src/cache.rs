/*!
 * Time limited memoization of the parsed radar list and of cluster results.
 *
 * There is no eviction call. Each read checks the age of the entry against the time to live, and a
 * stale entry is simply replaced the next time a value is stored.
 */

use crate::{
    cluster::{ClusterList, ClusterParams},
    filter::RadarFilter,
    geo::Viewport,
    radar::RadarRecord,
};
use chrono::{DateTime, Duration, Utc};
use rustc_hash::{FxHashMap, FxHasher};
use std::{
    cell::Cell,
    hash::{Hash, Hasher},
    rc::Rc,
    sync::Arc,
};

/// Source of the current time, so tests can control cache expiry.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<DateTime<Utc>>>);

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock(Rc::new(Cell::new(start)))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.0.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

/// How long cached values stay fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub fetch_ttl: Duration,
    pub cluster_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            fetch_ttl: Duration::minutes(5),
            cluster_ttl: Duration::seconds(60),
        }
    }
}

/// A value and the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub timestamp: DateTime<Utc>,
    pub value: T,
}

impl<T> CacheEntry<T> {
    pub fn new(timestamp: DateTime<Utc>, value: T) -> Self {
        CacheEntry { timestamp, value }
    }

    /// An entry is fresh while it is strictly younger than `ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp < ttl
    }
}

/// Single slot cache for the most recently parsed radar list.
#[derive(Debug, Default)]
pub struct FetchCache {
    slot: Option<CacheEntry<Arc<[RadarRecord]>>>,
}

impl FetchCache {
    /// The cached radars, if they are still fresh.
    pub fn get(&self, now: DateTime<Utc>, ttl: Duration) -> Option<Arc<[RadarRecord]>> {
        self.slot
            .as_ref()
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Replace whatever is cached.
    pub fn store(&mut self, now: DateTime<Utc>, radars: Arc<[RadarRecord]>) {
        self.slot = Some(CacheEntry::new(now, radars));
    }

    /// The last stored value regardless of age.
    pub fn last(&self) -> Option<&CacheEntry<Arc<[RadarRecord]>>> {
        self.slot.as_ref()
    }
}

/**
 * Everything a cluster result depends on.
 *
 * Floating point values are compared by their bit patterns. Besides the viewport, filters, and
 * the number of visible radars, the key carries a fingerprint of the visible radars themselves, so
 * two different sets of the same size never share a result.
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterKey {
    viewport: Option<[u64; 4]>,
    type_query: Option<String>,
    max_distance_km: Option<u64>,
    reference: Option<[u64; 2]>,
    params: (u64, usize, usize),
    visible_count: usize,
    visible_fingerprint: u64,
}

impl ClusterKey {
    pub fn new(
        viewport: Option<&Viewport>,
        filter: &RadarFilter,
        params: &ClusterParams,
        visible: &[RadarRecord],
    ) -> Self {
        let mut hasher = FxHasher::default();
        for radar in visible {
            radar.id.hash(&mut hasher);
            radar.lat.to_bits().hash(&mut hasher);
            radar.lon.to_bits().hash(&mut hasher);
        }

        ClusterKey {
            viewport: viewport.map(|vp| {
                [
                    vp.center.lat.to_bits(),
                    vp.center.lon.to_bits(),
                    vp.lat_span.to_bits(),
                    vp.lon_span.to_bits(),
                ]
            }),
            type_query: filter.type_query.clone(),
            max_distance_km: filter.max_distance_km.map(f64::to_bits),
            reference: filter
                .reference
                .map(|c| [c.lat.to_bits(), c.lon.to_bits()]),
            params: (params.radius_km.to_bits(), params.min_count, params.max_clusters),
            visible_count: visible.len(),
            visible_fingerprint: hasher.finish(),
        }
    }
}

/// Cluster results keyed by [ClusterKey].
#[derive(Debug, Default)]
pub struct ClusterCache {
    entries: FxHashMap<ClusterKey, CacheEntry<Arc<ClusterList>>>,
}

impl ClusterCache {
    pub fn get(
        &self,
        key: &ClusterKey,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Arc<ClusterList>> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Store a result, dropping any entries that have already gone stale.
    pub fn store(
        &mut self,
        key: ClusterKey,
        now: DateTime<Utc>,
        ttl: Duration,
        clusters: Arc<ClusterList>,
    ) {
        self.entries.retain(|_, entry| entry.is_fresh(now, ttl));
        self.entries.insert(key, CacheEntry::new(now, clusters));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn radar(id: &str, lat: f64, lon: f64) -> RadarRecord {
        RadarRecord {
            id: id.to_owned(),
            radar_type: "Radar fixe".to_owned(),
            speed_limit: "50".to_owned(),
            lat,
            lon,
        }
    }

    #[test]
    fn test_entry_freshness() {
        let entry = CacheEntry::new(start(), ());
        let ttl = Duration::minutes(5);

        assert!(entry.is_fresh(start(), ttl));
        assert!(entry.is_fresh(start() + ttl - Duration::milliseconds(1), ttl));
        assert!(!entry.is_fresh(start() + ttl, ttl));
        assert!(!entry.is_fresh(start() + ttl + Duration::milliseconds(1), ttl));
    }

    #[test]
    fn test_fetch_cache_keeps_last() {
        let mut cache = FetchCache::default();
        let ttl = Duration::minutes(5);
        assert!(cache.get(start(), ttl).is_none());

        let radars: Arc<[RadarRecord]> = vec![radar("R1", 48.85, 2.35)].into();
        cache.store(start(), radars);

        assert_eq!(cache.get(start() + Duration::minutes(4), ttl).unwrap().len(), 1);
        assert!(cache.get(start() + Duration::minutes(6), ttl).is_none());
        assert_eq!(cache.last().unwrap().timestamp, start());
    }

    #[test]
    fn test_cluster_key_sees_content() {
        let filter = RadarFilter::default();
        let params = ClusterParams::default();

        let a = vec![radar("R1", 48.85, 2.35)];
        let b = vec![radar("R2", 45.76, 4.83)];

        let key_a = ClusterKey::new(None, &filter, &params, &a);
        let key_b = ClusterKey::new(None, &filter, &params, &b);
        assert_ne!(key_a, key_b);
        assert_eq!(key_a, ClusterKey::new(None, &filter, &params, &a));

        let vp = Viewport::france();
        assert_ne!(key_a, ClusterKey::new(Some(&vp), &filter, &params, &a));
    }

    #[test]
    fn test_cluster_cache_expiry() {
        let mut cache = ClusterCache::default();
        let ttl = Duration::seconds(60);
        let radars = vec![radar("R1", 48.85, 2.35)];
        let key = ClusterKey::new(None, &RadarFilter::default(), &ClusterParams::default(), &radars);
        let list = Arc::new(ClusterList::from_radars(&radars, ClusterParams::default()));

        cache.store(key.clone(), start(), ttl, list);
        assert!(cache.get(&key, start() + Duration::seconds(59), ttl).is_some());
        assert!(cache.get(&key, start() + Duration::seconds(60), ttl).is_none());

        let other = ClusterKey::new(None, &RadarFilter::default(), &ClusterParams::default(), &[]);
        let empty = Arc::new(ClusterList::from_radars(&[], ClusterParams::default()));
        cache.store(other, start() + Duration::seconds(61), ttl, empty);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(start());
        let handle = clock.clone();
        handle.advance(Duration::seconds(30));
        assert_eq!(clock.now(), start() + Duration::seconds(30));
    }
}
