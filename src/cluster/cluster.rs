use super::ClusterParams;
use crate::{
    geo::{great_circle_distance, Coord},
    radar::RadarRecord,
};
use rustc_hash::FxHashSet;
use std::{
    cmp::Reverse,
    fmt::{self, Display},
};

/**
 * The aggregate properties of a dense group of radars.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// Average position of the radars in the cluster.
    pub center: Coord,
    /// The number of radars in this cluster.
    pub count: usize,
    /// The ids of the radars in this cluster, in input order.
    pub member_ids: Vec<String>,
    /// The distance (km) from the cluster center to the farthest radar in the cluster.
    pub radius: f64,
}

impl Cluster {
    /**
     * Group radars into at most `params.max_clusters` dense clusters.
     *
     * This is a greedy, first come first served scan. Each radar not yet claimed by a cluster is
     * used as an anchor, and every unclaimed radar within `params.radius_km` of it (the anchor
     * included) forms its neighborhood. Neighborhoods with at least `params.min_count` radars
     * become clusters and all their members are claimed, so no radar is in two clusters. Anchors
     * with too small a neighborhood stay unclaimed and may still be picked up by a later anchor.
     *
     * Because radars are claimed in input order, shuffling the input can change the result. The
     * clusters are returned largest first, with ties left in the order they were found.
     *
     * #Arguments
     * radars - the candidate radars, usually only those currently visible.
     * params - the clustering radius, minimum size, and number of clusters to keep.
     *
     * #Returns
     * A list of clusters, each with at least `params.min_count` members.
     */
    pub fn from_radars(radars: &[RadarRecord], params: &ClusterParams) -> Vec<Self> {
        let min_count = params.min_count.max(1);

        let mut claimed: FxHashSet<&str> = FxHashSet::default();
        let mut clusters: Vec<Self> = vec![];

        for anchor in radars {
            if claimed.contains(anchor.id.as_str()) {
                continue;
            }

            let center = anchor.position();
            let neighborhood: Vec<&RadarRecord> = radars
                .iter()
                .filter(|candidate| !claimed.contains(candidate.id.as_str()))
                .filter(|candidate| {
                    great_circle_distance(center, candidate.position()) <= params.radius_km
                })
                .collect();

            if neighborhood.len() < min_count {
                continue;
            }

            claimed.extend(neighborhood.iter().map(|radar| radar.id.as_str()));
            clusters.push(Self::from_members(&neighborhood));
        }

        log::debug!(
            "Found {} clusters among {} radars.",
            clusters.len(),
            radars.len()
        );

        clusters.sort_by_key(|clust| Reverse(clust.count));
        clusters.truncate(params.max_clusters);
        clusters
    }

    fn from_members(members: &[&RadarRecord]) -> Self {
        let mut curr_clust = Cluster {
            center: Coord::new(0.0, 0.0),
            count: 0,
            member_ids: Vec::with_capacity(members.len()),
            radius: 0.0,
        };

        for radar in members {
            curr_clust.center.lat += radar.lat;
            curr_clust.center.lon += radar.lon;
            curr_clust.count += 1;
            curr_clust.member_ids.push(radar.id.clone());
        }

        curr_clust.center.lat /= curr_clust.count as f64;
        curr_clust.center.lon /= curr_clust.count as f64;

        for radar in members {
            let gs_distance = great_circle_distance(radar.position(), curr_clust.center);
            curr_clust.radius = curr_clust.radius.max(gs_distance);
        }

        curr_clust
    }

    /// A key that identifies this cluster on the map, based on its center.
    pub fn display_key(&self) -> String {
        format!("cluster-{:.5}-{:.5}", self.center.lat, self.center.lon)
    }
}

impl Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "{:>11.6} {:>11.6} {:>6} radars {:>8.2} km",
            self.center.lat, self.center.lon, self.count, self.radius
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn radar(id: &str, lat: f64, lon: f64) -> RadarRecord {
        RadarRecord {
            id: id.to_owned(),
            radar_type: "Radar fixe".to_owned(),
            speed_limit: "50".to_owned(),
            lat,
            lon,
        }
    }

    /// `n` radars spread over a few hundred meters around a point.
    fn blob(prefix: &str, n: usize, lat: f64, lon: f64) -> Vec<RadarRecord> {
        (0..n)
            .map(|i| radar(&format!("{}{}", prefix, i), lat + 0.001 * i as f64, lon))
            .collect()
    }

    #[test]
    fn test_small_groups_are_not_clusters() {
        let radars = blob("a", 5, 48.85, 2.35);
        assert!(Cluster::from_radars(&radars, &ClusterParams::default()).is_empty());
    }

    #[test]
    fn test_centroid_and_members() {
        let radars = blob("a", 6, 48.85, 2.35);
        let clusters = Cluster::from_radars(&radars, &ClusterParams::default());

        assert_eq!(clusters.len(), 1);
        let clust = &clusters[0];
        assert_eq!(clust.count, 6);
        assert_eq!(clust.member_ids, ["a0", "a1", "a2", "a3", "a4", "a5"]);
        assert!((clust.center.lat - 48.8525).abs() < 1.0e-9);
        assert!((clust.center.lon - 2.35).abs() < 1.0e-12);
        assert!(clust.radius > 0.27 && clust.radius < 0.29);
        assert_eq!(clust.display_key(), "cluster-48.85250-2.35000");
    }

    #[test]
    fn test_sorted_and_truncated() {
        let mut radars = blob("a", 6, 48.85, 2.35);
        radars.extend(blob("b", 9, 45.76, 4.83));
        radars.extend(blob("c", 7, 43.30, 5.37));
        radars.extend(blob("d", 8, 50.63, 3.06));

        let params = ClusterParams::default();
        let clusters = Cluster::from_radars(&radars, &params);

        let counts: Vec<_> = clusters.iter().map(|c| c.count).collect();
        assert_eq!(counts, [9, 8, 7]);
        assert!(clusters.len() <= params.max_clusters);
    }

    #[test]
    fn test_members_are_disjoint() {
        // A line of radars 4 km apart, any anchor reaches its neighbors on both sides.
        let radars: Vec<_> = (0..20)
            .map(|i| radar(&format!("r{}", i), 45.0 + 0.036 * i as f64, 3.0))
            .collect();
        let params = ClusterParams {
            radius_km: 10.0,
            min_count: 3,
            max_clusters: 100,
        };
        let clusters = Cluster::from_radars(&radars, &params);
        assert!(!clusters.is_empty());

        let mut seen = FxHashSet::default();
        for clust in &clusters {
            assert!(clust.count >= params.min_count);
            assert_eq!(clust.count, clust.member_ids.len());
            for id in &clust.member_ids {
                assert!(seen.insert(id.clone()), "{} is in two clusters", id);
            }
        }
    }

    #[test]
    fn test_order_dependent() {
        // 'far' is 8 km north of the group and 'edge' sits between, so whoever anchors first
        // decides where 'edge' goes.
        let mut radars = blob("g", 5, 45.0, 3.0);
        radars.push(radar("edge", 45.04, 3.0));
        radars.push(radar("far", 45.12, 3.0));

        let params = ClusterParams {
            radius_km: 10.0,
            min_count: 2,
            max_clusters: 10,
        };

        let forward = Cluster::from_radars(&radars, &params);
        radars.reverse();
        let backward = Cluster::from_radars(&radars, &params);

        assert_ne!(forward, backward);
    }

    #[test]
    fn test_deterministic() {
        let mut radars = blob("a", 7, 48.85, 2.35);
        radars.extend(blob("b", 7, 48.90, 2.40));
        let params = ClusterParams::default();

        assert_eq!(
            Cluster::from_radars(&radars, &params),
            Cluster::from_radars(&radars, &params)
        );
    }
}
