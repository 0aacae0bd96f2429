/// Tuning knobs for [Cluster::from_radars](crate::Cluster::from_radars).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterParams {
    /// Radars within this distance (km) of an anchor radar belong to its neighborhood.
    pub radius_km: f64,
    /// Smallest neighborhood that counts as a cluster. Values below 1 are treated as 1.
    pub min_count: usize,
    /// Only this many of the largest clusters are kept.
    pub max_clusters: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        ClusterParams {
            radius_km: 10.0,
            min_count: 6,
            max_clusters: 3,
        }
    }
}

impl ClusterParams {
    /// Radius of the circle drawn around a cluster, in meters.
    pub fn display_radius_m(&self) -> f64 {
        self.radius_km * 1000.0
    }
}
