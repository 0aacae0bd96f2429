use super::{Cluster, ClusterParams};
use crate::radar::RadarRecord;

/**
 * Keep a cluster list together with the settings it was derived with.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterList {
    /// The settings used to find the clusters.
    pub params: ClusterParams,
    /// The number of radars that were considered.
    pub candidates: usize,
    /// Largest cluster first.
    pub clusters: Vec<Cluster>,
}

impl ClusterList {
    /**
     * Cluster a list of radars and return a ClusterList including the metadata.
     *
     * #Arguments
     * radars - the radars to consider, usually the visible ones.
     * params - clustering settings.
     */
    pub fn from_radars(radars: &[RadarRecord], params: ClusterParams) -> Self {
        let clusters = Cluster::from_radars(radars, &params);

        ClusterList {
            params,
            candidates: radars.len(),
            clusters,
        }
    }

    /// Radius of the circle to draw around each cluster center, in meters.
    pub fn display_radius_m(&self) -> f64 {
        self.params.display_radius_m()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }
}
