/*!
 * Types and functions for working with clusters.
 *
 * A cluster describes a dense group of radars, summarized by the centroid of its members and how
 * many there are.
 */

pub use cluster::Cluster;
pub use cluster_list::ClusterList;
pub use params::ClusterParams;

mod cluster;
mod cluster_list;
mod params;
