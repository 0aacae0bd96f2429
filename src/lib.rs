pub use cache::{CacheConfig, CacheEntry, Clock, ManualClock, SystemClock};
pub use cluster::{Cluster, ClusterList, ClusterParams};
pub use engine::{RadarEngine, RadarQuery, RadarView};
pub use error::{ErrorKind, RadarMapError, RadarMapResult};
pub use filter::RadarFilter;
pub use geo::{
    great_circle_distance, BoundingBox, Coord, Geo, Viewport, EARTH_RADIUS_KM,
    MARKER_ZOOM_THRESHOLD,
};
pub use radar::{parse_radars, Columns, RadarRecord, UNKNOWN_SPEED_LIMIT, UNKNOWN_TYPE};
pub use ranking::{RadarRanking, Rankings};
pub use source::{
    open_source, FileSource, HttpSource, MemorySource, RadarSource, DEFAULT_RADARS_URL,
};

/**************************************************************************************************
 * Private Implementation
 *************************************************************************************************/
mod cache;
mod cluster;
mod engine;
mod error;
mod filter;
mod geo;
mod radar;
mod ranking;
mod source;
