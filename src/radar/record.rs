use crate::geo::{Coord, Geo};
use std::fmt::{self, Display};

/// Value used for the radar type when the source has none.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Value used for the speed limit when the source has none.
pub const UNKNOWN_SPEED_LIMIT: &str = "N/A";

/**
 * A single traffic radar.
 *
 * The coordinates are always finite, rows without usable coordinates never become records.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct RadarRecord {
    /// Identifier from the source, or "radar-<row>" when the source left it blank.
    pub id: String,
    /// Kind of radar, e.g. "Radar fixe".
    pub radar_type: String,
    /// Posted speed limit. Kept as text since the source sometimes has placeholders here.
    pub speed_limit: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl RadarRecord {
    pub fn position(&self) -> Coord {
        Coord::new(self.lat, self.lon)
    }
}

impl Geo for RadarRecord {
    fn coord(&self) -> Coord {
        self.position()
    }
}

impl Display for RadarRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "{:<16} {:<32} {:>6} {:>11.6} {:>11.6}",
            self.id, self.radar_type, self.speed_limit, self.lat, self.lon
        )
    }
}
