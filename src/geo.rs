/*!
 * Geographic calculations.
 *
 * Everything here treats the Earth as a sphere. That is plenty accurate for deciding which radars
 * are near each other or near the user, which is all this crate needs.
 */

use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Mean radius of the Earth used by [great_circle_distance].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// The latitude span (degrees) above which the map is considered too zoomed out to draw markers.
pub const MARKER_ZOOM_THRESHOLD: f64 = 1.8;

/// A latitude / longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coord { lat, lon }
    }

    /// Distance to another point in kilometers.
    pub fn distance_to(self, other: Coord) -> f64 {
        great_circle_distance(self, other)
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

impl FromStr for Coord {
    type Err = String;

    /// Parse a "lat,lon" pair, checking the values are in range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<_> = s.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(format!("expected 'lat,lon', got '{}'", s));
        }

        let lat: f64 = parts[0].parse().map_err(|err| format!("{}: {}", parts[0], err))?;
        let lon: f64 = parts[1].parse().map_err(|err| format!("{}: {}", parts[1], err))?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(format!(
                "Lat/Lon are out of range (-90.0 to 90.0 and -180.0 to 180.0): lat={} lon={}",
                lat, lon
            ));
        }

        Ok(Coord { lat, lon })
    }
}

/**
 * The haversine great circle distance.
 *
 * #Arguments
 * * a - the first point, degrees.
 * * b - the second point, degrees.
 *
 * #Returns
 * The distance between the points in kilometers.
 */
pub fn great_circle_distance(a: Coord, b: Coord) -> f64 {
    const DEG2RAD: f64 = 2.0 * std::f64::consts::PI / 360.0;

    let lat1_r = a.lat * DEG2RAD;
    let lon1_r = a.lon * DEG2RAD;
    let lat2_r = b.lat * DEG2RAD;
    let lon2_r = b.lon * DEG2RAD;

    let dlat2 = (lat2_r - lat1_r) / 2.0;
    let dlon2 = (lon2_r - lon1_r) / 2.0;

    let sin2_dlat = f64::powf(f64::sin(dlat2), 2.0);
    let sin2_dlon = f64::powf(f64::sin(dlon2), 2.0);

    let arc = 2.0
        * f64::asin(f64::sqrt(
            sin2_dlat + sin2_dlon * f64::cos(lat1_r) * f64::cos(lat2_r),
        ));

    arc * EARTH_RADIUS_KM
}

/// Anything that sits at a single point on the map.
pub trait Geo {
    fn coord(&self) -> Coord;
}

impl Geo for Coord {
    fn coord(&self) -> Coord {
        *self
    }
}

/// An axis aligned box in latitude / longitude space. Edges are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Lower left (south west) corner.
    pub ll: Coord,
    /// Upper right (north east) corner.
    pub ur: Coord,
}

impl BoundingBox {
    pub fn contains(&self, coord: Coord) -> bool {
        coord.lat >= self.ll.lat
            && coord.lat <= self.ur.lat
            && coord.lon >= self.ll.lon
            && coord.lon <= self.ur.lon
    }
}

/**
 * The part of the map currently on screen, as a center and the full height / width in degrees.
 *
 * Containment is a plain box test in degrees, not a geodesic clip. A window whose longitude range
 * runs past the +/-180 degree seam wraps around to the other side.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: Coord,
    pub lat_span: f64,
    pub lon_span: f64,
}

impl Viewport {
    pub fn new(center: Coord, lat_span: f64, lon_span: f64) -> Self {
        Viewport {
            center,
            lat_span,
            lon_span,
        }
    }

    /// The window shown before the user's position is known, mainland France.
    pub fn france() -> Self {
        Self::new(Coord::new(46.603354, 1.888334), 10.0, 10.0)
    }

    /// A tightly zoomed window around a position.
    pub fn around(center: Coord) -> Self {
        Self::new(center, 0.005, 0.005)
    }

    /// The box spanned by this viewport, without any wrapping at the date line.
    pub fn bounding_box(&self) -> BoundingBox {
        let half_lat = self.lat_span / 2.0;
        let half_lon = self.lon_span / 2.0;

        BoundingBox {
            ll: Coord::new(self.center.lat - half_lat, self.center.lon - half_lon),
            ur: Coord::new(self.center.lat + half_lat, self.center.lon + half_lon),
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        let bbox = self.bounding_box();

        if bbox.ur.lon - bbox.ll.lon >= 360.0 {
            return coord.lat >= bbox.ll.lat && coord.lat <= bbox.ur.lat;
        }

        if bbox.ll.lon < -180.0 {
            let east = BoundingBox {
                ll: Coord::new(bbox.ll.lat, bbox.ll.lon + 360.0),
                ur: Coord::new(bbox.ur.lat, 180.0),
            };
            let west = BoundingBox {
                ll: Coord::new(bbox.ll.lat, -180.0),
                ur: bbox.ur,
            };
            east.contains(coord) || west.contains(coord)
        } else if bbox.ur.lon > 180.0 {
            let east = BoundingBox {
                ll: bbox.ll,
                ur: Coord::new(bbox.ur.lat, 180.0),
            };
            let west = BoundingBox {
                ll: Coord::new(bbox.ll.lat, -180.0),
                ur: Coord::new(bbox.ur.lat, bbox.ur.lon - 360.0),
            };
            east.contains(coord) || west.contains(coord)
        } else {
            bbox.contains(coord)
        }
    }

    /// Whether individual markers should be drawn at this zoom level.
    pub fn shows_markers(&self) -> bool {
        self.lat_span <= MARKER_ZOOM_THRESHOLD
    }

    /**
     * Keep only the items inside the viewport, preserving order.
     *
     * No viewport means the map has not reported a region yet, so everything is kept.
     */
    pub fn restrict<T: Geo + Clone>(viewport: Option<&Viewport>, items: &[T]) -> Vec<T> {
        match viewport {
            None => items.to_vec(),
            Some(vp) => items
                .iter()
                .filter(|item| vp.contains(item.coord()))
                .cloned()
                .collect(),
        }
    }
}

impl FromStr for Viewport {
    type Err = String;

    /// Parse "lat,lon,lat_span,lon_span".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<_> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!("expected 'lat,lon,lat_span,lon_span', got '{}'", s));
        }

        let center: Coord = format!("{},{}", parts[0], parts[1]).parse()?;
        let lat_span: f64 = parts[2].parse().map_err(|err| format!("{}: {}", parts[2], err))?;
        let lon_span: f64 = parts[3].parse().map_err(|err| format!("{}: {}", parts[3], err))?;

        if !(lat_span > 0.0 && lon_span > 0.0 && lat_span.is_finite() && lon_span.is_finite()) {
            return Err(format!(
                "spans must be positive: lat_span={} lon_span={}",
                lat_span, lon_span
            ));
        }

        Ok(Viewport::new(center, lat_span, lon_span))
    }
}
