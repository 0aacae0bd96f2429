/*!
 * User selected filters applied to the full radar list.
 */

use crate::{geo::Coord, radar::RadarRecord};

/// The filters a user can set. The default keeps everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadarFilter {
    /// Keep radars whose type contains this text, ignoring case. Blank means no filtering.
    pub type_query: Option<String>,
    /// Keep radars at most this far (km) from `reference`.
    pub max_distance_km: Option<f64>,
    /// Usually the user's position. Without it the distance filter does nothing.
    pub reference: Option<Coord>,
}

impl RadarFilter {
    /// The trimmed, lower cased type query, if there is a non-blank one.
    fn needle(&self) -> Option<String> {
        self.type_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    fn distance_limit(&self) -> Option<(Coord, f64)> {
        match (self.reference, self.max_distance_km) {
            (Some(reference), Some(max_km)) => Some((reference, max_km)),
            _ => None,
        }
    }

    /// Apply both filters, keeping the input order.
    pub fn apply(&self, radars: &[RadarRecord]) -> Vec<RadarRecord> {
        let needle = self.needle();
        let limit = self.distance_limit();

        radars
            .iter()
            .filter(|radar| match needle.as_deref() {
                Some(needle) => radar.radar_type.to_lowercase().contains(needle),
                None => true,
            })
            .filter(|radar| match limit {
                Some((reference, max_km)) => reference.distance_to(radar.position()) <= max_km,
                None => true,
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo::great_circle_distance;

    fn radar(id: &str, radar_type: &str, lat: f64, lon: f64) -> RadarRecord {
        RadarRecord {
            id: id.to_owned(),
            radar_type: radar_type.to_owned(),
            speed_limit: "50".to_owned(),
            lat,
            lon,
        }
    }

    fn sample() -> Vec<RadarRecord> {
        vec![
            radar("R1", "Radar fixe", 48.85, 2.35),
            radar("R2", "Feu rouge", 48.86, 2.36),
            radar("R3", "Radar FIXE discriminant", 45.76, 4.83),
        ]
    }

    #[test]
    fn test_default_is_identity() {
        let radars = sample();
        assert_eq!(RadarFilter::default().apply(&radars), radars);
    }

    #[test]
    fn test_type_filter_case_insensitive_and_trimmed() {
        let filter = RadarFilter {
            type_query: Some("  fixe ".to_owned()),
            ..Default::default()
        };
        let ids: Vec<_> = filter
            .apply(&sample())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["R1", "R3"]);

        let blank = RadarFilter {
            type_query: Some("   ".to_owned()),
            ..Default::default()
        };
        assert_eq!(blank.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_distance_needs_reference() {
        let filter = RadarFilter {
            max_distance_km: Some(0.001),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_distance_boundary() {
        let radars = sample();
        let reference = Coord::new(48.85, 2.35);
        let exact = great_circle_distance(reference, radars[1].position());

        let at_limit = RadarFilter {
            max_distance_km: Some(exact),
            reference: Some(reference),
            ..Default::default()
        };
        let ids: Vec<_> = at_limit.apply(&radars).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["R1", "R2"]);

        let just_under = RadarFilter {
            max_distance_km: Some(exact - 1.0e-9),
            reference: Some(reference),
            ..Default::default()
        };
        let ids: Vec<_> = just_under.apply(&radars).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["R1"]);
    }

    #[test]
    fn test_filters_combine() {
        let filter = RadarFilter {
            type_query: Some("fixe".to_owned()),
            max_distance_km: Some(50.0),
            reference: Some(Coord::new(48.85, 2.35)),
        };
        let ids: Vec<_> = filter.apply(&sample()).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["R1"]);
    }
}
