/*! Turn the raw semicolon delimited radar file into records. */

use super::record::{RadarRecord, UNKNOWN_SPEED_LIMIT, UNKNOWN_TYPE};
use crate::error::RadarMapError;

const LATITUDE: &str = "Latitude";
const LONGITUDE: &str = "Longitude";
const IDENTIFIER: &str = "Identifiant unique";
const RADAR_TYPE: &str = "Type de radar";
const SPEED_LIMIT: &str = "VMA (km/h)";

const DELIMITER: char = ';';

/// Positions of the columns of interest in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub lat: usize,
    pub lon: usize,
    pub id: Option<usize>,
    pub radar_type: Option<usize>,
    pub speed_limit: Option<usize>,
}

impl Columns {
    /**
     * Locate the columns in a header row.
     *
     * Names are matched exactly after stripping quotes and whitespace. The coordinate columns are
     * required, the rest fall back to default values when they are missing.
     */
    pub fn from_header(header: &str) -> Result<Self, RadarMapError> {
        let names: Vec<&str> = header.split(DELIMITER).map(clean_field).collect();
        let find = |name: &str| names.iter().position(|n| *n == name);

        let lat = find(LATITUDE).ok_or(RadarMapError::Schema { missing: LATITUDE })?;
        let lon = find(LONGITUDE).ok_or(RadarMapError::Schema { missing: LONGITUDE })?;

        Ok(Columns {
            lat,
            lon,
            id: find(IDENTIFIER),
            radar_type: find(RADAR_TYPE),
            speed_limit: find(SPEED_LIMIT),
        })
    }

    /// Build a record from one data row. `row` is the line number, the header being row 0.
    fn record(&self, row: usize, line: &str) -> Result<RadarRecord, RadarMapError> {
        let fields: Vec<&str> = line.split(DELIMITER).map(clean_field).collect();

        let field = |idx: Option<usize>| {
            idx.and_then(|i| fields.get(i).copied())
                .filter(|val| !val.is_empty())
        };

        let lat = parse_coordinate(row, "latitude", field(Some(self.lat)))?;
        let lon = parse_coordinate(row, "longitude", field(Some(self.lon)))?;

        let id = match field(self.id) {
            Some(id) => id.to_owned(),
            None => format!("radar-{}", row),
        };

        Ok(RadarRecord {
            id,
            radar_type: field(self.radar_type).unwrap_or(UNKNOWN_TYPE).to_owned(),
            speed_limit: field(self.speed_limit)
                .unwrap_or(UNKNOWN_SPEED_LIMIT)
                .to_owned(),
            lat,
            lon,
        })
    }
}

fn clean_field(field: &str) -> &str {
    field.trim_matches(|c: char| c == '"' || c.is_whitespace())
}

fn parse_coordinate(row: usize, what: &str, val: Option<&str>) -> Result<f64, RadarMapError> {
    let val = val.ok_or_else(|| RadarMapError::RowParse {
        row,
        reason: format!("missing {}", what),
    })?;

    match val.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RadarMapError::RowParse {
            row,
            reason: format!("invalid {} '{}'", what, val),
        }),
    }
}

/**
 * Parse the raw text of a radar file.
 *
 * The first line is the header. Data rows with a missing, unparsable, or non-finite coordinate are
 * dropped and logged, the rest are returned in file order. Only a header without both coordinate
 * columns is an error.
 */
pub fn parse_radars(text: &str) -> Result<Vec<RadarRecord>, RadarMapError> {
    let mut lines = text.trim().split('\n');

    let header = lines.next().unwrap_or("");
    let columns = Columns::from_header(header)?;

    let mut radars = vec![];
    let mut dropped = 0;
    for (row, line) in lines.enumerate().map(|(i, line)| (i + 1, line)) {
        match columns.record(row, line) {
            Ok(radar) => radars.push(radar),
            Err(err) => {
                log::debug!("Skipping {}", err);
                dropped += 1;
            }
        }
    }

    log::info!("Parsed {} radars, dropped {} rows.", radars.len(), dropped);

    Ok(radars)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    const HEADER: &str = "Latitude;Longitude;Identifiant unique;Type de radar;VMA (km/h)";

    #[test]
    fn test_header_lookup() {
        let cols =
            Columns::from_header("\"VMA (km/h)\"; \"Longitude\" ;Latitude;Other").unwrap();
        assert_eq!(cols.lat, 2);
        assert_eq!(cols.lon, 1);
        assert_eq!(cols.id, None);
        assert_eq!(cols.radar_type, None);
        assert_eq!(cols.speed_limit, Some(0));
    }

    #[test]
    fn test_header_is_case_sensitive() {
        let err = Columns::from_header("latitude;Longitude").unwrap_err();
        assert_eq!(err, RadarMapError::Schema { missing: LATITUDE });

        let err = Columns::from_header("Latitude;LONGITUDE").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_empty_input_is_schema_error() {
        assert_eq!(parse_radars("").unwrap_err().kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_bad_rows_dropped() {
        let text = format!(
            "{}\n48.85;2.35;R1;Fixe;50\n;2.0;R2;Fixe;50\n48.0;inf;R3;Fixe;50\n48.0;NaN;R4;Fixe;50\n\n1.0;x1;R5;Fixe;50\n43.3;5.4;R6;Feu;30\r\n",
            HEADER
        );
        let radars = parse_radars(&text).unwrap();

        let ids: Vec<_> = radars.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["R1", "R6"]);
        assert_eq!(radars[1].speed_limit, "30");
    }

    #[test]
    fn test_defaults_for_blank_and_short_rows() {
        let text = format!("{}\n48.85;2.35;;;\n48.86;2.36\n", HEADER);
        let radars = parse_radars(&text).unwrap();

        assert_eq!(radars.len(), 2);
        assert_eq!(radars[0].id, "radar-1");
        assert_eq!(radars[0].radar_type, UNKNOWN_TYPE);
        assert_eq!(radars[0].speed_limit, UNKNOWN_SPEED_LIMIT);
        assert_eq!(radars[1].id, "radar-2");
        assert_eq!(radars[1].radar_type, UNKNOWN_TYPE);
    }

    #[test]
    fn test_duplicate_ids_kept() {
        let text = format!("{}\n48.85;2.35;R1;Fixe;50\n48.86;2.36;R1;Fixe;50\n", HEADER);
        let radars = parse_radars(&text).unwrap();
        assert_eq!(radars.len(), 2);
    }
}
