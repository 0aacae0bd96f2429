/*!
 * Types and functions for working with radar records.
 *
 * A radar record is one row of the open data radar file: where the radar is, what kind it is,
 * and the posted speed limit.
 */

pub use parse::{parse_radars, Columns};
pub use record::{RadarRecord, UNKNOWN_SPEED_LIMIT, UNKNOWN_TYPE};

mod parse;
mod record;
