//! Per radar statistics shown next to a radar's details.
//!
//! These come from a JSON file mapping radar ids to the user's rank and the number of times they
//! passed the radar.

use crate::RadarMapResult;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;

/// The statistics for one radar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RadarRanking {
    #[serde(rename = "userRank")]
    pub user_rank: u32,
    pub passages: u32,
}

/// Radar rankings, keyed by radar id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Rankings(FxHashMap<String, RadarRanking>);

impl Rankings {
    pub fn from_json_str(json: &str) -> RadarMapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RadarMapResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn get(&self, radar_id: &str) -> Option<RadarRanking> {
        self.0.get(radar_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
