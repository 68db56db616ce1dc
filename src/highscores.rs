//! High score record
//!
//! A single integer survives across runs, stored as `{"high_score": N}`.

use serde::{Deserialize, Serialize};

/// Persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    #[serde(default)]
    pub high_score: u64,
}

impl HighScoreRecord {
    /// Storage key for key/value backends
    pub const STORAGE_KEY: &'static str = "high_score";

    pub fn new(high_score: u64) -> Self {
        Self { high_score }
    }

    /// Parse a stored record; anything unreadable counts as no record
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HighScoreRecord>(json) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Malformed high score record ({}), starting from 0", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| format!("{{\"high_score\": {}}}", self.high_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_record() {
        let record = HighScoreRecord::from_json(r#"{"high_score": 412}"#);
        assert_eq!(record.high_score, 412);
    }

    #[test]
    fn test_malformed_record_defaults_to_zero() {
        assert_eq!(HighScoreRecord::from_json("not json").high_score, 0);
        assert_eq!(HighScoreRecord::from_json(r#"{"high_score": -4}"#).high_score, 0);
        assert_eq!(HighScoreRecord::from_json("{}").high_score, 0);
    }

    #[test]
    fn test_round_trip_through_json() {
        let record = HighScoreRecord::new(77);
        assert_eq!(HighScoreRecord::from_json(&record.to_json()), record);
    }
}
