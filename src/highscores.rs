//! Top-N score table and its persisted form: a JSON array of
//! `{ "name", "score", "date" }` objects, best first, under one storage key.

use serde::{Deserialize, Deserializer, Serialize};

use crate::capability::Store;
use crate::error::{GameError, GameResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "name")]
    pub player_name: String,
    #[serde(deserialize_with = "lenient_score")]
    pub score: u32,
    pub date: String,
}

// Older builds stored fractional streak bonuses; round them on the way in.
fn lenient_score<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    let raw = f64::deserialize(de)?;
    Ok(if raw.is_finite() && raw > 0.0 { raw.round().min(u32::MAX as f64) as u32 } else { 0 })
}

/// Ordered (descending) list of at most `capacity` entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self { Self { entries: Vec::new(), capacity } }

    /// Builds a table from persisted entries, re-sorting and truncating them.
    pub fn from_entries(mut entries: Vec<ScoreEntry>, capacity: usize) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    pub fn entries(&self) -> &[ScoreEntry] { &self.entries }

    pub fn top(&self) -> Option<&ScoreEntry> { self.entries.first() }

    /// A score qualifies when it beats the last slot; empty slots count as 0.
    pub fn qualifies(&self, score: u32) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let floor = self.entries.get(self.capacity - 1).map(|e| e.score).unwrap_or(0);
        score > floor
    }

    /// Inserts the entry if it qualifies. Returns whether it was kept.
    pub fn insert(&mut self, entry: ScoreEntry) -> bool {
        if !self.qualifies(entry.score) {
            return false;
        }
        self.entries.push(entry);
        // stable: equal scores keep their earlier rank
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
        true
    }
}

/// Decodes the stored blob; a missing key is an empty list.
pub fn decode_scores(blob: Option<&str>) -> GameResult<Vec<ScoreEntry>> {
    match blob {
        None => Ok(Vec::new()),
        Some(s) if s.trim().is_empty() => Ok(Vec::new()),
        Some(s) => Ok(serde_json::from_str(s)?),
    }
}

pub fn encode_scores(entries: &[ScoreEntry]) -> GameResult<String> {
    Ok(serde_json::to_string(entries)?)
}

/// In-memory [`Store`] keeping the same serialized blob the browser would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    unavailable: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self { blob: Some(blob.into()), ..Self::default() }
    }

    /// Store whose reads and writes always fail.
    pub fn unavailable() -> Self { Self { unavailable: true, ..Self::default() } }

    pub fn blob(&self) -> Option<&str> { self.blob.as_deref() }

    /// Number of successful saves.
    pub fn saves(&self) -> usize { self.saves }
}

impl Store for MemoryStore {
    fn load_high_scores(&self) -> GameResult<Vec<ScoreEntry>> {
        if self.unavailable {
            return Err(GameError::StoreUnavailable("memory store offline".into()));
        }
        decode_scores(self.blob.as_deref())
    }

    fn save_high_scores(&mut self, entries: &[ScoreEntry]) -> GameResult<()> {
        if self.unavailable {
            return Err(GameError::StoreUnavailable("memory store offline".into()));
        }
        self.blob = Some(encode_scores(entries)?);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> ScoreEntry {
        ScoreEntry { player_name: name.into(), score, date: "1/2/2025".into() }
    }

    fn full_table() -> HighScoreTable {
        HighScoreTable::from_entries(
            vec![entry("a", 500), entry("b", 400), entry("c", 300), entry("d", 200), entry("e", 100)],
            5,
        )
    }

    #[test]
    fn test_empty_table_accepts_any_positive_score() {
        let mut t = HighScoreTable::new(5);
        assert!(!t.qualifies(0));
        assert!(t.qualifies(1));
        assert!(t.insert(entry("x", 1)));
        assert_eq!(t.top().map(|e| e.score), Some(1));
    }

    #[test]
    fn test_full_table_needs_to_beat_last_slot() {
        let mut t = full_table();
        assert!(!t.qualifies(100));
        assert!(!t.insert(entry("late", 100)));
        assert!(t.insert(entry("new", 250)));
        let scores: Vec<u32> = t.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![500, 400, 300, 250, 200]);
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut t = HighScoreTable::from_entries(vec![entry("old", 300)], 5);
        t.insert(entry("new", 300));
        assert_eq!(t.entries()[0].player_name, "old");
        assert_eq!(t.entries()[1].player_name, "new");
    }

    #[test]
    fn test_from_entries_normalises() {
        let t = HighScoreTable::from_entries(
            vec![entry("l", 1), entry("h", 9), entry("m", 5), entry("x", 3)],
            3,
        );
        let names: Vec<&str> = t.entries().iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["h", "m", "x"]);
    }

    #[test]
    fn test_decode_persisted_shape() {
        let blob = r#"[{"name":"Ada","score":312.5,"date":"3/4/2025"},{"name":"Bo","score":90,"date":"3/5/2025"}]"#;
        let scores = decode_scores(Some(blob)).unwrap();
        assert_eq!(scores[0], ScoreEntry { player_name: "Ada".into(), score: 313, date: "3/4/2025".into() });
        assert_eq!(scores[1].score, 90);
        assert!(decode_scores(None).unwrap().is_empty());
        assert!(matches!(decode_scores(Some("not json")), Err(GameError::StoreUnavailable(_))));
    }

    #[test]
    fn test_encode_uses_name_key() {
        let s = encode_scores(&[entry("Ada", 7)]).unwrap();
        assert_eq!(s, r#"[{"name":"Ada","score":7,"date":"1/2/2025"}]"#);
    }

    #[test]
    fn test_memory_store_round_trip_and_failure() {
        let mut store = MemoryStore::new();
        assert!(store.load_high_scores().unwrap().is_empty());
        store.save_high_scores(&[entry("z", 42)]).unwrap();
        assert_eq!(store.load_high_scores().unwrap()[0].score, 42);
        assert_eq!(store.saves(), 1);

        let mut down = MemoryStore::unavailable();
        assert!(down.load_high_scores().is_err());
        assert!(down.save_high_scores(&[]).is_err());
    }
}
