//! High score storage backends
//!
//! Features:
//! - JSON file store with tmp → rename overwrite
//! - In-memory store for tests and storage-less hosts
//! - LocalStorage store on the web
//!
//! Storage failures never reach the player: reads fall back to 0 and failed
//! writes are logged.

use std::io;
use std::path::{Path, PathBuf};

use crate::highscores::HighScoreRecord;

/// Where the high score lives between runs
pub trait ScoreStore {
    /// Read the stored high score (0 if absent or unreadable)
    fn load(&self) -> u64;
    /// Overwrite the stored high score
    fn save(&mut self, high_score: u64);
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Default location relative to the working directory
    pub const DEFAULT_PATH: &'static str = "data/scores.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, record: &HighScoreRecord) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, record.to_json())?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> u64 {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => {
                let record = HighScoreRecord::from_json(&json);
                log::info!("Loaded high score {}", record.high_score);
                record.high_score
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score file, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save(&mut self, high_score: u64) {
        match self.write(&HighScoreRecord::new(high_score)) {
            Ok(()) => log::debug!("High score {} saved", high_score),
            Err(e) => log::warn!("Could not save high score to {}: {}", self.path.display(), e),
        }
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(high_score: u64) -> Self {
        Self {
            value: Some(high_score),
            writes: 0,
        }
    }

    /// Last value written (or seeded)
    pub fn value(&self) -> Option<u64> {
        self.value
    }

    /// Number of `save` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.value.unwrap_or(0)
    }

    fn save(&mut self, high_score: u64) {
        self.value = Some(high_score);
        self.writes += 1;
    }
}

/// Browser LocalStorage (key `high_score`)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        let stored = Self::storage()
            .and_then(|s| s.get_item(HighScoreRecord::STORAGE_KEY).ok())
            .flatten();
        match stored.map(|v| v.trim().parse::<u64>()) {
            Some(Ok(score)) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Some(Err(_)) => {
                log::warn!("Malformed high score in LocalStorage, starting from 0");
                0
            }
            None => {
                log::info!("No high score found, starting fresh");
                0
            }
        }
    }

    fn save(&mut self, high_score: u64) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score not saved");
            return;
        };
        if storage
            .set_item(HighScoreRecord::STORAGE_KEY, &high_score.to_string())
            .is_err()
        {
            log::warn!("Could not save high score to LocalStorage");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("scores.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_file_store_round_trip_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("scores.json");
        let mut store = FileStore::new(&path);
        store.save(321);
        assert!(path.exists());
        assert_eq!(FileStore::new(&path).load(), 321);

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"high_score\""));
    }

    #[test]
    fn test_file_store_corrupt_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "{ garbage").unwrap();
        assert_eq!(FileStore::new(&path).load(), 0);
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::with_value(5);
        assert_eq!(store.load(), 5);
        store.save(9);
        store.save(12);
        assert_eq!(store.load(), 12);
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_empty_memory_store_distinguishes_unset_from_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(store.value(), None);
        assert_eq!(store.load(), 0);
        store.save(0);
        assert_eq!(store.value(), Some(0));
        assert_eq!(store.writes(), 1);
    }
}
