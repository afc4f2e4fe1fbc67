//! Per-mode high scores
//!
//! The simulation talks to storage only through [`HighScoreStore`]. A missing
//! or unreadable value is a high score of 0, never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::GameMode;

/// Persistence collaborator for high scores
pub trait HighScoreStore {
    /// Stored high score for `mode` (0 when nothing is stored)
    fn load(&self, mode: GameMode) -> u64;
    /// Overwrite the stored high score for `mode`
    fn save(&mut self, mode: GameMode, score: u64);
}

/// High score table keyed by each mode's storage key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: BTreeMap<String, u64>,
}

impl HighScores {
    /// Create empty table
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// High score for a mode (0 if none)
    pub fn get(&self, mode: GameMode) -> u64 {
        self.entries.get(mode.storage_key()).copied().unwrap_or(0)
    }

    pub fn set(&mut self, mode: GameMode, score: u64) {
        self.entries.insert(mode.storage_key().to_string(), score);
    }

    /// Record `score` only if it beats the current entry; returns whether it did
    pub fn submit(&mut self, mode: GameMode, score: u64) -> bool {
        if score > self.get(mode) {
            self.set(mode, score);
            true
        } else {
            false
        }
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HighScores,
    saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls received
    pub fn save_count(&self) -> u32 {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self, mode: GameMode) -> u64 {
        self.scores.get(mode)
    }

    fn save(&mut self, mode: GameMode, score: u64) {
        self.saves += 1;
        self.scores.set(mode, score);
    }
}

/// JSON file store for the native binary
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
    scores: HighScores,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open a table at `path`; a missing or corrupt file starts fresh
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let scores = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores from {}", scores.entries.len(), path.display());
                    scores
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt high score file {}: {}", path.display(), e);
                    HighScores::new()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
        };
        Self { path, scores }
    }

    fn write(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        std::fs::write(&self.path, json)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for JsonFileStore {
    fn load(&self, mode: GameMode) -> u64 {
        self.scores.get(mode)
    }

    fn save(&mut self, mode: GameMode, score: u64) {
        self.scores.set(mode, score);
        match self.write() {
            Ok(()) => log::info!("High scores saved to {}", self.path.display()),
            Err(e) => log::warn!("Could not save high scores to {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_zero() {
        let scores = HighScores::new();
        assert!(scores.is_empty());
        assert_eq!(scores.get(GameMode::Marathon), 0);
    }

    #[test]
    fn test_submit_only_raises() {
        let mut scores = HighScores::new();
        assert!(scores.submit(GameMode::Challenge, 10));
        assert!(!scores.submit(GameMode::Challenge, 9));
        assert!(!scores.submit(GameMode::Challenge, 10));
        assert!(scores.submit(GameMode::Challenge, 11));
        assert_eq!(scores.get(GameMode::Challenge), 11);
        assert_eq!(scores.get(GameMode::Marathon), 0);
    }

    #[test]
    fn test_modes_use_separate_slots() {
        let mut scores = HighScores::new();
        scores.set(GameMode::Classic, 3);
        scores.set(GameMode::Marathon, 40);
        assert_eq!(scores.get(GameMode::Classic), 3);
        let json = serde_json::to_string(&scores).expect("serialize");
        assert_eq!(json, r#"{"highScore":3,"marathon":40}"#);
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(GameMode::Classic), 0);
        store.save(GameMode::Classic, 7);
        assert_eq!(store.load(GameMode::Classic), 7);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_json_file_store_persists() {
        let path = std::env::temp_dir().join(format!(
            "hop_runner_scores_{}_{}.json",
            std::process::id(),
            line!()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.load(GameMode::Marathon), 0);
        store.save(GameMode::Marathon, 25);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.load(GameMode::Marathon), 25);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_file_store_survives_corruption() {
        let path = std::env::temp_dir().join(format!(
            "hop_runner_corrupt_{}_{}.json",
            std::process::id(),
            line!()
        ));
        std::fs::write(&path, "{ nope").expect("write temp file");
        let store = JsonFileStore::open(&path);
        for mode in GameMode::ALL {
            assert_eq!(store.load(mode), 0);
        }
        let _ = std::fs::remove_file(&path);
    }
}
