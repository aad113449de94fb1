//! Best score per game mode
//!
//! Persisted to `~/.snake_high_scores.json` as a flat `{mode: score}` map.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};
use crate::sim::Mode;

/// Best score for each mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HighScores {
    pub classic: u64,
    pub time_attack: u64,
    pub survival: u64,
}

impl HighScores {
    /// File name under the user's home directory
    pub const FILE_NAME: &'static str = ".snake_high_scores.json";

    /// Create an all-zero table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Classic => self.classic,
            Mode::TimeAttack => self.time_attack,
            Mode::Survival => self.survival,
        }
    }

    fn slot_mut(&mut self, mode: Mode) -> &mut u64 {
        match mode {
            Mode::Classic => &mut self.classic,
            Mode::TimeAttack => &mut self.time_attack,
            Mode::Survival => &mut self.survival,
        }
    }

    /// Record `score` if it beats the current best. Returns true if it did.
    pub fn record(&mut self, mode: Mode, score: u64) -> bool {
        let slot = self.slot_mut(mode);
        if score > *slot {
            *slot = score;
            true
        } else {
            false
        }
    }

    /// All modes with their best score, in menu order
    pub fn all(&self) -> [(Mode, u64); 3] {
        Mode::ALL.map(|mode| (mode, self.best(mode)))
    }

    /// Default location for the score file
    pub fn default_path() -> PathBuf {
        persistence::user_file(Self::FILE_NAME)
    }
}

/// High scores bound to the file they persist to
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl ScoreStore {
    /// Load from the default user-scoped file
    pub fn load() -> Self {
        Self::load_from(HighScores::default_path())
    }

    /// Load from `path`; a missing or corrupt file gives all-zero scores
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = persistence::load_json(&path);
        Self { path, scores }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn best(&self, mode: Mode) -> u64 {
        self.scores.best(mode)
    }

    /// Store `score` if strictly greater than the best for `mode`, saving immediately.
    /// Returns whether a new best was recorded.
    pub fn update_if_higher(&mut self, mode: Mode, score: u64) -> Result<bool, PersistError> {
        if !self.scores.record(mode, score) {
            return Ok(false);
        }
        log::info!("New {} high score: {}", mode.as_str(), score);
        persistence::save_json(&self.path, &self.scores)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_only_strictly_higher() {
        let mut scores = HighScores::new();
        assert!(!scores.record(Mode::Classic, 0));
        assert!(scores.record(Mode::Classic, 50));
        assert!(!scores.record(Mode::Classic, 50));
        assert!(!scores.record(Mode::Classic, 40));
        assert_eq!(scores.best(Mode::Classic), 50);
        assert_eq!(scores.best(Mode::Survival), 0);
    }

    #[test]
    fn test_missing_file_is_all_zero() {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::load_from(dir.path().join("scores.json"));
        for (_, score) in store.scores().all() {
            assert_eq!(score, 0);
        }
    }

    #[test]
    fn test_scores_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        let mut store = ScoreStore::load_from(&path);
        assert!(store.update_if_higher(Mode::TimeAttack, 120).unwrap());
        assert!(!store.update_if_higher(Mode::TimeAttack, 100).unwrap());

        let reloaded = ScoreStore::load_from(&path);
        assert_eq!(reloaded.best(Mode::TimeAttack), 120);
        assert_eq!(reloaded.best(Mode::Classic), 0);
    }

    #[test]
    fn test_lower_score_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        let mut store = ScoreStore::load_from(&path);
        assert!(!store.update_if_higher(Mode::Survival, 0).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_flat_json_format() {
        let json = r#"{"classic": 30, "time_attack": 0, "survival": 90, "extra": 1}"#;
        let scores: HighScores = serde_json::from_str(json).unwrap();
        assert_eq!(scores.best(Mode::Classic), 30);
        assert_eq!(scores.best(Mode::Survival), 90);

        let partial: HighScores = serde_json::from_str(r#"{"survival": 5}"#).unwrap();
        assert_eq!(partial.best(Mode::Classic), 0);
        assert_eq!(partial.best(Mode::Survival), 5);
    }
}
