//! Game settings and preferences
//!
//! Persisted to `~/.snake_game_config.json`. Only the preference record lives
//! here; screen and speed tuning come from `GameConfig`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::highscores::HighScores;
use crate::persistence::{self, PersistError};
use crate::tuning::{Difficulty, GameConfig};

/// Color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Forest,
    Neon,
    Sunset,
    Ocean,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Forest, Theme::Neon, Theme::Sunset, Theme::Ocean];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Forest => "Forest",
            Theme::Neon => "Neon",
            Theme::Sunset => "Sunset",
            Theme::Ocean => "Ocean",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forest" => Some(Theme::Forest),
            "neon" => Some(Theme::Neon),
            "sunset" => Some(Theme::Sunset),
            "ocean" => Some(Theme::Ocean),
            _ => None,
        }
    }

    /// Next theme in menu order (wraps)
    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/// Volume change per menu step
pub const VOLUME_STEP: f32 = 0.1;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub difficulty: Difficulty,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    /// Copy of the best scores shown in the options screen
    pub high_scores: HighScores,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Forest,
            difficulty: Difficulty::Medium,
            // Starts muted
            volume: 0.0,
            high_scores: HighScores::default(),
        }
    }
}

impl Settings {
    /// File name under the user's home directory
    pub const FILE_NAME: &'static str = ".snake_game_config.json";

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = self.difficulty.next();
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
    }

    /// Raise volume by one step, wrapping to mute after full volume
    pub fn step_volume(&mut self) {
        let next = ((self.volume + VOLUME_STEP) * 10.0).round() / 10.0;
        self.volume = if next > 1.0 { 0.0 } else { next };
    }

    /// Volume as a whole percentage for display
    pub fn volume_percent(&self) -> u32 {
        (self.volume.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// Gameplay config for the selected difficulty
    pub fn game_config(&self) -> GameConfig {
        GameConfig::default().with_difficulty(self.difficulty)
    }

    /// Default location for the settings file
    pub fn default_path() -> PathBuf {
        persistence::user_file(Self::FILE_NAME)
    }

    /// Load settings from the default file
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from `path`; missing or corrupt files give defaults
    pub fn load_from(path: &Path) -> Self {
        let mut settings: Self = persistence::load_json(path);
        settings.volume = settings.volume.clamp(0.0, 1.0);
        settings
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), PersistError> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json(path, self)
    }
}
