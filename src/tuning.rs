//! Data-driven game balance
//!
//! `GameConfig` is an immutable value handed to the simulation at construction.
//! Preference changes (difficulty) only take effect on the next reset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty levels, each with its own base snake speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Next difficulty in menu order (wraps)
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

/// Base speed per difficulty (moves per second)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedTable {
    pub easy: f32,
    pub medium: f32,
    pub hard: f32,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            easy: 8.0,
            medium: 12.0,
            hard: 16.0,
        }
    }
}

impl SpeedTable {
    pub fn get(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Rejected configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("screen dimensions must be positive (got {width}x{height})")]
    ScreenSize { width: i32, height: i32 },
    #[error("grid size must be positive (got {0})")]
    GridSize(i32),
    #[error("grid size {grid} does not divide screen {width}x{height}")]
    GridAlignment { grid: i32, width: i32, height: i32 },
    #[error("speed values must be positive")]
    Speed,
    #[error("max speed {max} is below base speed {base} for {difficulty:?}")]
    MaxSpeedBelowBase {
        max: f32,
        base: f32,
        difficulty: Difficulty,
    },
    #[error("time-attack window is invalid (min {min}, max {max})")]
    TimeWindow { min: f32, max: f32 },
}

/// Immutable gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    /// Edge length of one cell; every entity sits on a multiple of it
    pub grid_size: i32,
    pub difficulty: Difficulty,
    pub base_speed: SpeedTable,
    /// Speed gained per food eaten
    pub speed_increment: f32,
    pub max_speed: f32,

    // === Time attack ===
    pub min_time: f32,
    pub max_time: f32,
    /// Time on the clock before the first allocation
    pub initial_time: f32,

    // === Survival ===
    pub starting_lives: u8,
    /// Seconds a bomb stays on the board
    pub bomb_lifetime: f32,
    /// Probability a bomb candidate is drawn near the food
    pub bomb_near_food_chance: f64,
    /// Max offset (in cells, per axis) for near-food bombs
    pub bomb_near_food_radius: i32,

    // === Placement ===
    pub food_attempts: u32,
    pub bomb_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 1200,
            screen_height: 800,
            grid_size: 20,
            difficulty: Difficulty::Medium,
            base_speed: SpeedTable::default(),
            speed_increment: 0.2,
            max_speed: 30.0,

            min_time: 5.0,
            max_time: 60.0,
            initial_time: 20.0,

            starting_lives: 3,
            bomb_lifetime: 10.0,
            bomb_near_food_chance: 0.7,
            bomb_near_food_radius: 3,

            food_attempts: 100,
            bomb_attempts: 50,
        }
    }
}

impl GameConfig {
    /// Copy of this config with a different difficulty
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Base speed for the configured difficulty
    pub fn base_speed(&self) -> f32 {
        self.base_speed.get(self.difficulty)
    }

    /// Number of cell columns
    pub fn columns(&self) -> i32 {
        self.screen_width / self.grid_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> i32 {
        self.screen_height / self.grid_size
    }

    /// Length of the screen diagonal
    pub fn diagonal(&self) -> f32 {
        (self.screen_width as f32).hypot(self.screen_height as f32)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(ConfigError::ScreenSize {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if self.grid_size <= 0 {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if self.screen_width % self.grid_size != 0 || self.screen_height % self.grid_size != 0 {
            return Err(ConfigError::GridAlignment {
                grid: self.grid_size,
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        let speeds = [
            self.base_speed.easy,
            self.base_speed.medium,
            self.base_speed.hard,
            self.max_speed,
        ];
        if speeds.iter().any(|s| *s <= 0.0) || self.speed_increment < 0.0 {
            return Err(ConfigError::Speed);
        }
        for difficulty in Difficulty::ALL {
            let base = self.base_speed.get(difficulty);
            if self.max_speed < base {
                return Err(ConfigError::MaxSpeedBelowBase {
                    max: self.max_speed,
                    base,
                    difficulty,
                });
            }
        }
        if self.min_time <= 0.0 || self.max_time < self.min_time {
            return Err(ConfigError::TimeWindow {
                min: self.min_time,
                max: self.max_time,
            });
        }
        Ok(())
    }
}
