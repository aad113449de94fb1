//! Snake Arcade - a grid snake game with three modes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, mode rules, snapshot)
//! - `tuning`: Immutable gameplay configuration
//! - `settings`: Persisted player preferences
//! - `highscores`: Persisted best score per mode
//! - `persistence`: User-scoped JSON files with atomic writes

pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{Settings, Theme};
pub use sim::{Direction, GameState, Mode, Snapshot, tick};
pub use tuning::{Difficulty, GameConfig};

/// Game rule constants
pub mod consts {
    /// Segments in a fresh snake
    pub const INITIAL_SNAKE_LENGTH: usize = 3;
    /// Points per food
    pub const SCORE_PER_FOOD: u64 = 10;

    /// Snake length at which time-attack allocations are fully scaled down
    pub const TIME_SCALE_LENGTH: f32 = 50.0;
    /// Floor for the time-attack length multiplier
    pub const MIN_TIME_SCALE: f32 = 0.5;

    /// Seconds between bomb spawns at the start of a survival run
    pub const BOMB_INTERVAL_START: f32 = 6.0;
    /// Shortest bomb spawn interval
    pub const BOMB_INTERVAL_MIN: f32 = 2.0;
    /// Foods eaten per second taken off the spawn interval
    pub const BOMB_INTERVAL_FOODS_PER_SECOND: f32 = 10.0;
}
