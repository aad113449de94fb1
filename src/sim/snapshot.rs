//! Read-only view of the game state
//!
//! Everything a renderer or the headless driver needs for one frame, taken
//! without touching the simulation.

use serde::{Deserialize, Serialize};

use super::state::{Cell, GamePhase, GameState, Mode};

/// Read-only view of a game for the renderer/HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snake cells, head first
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub bombs: Vec<Cell>,
    pub score: u64,
    pub mode: Mode,
    pub game_over: bool,
    pub waiting_for_respawn: bool,
    /// Seconds left for the current food (0 outside time attack)
    pub time_remaining: f32,
    /// Upper bound of the time-attack clock, for drawing the bar (0 outside time attack)
    pub max_time: f32,
    /// Remaining lives (0 outside survival)
    pub lives: u8,
    pub current_speed: f32,
    pub foods_eaten: u32,
    pub grid_size: i32,
    pub screen_width: i32,
    pub screen_height: i32,
}

impl Snapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.waiting_for_respawn
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let (time_remaining, max_time) = if self.rules.countdown {
            (self.time_remaining.max(0.0), self.config.max_time)
        } else {
            (0.0, 0.0)
        };
        Snapshot {
            snake: self.snake.iter().copied().collect(),
            food: self.food,
            bombs: self.bombs.iter().map(|b| b.cell).collect(),
            score: self.score,
            mode: self.mode,
            game_over: self.phase == GamePhase::GameOver,
            waiting_for_respawn: self.phase == GamePhase::WaitingForRespawn,
            time_remaining,
            max_time,
            lives: if self.rules.lives { self.lives } else { 0 },
            current_speed: self.current_speed,
            foods_eaten: self.foods_eaten,
            grid_size: self.config.grid_size,
            screen_width: self.config.screen_width,
            screen_height: self.config.screen_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick;
    use crate::tuning::GameConfig;

    #[test]
    fn test_snapshot_mode_fields() {
        let mut state = GameState::new(GameConfig::default(), 21);
        let snap = state.snapshot();
        assert_eq!(snap.mode, Mode::Classic);
        assert_eq!(snap.lives, 0);
        assert_eq!(snap.time_remaining, 0.0);
        assert_eq!(snap.max_time, 0.0);
        assert_eq!(snap.snake.len(), 3);
        assert_eq!(snap.snake[0], state.snake.head());
        assert!(snap.playable());

        state.reset(Mode::Survival);
        assert_eq!(state.snapshot().lives, 3);

        state.reset(Mode::TimeAttack);
        let snap = state.snapshot();
        assert_eq!(snap.time_remaining, 20.0);
        assert_eq!(snap.max_time, 60.0);
    }

    #[test]
    fn test_snapshot_has_no_side_effects() {
        let mut state = GameState::new(GameConfig::default(), 22);
        state.reset(Mode::Survival);
        tick(&mut state, 0.1);
        let first = state.snapshot();
        let second = state.snapshot();
        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(GameConfig::default(), 23);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"mode\":\"classic\""));
        assert!(json.contains("\"game_over\":false"));
    }
}
