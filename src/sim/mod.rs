//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only enters through `tick`'s `dt`
//! - No rendering, audio or file I/O

pub mod placement;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use placement::{Occupancy, find_free_cell, spawn_bomb, spawn_food};
pub use snapshot::Snapshot;
pub use state::{
    Bomb, Boundary, Cell, Direction, GameEvent, GamePhase, GameState, Mode, ModeRules, Snake,
};
pub use tick::{bomb_spawn_interval, length_time_scale, tick, time_for_distance};
