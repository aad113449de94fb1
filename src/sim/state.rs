//! Game state and core simulation types
//!
//! Everything a run needs lives on `GameState`; the renderer only ever sees a
//! `Snapshot` of it.

use std::collections::VecDeque;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::placement;
use crate::consts::*;
use crate::tuning::{Difficulty, GameConfig};

/// A grid-aligned position in screen units (always a multiple of the grid size)
pub type Cell = IVec2;

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step (screen coordinates, y grows downward)
    pub fn to_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Game mode, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Classic,
    TimeAttack,
    Survival,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Classic, Mode::TimeAttack, Mode::Survival];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Classic => "Classic",
            Mode::TimeAttack => "Time Attack",
            Mode::Survival => "Survival",
        }
    }

    /// Stable identifier used in save files
    pub fn key(&self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::TimeAttack => "time_attack",
            Mode::Survival => "survival",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "classic" => Some(Mode::Classic),
            "time_attack" | "timeattack" => Some(Mode::TimeAttack),
            "survival" => Some(Mode::Survival),
            _ => None,
        }
    }

    /// Policy table for this mode
    pub const fn rules(self) -> ModeRules {
        match self {
            Mode::Classic => ModeRules {
                boundary: Boundary::Wrap,
                countdown: false,
                hazards: false,
                lives: false,
            },
            Mode::TimeAttack => ModeRules {
                boundary: Boundary::Wrap,
                countdown: true,
                hazards: false,
                lives: false,
            },
            Mode::Survival => ModeRules {
                boundary: Boundary::Solid,
                countdown: false,
                hazards: true,
                lives: true,
            },
        }
    }
}

/// What happens when the head leaves the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// Re-enter from the opposite edge
    Wrap,
    /// Leaving the screen is a collision
    Solid,
}

/// Mode-dependent behavior, selected once at reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRules {
    pub boundary: Boundary,
    /// Per-food countdown timer
    pub countdown: bool,
    /// Bombs spawn and expire
    pub hazards: bool,
    /// Collisions cost a life instead of ending the run
    pub lives: bool,
}

/// The snake body, head first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    cells: VecDeque<Cell>,
    /// Direction applied on the last tick
    pub direction: Direction,
    /// Direction to apply on the next tick
    pub pending: Direction,
}

impl Snake {
    /// Starting snake: centered, facing right, tail trailing to the left
    pub fn centered(config: &GameConfig) -> Self {
        let grid = config.grid_size;
        let head = IVec2::new(
            (config.columns() / 2) * grid,
            (config.rows() / 2) * grid,
        );
        let cells = (0..INITIAL_SNAKE_LENGTH as i32)
            .map(|i| head - IVec2::new(i * grid, 0))
            .collect();
        Self {
            cells,
            direction: Direction::Right,
            pending: Direction::Right,
        }
    }

    /// Snake from explicit cells, head first
    ///
    /// # Panics
    ///
    /// Panics if `cells` is empty.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        let cells: VecDeque<Cell> = cells.into_iter().collect();
        assert!(!cells.is_empty(), "snake needs at least a head");
        Self {
            cells,
            direction,
            pending: direction,
        }
    }

    pub fn head(&self) -> Cell {
        // pop_tail never removes the last cell
        self.cells[0]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.cells.push_front(cell);
    }

    pub fn pop_tail(&mut self) -> Option<Cell> {
        if self.cells.len() > 1 {
            self.cells.pop_back()
        } else {
            None
        }
    }
}

/// A survival-mode hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub cell: Cell,
    /// Simulation clock (seconds) when the bomb appeared
    pub spawned_at: f32,
}

impl Bomb {
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawned_at
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the snake
    Running,
    /// Survival only: a life was lost, waiting for `respawn`
    WaitingForRespawn,
    /// Run ended
    GameOver,
}

/// Things that happened during a tick, for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten { score: u64 },
    BombSpawned { cell: Cell },
    BombExpired { cell: Cell },
    LifeLost { lives_left: u8 },
    TimeUp,
    GameOver { score: u64 },
}

/// Complete simulation state for one game instance
#[derive(Debug, Clone)]
pub struct GameState {
    /// Read-only gameplay configuration
    pub config: GameConfig,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub mode: Mode,
    pub rules: ModeRules,
    pub snake: Snake,
    pub food: Cell,
    /// Active bombs (survival only)
    pub bombs: Vec<Bomb>,
    pub score: u64,
    pub foods_eaten: u32,
    /// Remaining lives (survival only)
    pub lives: u8,
    pub phase: GamePhase,
    /// Base speed captured at reset from the configured difficulty
    pub base_speed: f32,
    /// Moves per second
    pub current_speed: f32,
    /// Time-attack clock for the current food (seconds)
    pub time_remaining: f32,
    /// Whether `time_remaining` was allocated for the current food
    pub time_allocated: bool,
    /// Seconds since the last bomb spawn attempt
    pub bomb_spawn_timer: f32,
    /// Simulation clock (seconds of running time this run)
    pub elapsed: f32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game in classic mode with the given seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let snake = Snake::centered(&config);
        let base_speed = config.base_speed();
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            mode: Mode::Classic,
            rules: Mode::Classic.rules(),
            food: snake.head(),
            snake,
            bombs: Vec::new(),
            score: 0,
            foods_eaten: 0,
            lives: config.starting_lives,
            phase: GamePhase::Running,
            base_speed,
            current_speed: base_speed,
            time_remaining: config.initial_time,
            time_allocated: false,
            bomb_spawn_timer: 0.0,
            elapsed: 0.0,
            events: Vec::new(),
            config,
        };
        state.reset(Mode::Classic);
        state
    }

    /// Start a fresh run in `mode`. The RNG stream carries on from the last run.
    pub fn reset(&mut self, mode: Mode) {
        self.mode = mode;
        self.rules = mode.rules();
        self.snake = Snake::centered(&self.config);
        self.bombs.clear();
        self.food = placement::spawn_food(&mut self.rng, &self.config, &self.snake, &self.bombs);
        self.score = 0;
        self.foods_eaten = 0;
        self.phase = GamePhase::Running;
        self.base_speed = self.config.base_speed();
        self.current_speed = self.base_speed;
        self.time_remaining = self.config.initial_time;
        self.time_allocated = false;
        self.lives = self.config.starting_lives;
        self.bomb_spawn_timer = 0.0;
        self.elapsed = 0.0;
        self.events.clear();
        log::info!(
            "New {} run ({:?}, base speed {})",
            mode.as_str(),
            self.config.difficulty,
            self.base_speed
        );
    }

    /// Change difficulty; applies from the next `reset`
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
    }

    /// Buffer a direction for the next tick. Reversing onto the body is ignored.
    pub fn handle_direction_input(&mut self, direction: Direction) {
        if direction.is_opposite(self.snake.direction) {
            return;
        }
        self.snake.pending = direction;
    }

    /// Resolve a collision: lose a life in survival, end the run otherwise
    pub fn handle_collision(&mut self) {
        if !self.rules.lives {
            self.end_run();
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.end_run();
            return;
        }

        self.phase = GamePhase::WaitingForRespawn;
        self.snake = Snake::centered(&self.config);
        // Keep the respawn area clear so the fresh snake never sits on an entity
        let snake = &self.snake;
        self.bombs.retain(|b| !snake.contains(b.cell));
        if self.snake.contains(self.food) {
            self.food =
                placement::spawn_food(&mut self.rng, &self.config, &self.snake, &self.bombs);
        }
        log::info!("Life lost, {} remaining", self.lives);
    }

    /// Resume after a lost life. No-op unless waiting for respawn.
    pub fn respawn(&mut self) {
        if self.phase == GamePhase::WaitingForRespawn {
            self.phase = GamePhase::Running;
            log::debug!("Respawned");
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_waiting_for_respawn(&self) -> bool {
        self.phase == GamePhase::WaitingForRespawn
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn end_run(&mut self) {
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!("Game over ({}): score {}", self.mode.as_str(), self.score);
    }
}
