//! Random placement of food and bombs on free cells

use glam::IVec2;
use rand::Rng;

use super::state::{Bomb, Cell, Snake};
use crate::tuning::GameConfig;

/// Anything that occupies grid cells
pub trait Occupancy {
    fn occupies(&self, cell: Cell) -> bool;
}

impl Occupancy for Snake {
    fn occupies(&self, cell: Cell) -> bool {
        self.contains(cell)
    }
}

impl Occupancy for Cell {
    fn occupies(&self, cell: Cell) -> bool {
        *self == cell
    }
}

impl Occupancy for &[Bomb] {
    fn occupies(&self, cell: Cell) -> bool {
        self.iter().any(|b| b.cell == cell)
    }
}

impl Occupancy for &[Cell] {
    fn occupies(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }
}

/// Uniformly random cell anywhere on the grid
pub fn random_cell<R: Rng>(rng: &mut R, config: &GameConfig) -> Cell {
    let x = rng.random_range(0..config.columns());
    let y = rng.random_range(0..config.rows());
    IVec2::new(x, y) * config.grid_size
}

/// Random cell within `radius` cells (per axis) of `center`, clamped to the grid
pub fn cell_near<R: Rng>(
    rng: &mut R,
    config: &GameConfig,
    center: Cell,
    radius: i32,
) -> Cell {
    let grid = config.grid_size;
    let offset = IVec2::new(
        rng.random_range(-radius..=radius),
        rng.random_range(-radius..=radius),
    ) * grid;
    let max = IVec2::new(config.screen_width - grid, config.screen_height - grid);
    (center + offset).clamp(IVec2::ZERO, max)
}

/// Draw up to `attempts` candidates and return the first one no exclusion set occupies
pub fn find_free_cell<F>(
    attempts: u32,
    exclusions: &[&dyn Occupancy],
    mut candidate: F,
) -> Option<Cell>
where
    F: FnMut() -> Cell,
{
    (0..attempts)
        .map(|_| candidate())
        .find(|cell| !exclusions.iter().any(|set| set.occupies(*cell)))
}

/// Pick a cell for new food. Falls back to an unchecked draw when the board is crowded.
pub fn spawn_food<R: Rng>(
    rng: &mut R,
    config: &GameConfig,
    snake: &Snake,
    bombs: &[Bomb],
) -> Cell {
    let exclusions: [&dyn Occupancy; 2] = [snake, &bombs];
    let free = find_free_cell(config.food_attempts, &exclusions, || random_cell(rng, config));
    match free {
        Some(cell) => cell,
        None => {
            log::warn!(
                "No free food cell after {} attempts, placing unchecked",
                config.food_attempts
            );
            random_cell(rng, config)
        }
    }
}

/// Pick a cell for a new bomb, biased toward the food. `None` means skip this cycle.
pub fn spawn_bomb<R: Rng>(
    rng: &mut R,
    config: &GameConfig,
    snake: &Snake,
    food: Cell,
    bombs: &[Bomb],
) -> Option<Cell> {
    let exclusions: [&dyn Occupancy; 3] = [snake, &food, &bombs];
    let cell = find_free_cell(config.bomb_attempts, &exclusions, || {
        if rng.random_bool(config.bomb_near_food_chance) {
            cell_near(rng, config, food, config.bomb_near_food_radius)
        } else {
            random_cell(rng, config)
        }
    });
    if cell.is_none() {
        log::debug!("No free bomb cell after {} attempts", config.bomb_attempts);
    }
    cell
}
