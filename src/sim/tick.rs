//! Per-tick simulation step
//!
//! Advances the snake one cell and applies the mode rules. The caller decides
//! how often to tick (normally `current_speed` times per second).

use super::placement;
use super::state::{Bomb, Boundary, Cell, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Advance the game by one move. `dt` is the time since the previous tick, in seconds.
pub fn tick(state: &mut GameState, dt: f32) {
    // Don't tick while waiting for respawn or after game over
    if state.phase != GamePhase::Running {
        return;
    }

    state.elapsed += dt;

    if state.rules.countdown {
        if !state.time_allocated {
            allocate_food_time(state);
        }
        state.time_remaining -= dt;
        if state.time_remaining <= 0.0 {
            state.push_event(GameEvent::TimeUp);
            state.end_run();
            return;
        }
    }

    if state.rules.hazards {
        update_hazards(state, dt);
    }

    state.snake.direction = state.snake.pending;
    let step = state.snake.direction.to_ivec2() * state.config.grid_size;
    let mut new_head = state.snake.head() + step;

    match state.rules.boundary {
        Boundary::Wrap => new_head = wrap_cell(new_head, state),
        Boundary::Solid => {
            if !in_bounds(new_head, state) {
                state.handle_collision();
                return;
            }
        }
    }

    if state.snake.contains(new_head) {
        state.handle_collision();
        return;
    }

    if state.rules.hazards && state.bombs.iter().any(|b| b.cell == new_head) {
        state.handle_collision();
        state.bombs.retain(|b| b.cell != new_head);
        return;
    }

    state.snake.push_head(new_head);

    if new_head == state.food {
        eat_food(state);
    } else {
        state.snake.pop_tail();
    }
}

/// Time granted for a food at `distance` from the head, before length scaling.
/// Quadratic in the normalized distance: food on the head gets `min_time`, food a
/// full screen diagonal away gets `max_time`.
pub fn time_for_distance(distance: f32, diagonal: f32, min_time: f32, max_time: f32) -> f32 {
    let normalized = (distance / diagonal).clamp(0.0, 1.0);
    min_time + (max_time - min_time) * normalized * normalized
}

/// Multiplier applied to allocated time as the snake grows (floored at 0.5)
pub fn length_time_scale(snake_len: usize) -> f32 {
    (1.0 - snake_len as f32 / TIME_SCALE_LENGTH).max(MIN_TIME_SCALE)
}

/// Seconds between bomb spawn attempts; shrinks as more food is eaten
pub fn bomb_spawn_interval(foods_eaten: u32) -> f32 {
    (BOMB_INTERVAL_START - foods_eaten as f32 / BOMB_INTERVAL_FOODS_PER_SECOND)
        .max(BOMB_INTERVAL_MIN)
}

fn allocate_food_time(state: &mut GameState) {
    let config = &state.config;
    let distance = (state.food - state.snake.head()).as_vec2().length();
    let base = time_for_distance(
        distance,
        config.diagonal(),
        config.min_time,
        config.max_time,
    );
    state.time_remaining = base * length_time_scale(state.snake.len());
    state.time_allocated = true;
    log::debug!(
        "Allocated {:.2}s for food at distance {:.0}",
        state.time_remaining,
        distance
    );
}

fn update_hazards(state: &mut GameState, dt: f32) {
    let now = state.elapsed;
    let lifetime = state.config.bomb_lifetime;
    let (expired, alive): (Vec<Bomb>, Vec<Bomb>) = std::mem::take(&mut state.bombs)
        .into_iter()
        .partition(|b| b.age(now) >= lifetime);
    state.bombs = alive;
    for bomb in expired {
        log::debug!("Bomb at {} expired", bomb.cell);
        state.push_event(GameEvent::BombExpired { cell: bomb.cell });
    }

    state.bomb_spawn_timer += dt;
    if state.bomb_spawn_timer > bomb_spawn_interval(state.foods_eaten) {
        let cell = placement::spawn_bomb(
            &mut state.rng,
            &state.config,
            &state.snake,
            state.food,
            &state.bombs,
        );
        if let Some(cell) = cell {
            state.bombs.push(Bomb {
                cell,
                spawned_at: now,
            });
            log::debug!("Bomb spawned at {}", cell);
            state.push_event(GameEvent::BombSpawned { cell });
        }
        state.bomb_spawn_timer = 0.0;
    }
}

fn eat_food(state: &mut GameState) {
    state.score += SCORE_PER_FOOD;
    state.foods_eaten += 1;
    state.current_speed = (state.base_speed
        + state.foods_eaten as f32 * state.config.speed_increment)
        .min(state.config.max_speed);
    state.food = placement::spawn_food(
        &mut state.rng,
        &state.config,
        &state.snake,
        &state.bombs,
    );
    if state.rules.countdown {
        state.time_allocated = false;
    }
    state.push_event(GameEvent::FoodEaten { score: state.score });
}

fn in_bounds(cell: Cell, state: &GameState) -> bool {
    cell.x >= 0
        && cell.y >= 0
        && cell.x < state.config.screen_width
        && cell.y < state.config.screen_height
}

/// Toroidal wrap: leaving one edge enters at the opposite edge, same row/column
fn wrap_cell(cell: Cell, state: &GameState) -> Cell {
    let grid = state.config.grid_size;
    let width = state.config.screen_width;
    let height = state.config.screen_height;
    let mut wrapped = cell;
    if wrapped.x < 0 {
        wrapped.x = width - grid;
    } else if wrapped.x >= width {
        wrapped.x = 0;
    }
    if wrapped.y < 0 {
        wrapped.y = height - grid;
    } else if wrapped.y >= height {
        wrapped.y = 0;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Direction, Mode, Snake};
    use crate::tuning::GameConfig;
    use glam::IVec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 12.0;

    fn new_game(mode: Mode, seed: u64) -> GameState {
        let mut state = GameState::new(GameConfig::default(), seed);
        state.reset(mode);
        state
    }

    /// Move the food somewhere the snake won't reach in a few ticks
    fn park_food(state: &mut GameState) {
        state.food = IVec2::new(0, 0);
    }

    /// Replace the snake with a straight 3-cell body whose head is at `head`
    fn place_snake(state: &mut GameState, head: Cell, direction: Direction) {
        let back = -direction.to_ivec2() * state.config.grid_size;
        state.snake = Snake::from_cells([head, head + back, head + back * 2], direction);
    }

    fn head_wraps(direction: Direction, from: Cell, expected: Cell) {
        let mut state = new_game(Mode::Classic, 11);
        state.food = IVec2::new(300, 300);
        place_snake(&mut state, from, direction);
        tick(&mut state, DT);
        assert!(!state.is_game_over());
        assert_eq!(state.snake.head(), expected);
    }

    #[test]
    fn test_tick_moves_snake_one_cell() {
        let mut state = new_game(Mode::Classic, 1);
        park_food(&mut state);
        let head = state.snake.head();
        tick(&mut state, DT);
        assert_eq!(state.snake.head(), head + IVec2::new(20, 0));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_pending_direction_committed_on_tick() {
        let mut state = new_game(Mode::Classic, 1);
        park_food(&mut state);
        let head = state.snake.head();
        state.handle_direction_input(Direction::Up);
        assert_eq!(state.snake.direction, Direction::Right);
        tick(&mut state, DT);
        assert_eq!(state.snake.direction, Direction::Up);
        assert_eq!(state.snake.head(), head + IVec2::new(0, -20));
    }

    #[test]
    fn test_two_presses_in_one_tick_cannot_reverse() {
        let mut state = new_game(Mode::Classic, 1);
        park_food(&mut state);
        // Up then Left within one tick: Left is the reverse of Right and is dropped
        state.handle_direction_input(Direction::Up);
        state.handle_direction_input(Direction::Left);
        tick(&mut state, DT);
        assert!(!state.is_game_over());
        assert_eq!(state.snake.direction, Direction::Up);
    }

    #[test]
    fn test_classic_wraps_all_edges() {
        head_wraps(Direction::Right, IVec2::new(1180, 200), IVec2::new(0, 200));
        head_wraps(Direction::Left, IVec2::new(0, 200), IVec2::new(1180, 200));
        head_wraps(Direction::Down, IVec2::new(400, 780), IVec2::new(400, 0));
        head_wraps(Direction::Up, IVec2::new(400, 0), IVec2::new(400, 780));
    }

    #[test]
    fn test_time_attack_wraps_too() {
        let mut state = new_game(Mode::TimeAttack, 2);
        state.food = IVec2::new(300, 300);
        place_snake(&mut state, IVec2::new(1180, 100), Direction::Right);
        tick(&mut state, DT);
        assert_eq!(state.snake.head(), IVec2::new(0, 100));
    }

    #[test]
    fn test_self_collision_ends_classic() {
        let mut state = new_game(Mode::Classic, 3);
        park_food(&mut state);
        // A hook: head at (100,100) turning down into its own body
        state.snake = Snake::from_cells(
            [
                IVec2::new(100, 100),
                IVec2::new(120, 100),
                IVec2::new(120, 120),
                IVec2::new(100, 120),
                IVec2::new(80, 120),
            ],
            Direction::Left,
        );
        state.handle_direction_input(Direction::Down);
        tick(&mut state, DT);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_eating_food() {
        let mut state = new_game(Mode::Classic, 4);
        let head = state.snake.head();
        state.food = head + IVec2::new(20, 0);
        tick(&mut state, DT);
        assert_eq!(state.score, 10);
        assert_eq!(state.foods_eaten, 1);
        assert_eq!(state.snake.len(), 4);
        assert!(!state.snake.contains(state.food));
        assert!((state.current_speed - 12.2).abs() < 1e-4);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::FoodEaten { score: 10 }]
        ));
    }

    #[test]
    fn test_speed_capped_at_max() {
        let mut state = new_game(Mode::Classic, 5);
        state.foods_eaten = 500;
        state.food = state.snake.head() + IVec2::new(20, 0);
        tick(&mut state, DT);
        assert_eq!(state.current_speed, 30.0);
    }

    #[test]
    fn test_survival_wall_with_two_lives() {
        let mut state = new_game(Mode::Survival, 6);
        state.food = IVec2::new(300, 300);
        state.lives = 2;
        place_snake(&mut state, IVec2::new(1180, 200), Direction::Right);
        tick(&mut state, DT);
        assert!(state.is_waiting_for_respawn());
        assert!(!state.is_game_over());
        assert_eq!(state.lives, 1);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), IVec2::new(600, 400));
        assert_eq!(state.snake.direction, Direction::Right);

        // Frozen until respawn
        let head = state.snake.head();
        tick(&mut state, DT);
        assert_eq!(state.snake.head(), head);
        state.respawn();
        tick(&mut state, DT);
        assert_eq!(state.snake.head(), head + IVec2::new(20, 0));
    }

    #[test]
    fn test_survival_wall_with_last_life() {
        let mut state = new_game(Mode::Survival, 7);
        state.food = IVec2::new(300, 300);
        state.lives = 1;
        place_snake(&mut state, IVec2::new(200, 0), Direction::Up);
        tick(&mut state, DT);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_survival_bomb_hit_removes_bomb() {
        let mut state = new_game(Mode::Survival, 8);
        park_food(&mut state);
        let target = state.snake.head() + IVec2::new(20, 0);
        state.bombs.push(Bomb {
            cell: target,
            spawned_at: 0.0,
        });
        tick(&mut state, DT);
        assert_eq!(state.lives, 2);
        assert!(state.is_waiting_for_respawn());
        assert!(state.bombs.iter().all(|b| b.cell != target));
    }

    #[test]
    fn test_bombs_expire_after_lifetime() {
        let mut state = new_game(Mode::Survival, 9);
        park_food(&mut state);
        state.bombs.push(Bomb {
            cell: IVec2::new(1000, 20),
            spawned_at: 0.0,
        });
        state.bomb_spawn_timer = f32::NEG_INFINITY;
        tick(&mut state, 9.5);
        assert_eq!(state.bombs.len(), 1);
        tick(&mut state, 0.5);
        assert!(state.bombs.is_empty());
        assert!(state
            .drain_events()
            .contains(&GameEvent::BombExpired {
                cell: IVec2::new(1000, 20)
            }));
    }

    #[test]
    fn test_bomb_spawns_after_interval() {
        let mut state = new_game(Mode::Survival, 10);
        park_food(&mut state);
        tick(&mut state, 3.0);
        assert!(state.bombs.is_empty());
        tick(&mut state, 3.0);
        // 6.0 is not strictly past the 6 second interval
        assert!(state.bombs.is_empty());
        tick(&mut state, 0.1);
        assert_eq!(state.bombs.len(), 1);
        assert_eq!(state.bomb_spawn_timer, 0.0);
        let bomb = state.bombs[0];
        assert!(!state.snake.contains(bomb.cell));
        assert_ne!(bomb.cell, state.food);
    }

    #[test]
    fn test_no_bombs_outside_survival() {
        let mut state = new_game(Mode::Classic, 12);
        park_food(&mut state);
        for _ in 0..5 {
            tick(&mut state, 5.0);
        }
        assert!(state.bombs.is_empty());
    }

    #[test]
    fn test_bomb_interval_shrinks() {
        assert_eq!(bomb_spawn_interval(0), 6.0);
        assert_eq!(bomb_spawn_interval(20), 4.0);
        assert_eq!(bomb_spawn_interval(40), 2.0);
        assert_eq!(bomb_spawn_interval(100), 2.0);
    }

    #[test]
    fn test_time_allocation_bounds() {
        let config = GameConfig::default();
        let diagonal = config.diagonal();
        assert_eq!(time_for_distance(0.0, diagonal, 5.0, 60.0), 5.0);
        assert!((time_for_distance(diagonal, diagonal, 5.0, 60.0) - 60.0).abs() < 1e-4);
        let halfway = time_for_distance(diagonal / 2.0, diagonal, 5.0, 60.0);
        assert!((halfway - (5.0 + 55.0 * 0.25)).abs() < 1e-4);
        assert!((length_time_scale(3) - 0.94).abs() < 1e-6);
        assert_eq!(length_time_scale(25), 0.5);
        assert_eq!(length_time_scale(40), 0.5);
    }

    #[test]
    fn test_time_attack_allocates_once_per_food() {
        let mut state = new_game(Mode::TimeAttack, 13);
        state.food = IVec2::new(0, 0);
        tick(&mut state, DT);
        assert!(state.time_allocated);
        let allocated = state.time_remaining + DT;
        let distance = (IVec2::new(0, 0) - IVec2::new(600, 400)).as_vec2().length();
        let expected =
            time_for_distance(distance, state.config.diagonal(), 5.0, 60.0) * length_time_scale(3);
        assert!((allocated - expected).abs() < 1e-3);

        let before = state.time_remaining;
        tick(&mut state, DT);
        assert!((state.time_remaining - (before - DT)).abs() < 1e-5);
    }

    #[test]
    fn test_time_attack_timeout() {
        let mut state = new_game(Mode::TimeAttack, 14);
        park_food(&mut state);
        let head = state.snake.head();
        tick(&mut state, 1000.0);
        assert!(state.is_game_over());
        // No movement on the timeout tick
        assert_eq!(state.snake.head(), head);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::TimeUp);
    }

    #[test]
    fn test_time_attack_reallocates_after_eating() {
        let mut state = new_game(Mode::TimeAttack, 15);
        state.food = state.snake.head() + IVec2::new(20, 0);
        tick(&mut state, DT);
        assert_eq!(state.score, 10);
        assert!(!state.time_allocated);
        tick(&mut state, DT);
        assert!(state.time_allocated);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = new_game(Mode::Classic, 16);
        state.handle_collision();
        let head = state.snake.head();
        tick(&mut state, DT);
        assert_eq!(state.snake.head(), head);
        assert!(state.is_game_over());
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    fn mode_strategy() -> impl Strategy<Value = Mode> {
        prop::sample::select(Mode::ALL.to_vec())
    }

    fn assert_entities_valid(state: &GameState) {
        let config = &state.config;
        let on_grid = |c: Cell| {
            c.x >= 0
                && c.y >= 0
                && c.x < config.screen_width
                && c.y < config.screen_height
                && c.x % config.grid_size == 0
                && c.y % config.grid_size == 0
        };
        assert!(state.snake.iter().all(|c| on_grid(*c)));
        assert!(on_grid(state.food));
        assert!(!state.snake.contains(state.food));
        for (i, bomb) in state.bombs.iter().enumerate() {
            assert!(on_grid(bomb.cell));
            assert!(!state.snake.contains(bomb.cell));
            assert_ne!(bomb.cell, state.food);
            assert!(state.bombs[i + 1..].iter().all(|b| b.cell != bomb.cell));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_speed_monotonic_and_capped(
            seed in any::<u64>(),
            inputs in prop::collection::vec(direction_strategy(), 1..300),
        ) {
            let mut state = new_game(Mode::Classic, seed);
            let mut last_speed = state.current_speed;
            for direction in inputs {
                state.handle_direction_input(direction);
                tick(&mut state, DT);
                prop_assert!(state.current_speed >= last_speed);
                prop_assert!(state.current_speed <= state.config.max_speed);
                last_speed = state.current_speed;
                if state.is_game_over() {
                    break;
                }
            }
        }

        #[test]
        fn prop_entities_stay_disjoint(
            mode in mode_strategy(),
            seed in any::<u64>(),
            inputs in prop::collection::vec(direction_strategy(), 1..300),
        ) {
            let mut state = new_game(mode, seed);
            for direction in inputs {
                state.handle_direction_input(direction);
                tick(&mut state, 0.5);
                state.respawn();
                assert_entities_valid(&state);
                if state.is_game_over() {
                    break;
                }
            }
        }

        #[test]
        fn prop_reverse_never_changes_pending(
            first in direction_strategy(),
        ) {
            let mut state = new_game(Mode::Classic, 0);
            park_food(&mut state);
            state.handle_direction_input(first);
            tick(&mut state, DT);
            let current = state.snake.direction;
            let pending = state.snake.pending;
            state.handle_direction_input(current.opposite());
            prop_assert_eq!(state.snake.pending, pending);
        }
    }
}
