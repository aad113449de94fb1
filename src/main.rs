//! Snake Arcade entry point
//!
//! Headless driver: plays seeded runs with a simple autopilot and records the
//! results in the high score file. Rendering lives in a separate frontend.
//!
//! Usage: `snake-arcade [classic|time_attack|survival] [easy|medium|hard] [theme] [seed]`
//!
//! Arguments may come in any order. A difficulty or theme given here is saved
//! to the settings file for the next launch.

use snake_arcade::highscores::ScoreStore;
use snake_arcade::sim::{Cell, Direction, GameEvent, GameState, Mode, Occupancy, Snapshot, tick};
use snake_arcade::{Difficulty, Settings, Theme};

/// Safety cap so a looping autopilot can't run forever
const MAX_FRAMES: u32 = 20_000;

const DEFAULT_SEED: u64 = 0x5EED;

/// Command line choices; `None` keeps the saved setting
#[derive(Debug, Default, PartialEq)]
struct Args {
    mode: Option<Mode>,
    difficulty: Option<Difficulty>,
    theme: Option<Theme>,
    seed: Option<u64>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut parsed = Args::default();
    for arg in args {
        if let Some(mode) = Mode::from_str(&arg) {
            parsed.mode = Some(mode);
        } else if let Some(difficulty) = Difficulty::from_str(&arg) {
            parsed.difficulty = Some(difficulty);
        } else if let Some(theme) = Theme::from_str(&arg) {
            parsed.theme = Some(theme);
        } else if let Ok(seed) = arg.parse() {
            parsed.seed = Some(seed);
        } else {
            return Err(format!("Unrecognized argument '{arg}'"));
        }
    }
    Ok(parsed)
}

fn main() {
    env_logger::init();
    log::info!("Snake Arcade (headless) starting...");

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("Usage: snake-arcade [mode] [difficulty] [theme] [seed]");
            std::process::exit(2);
        }
    };
    let modes: Vec<Mode> = args.mode.map_or_else(|| Mode::ALL.to_vec(), |mode| vec![mode]);
    let seed = args.seed.unwrap_or(DEFAULT_SEED);

    let mut settings = Settings::load();
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    let config = settings.game_config();
    if let Err(err) = config.validate() {
        eprintln!("Invalid game config: {err}");
        std::process::exit(1);
    }
    let mut scores = ScoreStore::load();
    let mut game = GameState::new(config, seed);

    log::info!("Seed {seed}, {} difficulty", settings.difficulty.as_str());
    log::info!("Theme {}, scores in {}", settings.theme.as_str(), scores.path().display());

    for mode in modes {
        let score = play(&mut game, mode);
        match scores.update_if_higher(mode, score) {
            Ok(true) => println!("{}: {} (new best!)", mode.as_str(), score),
            Ok(false) => println!("{}: {} (best {})", mode.as_str(), score, scores.best(mode)),
            Err(err) => {
                log::warn!("Could not save high score: {err}");
                println!("{}: {}", mode.as_str(), score);
            }
        }
    }

    settings.high_scores = *scores.scores();
    if let Err(err) = settings.save() {
        log::warn!("Could not save settings: {err}");
    }
}

/// Play one run to completion and return the final score
fn play(game: &mut GameState, mode: Mode) -> u64 {
    game.reset(mode);
    let mut frames = 0;
    loop {
        let snap = game.snapshot();
        if snap.game_over || frames >= MAX_FRAMES {
            return snap.score;
        }
        if snap.waiting_for_respawn {
            game.respawn();
            continue;
        }

        if let Some(direction) = autopilot(&snap) {
            game.handle_direction_input(direction);
        }
        // One move per frame at the current speed
        tick(game, 1.0 / snap.current_speed);
        frames += 1;

        for event in game.drain_events() {
            match event {
                GameEvent::LifeLost { lives_left } => {
                    log::debug!("Autopilot crashed, {lives_left} lives left")
                }
                GameEvent::TimeUp => log::debug!("Autopilot ran out of time"),
                _ => {}
            }
        }
    }
}

/// Steer toward the food, preferring moves that don't hit anything next tick
fn autopilot(snap: &Snapshot) -> Option<Direction> {
    let head = *snap.snake.first()?;
    let delta = snap.food - head;
    let mut preferred = Vec::with_capacity(4);
    if delta.x > 0 {
        preferred.push(Direction::Right);
    } else if delta.x < 0 {
        preferred.push(Direction::Left);
    }
    if delta.y > 0 {
        preferred.push(Direction::Down);
    } else if delta.y < 0 {
        preferred.push(Direction::Up);
    }
    for direction in Direction::ALL {
        if !preferred.contains(&direction) {
            preferred.push(direction);
        }
    }

    let snake: &[Cell] = &snap.snake;
    let bombs: &[Cell] = &snap.bombs;
    let obstacles: [&dyn Occupancy; 2] = [&snake, &bombs];
    preferred.into_iter().find(|direction| {
        let next = head + direction.to_ivec2() * snap.grid_size;
        let blocked = obstacles.iter().any(|set| set.occupies(next));
        let off_screen = next.x < 0
            || next.y < 0
            || next.x >= snap.screen_width
            || next.y >= snap.screen_height;
        !blocked && !(off_screen && snap.mode == Mode::Survival)
    })
}
