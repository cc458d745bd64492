//! Snake Chase entry point
//!
//! Native builds run a headless demo: a greedy autopilot plays one game on a
//! simulated 60 Hz clock, then the final board and score are printed.
//! Browser hosts drive [`snake_chase::Game`] directly through the library.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::IVec2;
    use snake_chase::persistence::{FileBackend, Storage};
    use snake_chase::sim::grid::torus_delta;
    use snake_chase::sim::{Command, Direction, GamePhase, GameState};
    use snake_chase::ui::{FrameView, HeadlessFrontend};
    use snake_chase::{ControlBindings, Game, LoopControl, Tuning, platform};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Five simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    struct Options {
        seed: Option<u64>,
        store: PathBuf,
        tuning: Option<PathBuf>,
        wrap: bool,
    }

    fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
        args.next().ok_or_else(|| format!("{} needs a value", flag))
    }

    fn parse_args() -> Result<Options, Box<dyn Error>> {
        let mut opts = Options {
            seed: None,
            store: std::env::temp_dir().join("snake-chase.json"),
            tuning: None,
            wrap: false,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => opts.seed = Some(next_value(&mut args, "--seed")?.parse()?),
                "--store" => opts.store = next_value(&mut args, "--store")?.into(),
                "--tuning" => opts.tuning = Some(next_value(&mut args, "--tuning")?.into()),
                "--wrap" => opts.wrap = true,
                other => return Err(format!("unknown argument: {}", other).into()),
            }
        }
        Ok(opts)
    }

    fn distance(state: &GameState, a: IVec2, b: IVec2) -> i32 {
        let n = state.grid.size;
        if state.wrap_walls {
            torus_delta(a.x, b.x, n) + torus_delta(a.y, b.y, n)
        } else {
            (a.x - b.x).abs() + (a.y - b.y).abs()
        }
    }

    /// Greedy autopilot: the legal, non-fatal heading that gets closest to
    /// the nearest item or the mouse
    fn steer(state: &GameState) -> Option<Direction> {
        let head = state.snake.head();
        let targets = state
            .items
            .items()
            .iter()
            .map(|it| it.pos)
            .chain(std::iter::once(state.mouse.pos));
        let target = targets.min_by_key(|&p| distance(state, head, p))?;

        Direction::ALL
            .iter()
            .copied()
            .filter(|d| state.snake.len() == 1 || !d.is_opposite(state.snake.direction))
            .filter_map(|d| {
                let next = state
                    .grid
                    .wrap_or_reject(head + d.delta(), state.wrap_walls)?;
                if state.snake.occupies(next) {
                    return None;
                }
                Some((d, distance(state, next, target)))
            })
            .min_by_key(|&(_, dist)| dist)
            .map(|(d, _)| d)
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        platform::init_logging();
        let opts = parse_args()?;

        let tuning = match &opts.tuning {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };
        let seed = opts.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let storage = Storage::new(FileBackend::new(&opts.store));
        let mut game = Game::new(tuning, seed, storage)?;
        if !game.has_saved_controls() {
            game.set_controls(ControlBindings::default());
        }

        let mut ui = HeadlessFrontend::new();
        if opts.wrap {
            game.handle_command(Command::ToggleWrap, &mut ui);
        }
        game.open(&mut ui);
        game.handle_command(Command::Start, &mut ui);

        let mut now = 0.0;
        for _ in 0..MAX_FRAMES {
            if let Some(dir) = steer(game.state()) {
                if dir != game.state().snake.pending_direction {
                    game.handle_command(Command::Turn(dir), &mut ui);
                }
            }
            if game.frame(now, &mut ui) == LoopControl::Halt {
                break;
            }
            if game.state().phase == GamePhase::GameOver {
                break;
            }
            now += FRAME_MS;
        }

        print!("{}", FrameView::from_state(game.state()).to_ascii());
        match &ui.game_over {
            Some(summary) => println!(
                "Game over: score {} (best {}), hp {}",
                summary.score, summary.best, summary.hp
            ),
            None => println!(
                "Stopped after {} frames: score {}",
                ui.frames,
                game.state().score
            ),
        }

        if let Some(err) = ui.errors.first() {
            return Err(err.clone().into());
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = demo::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host owns the frame loop; see `snake_chase::Game`
}
