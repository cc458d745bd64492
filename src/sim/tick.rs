//! Discrete simulation steps
//!
//! One snake step and one mouse step, each run at its own cadence by the
//! driver, plus the command handling that moves the phase machine.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Direction;
use super::items::{ConsumeContext, Consumer, Effect};
use super::mouse::{Mouse, Surroundings};
use super::state::{GameEvent, GameOverCause, GamePhase, GameState};

/// Player and overlay commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Turn(Direction),
    /// Begin play from idle
    Start,
    /// Toggle between playing and paused
    Pause,
    /// Fresh run, straight into play
    Restart,
    ToggleWrap,
}

/// Apply a command immediately. Returns whether it changed anything.
pub fn apply_command(state: &mut GameState, command: Command) -> bool {
    match command {
        Command::Turn(dir) => state.snake.request_direction(dir),
        Command::Start => {
            if state.phase != GamePhase::Idle {
                return false;
            }
            state.phase = GamePhase::Playing;
            log::info!("Run started (seed {})", state.seed);
            true
        }
        Command::Pause => match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                true
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                true
            }
            _ => false,
        },
        Command::Restart => {
            state.reset_to_idle();
            state.phase = GamePhase::Playing;
            log::info!("Run restarted");
            true
        }
        Command::ToggleWrap => {
            state.wrap_walls = !state.wrap_walls;
            log::debug!("Wrap walls: {}", state.wrap_walls);
            true
        }
    }
}

/// Advance the snake by one cell
pub fn tick(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.snake.direction = state.snake.pending_direction;
    let mut next = state.snake.head() + state.snake.direction.delta();
    let had_cherry = state.cherry_steps > 0;

    if !state.grid.contains(next) {
        if state.wrap_walls || had_cherry {
            next = state.grid.wrap(next);
            if !state.wrap_walls {
                state.push_event(GameEvent::CherryWrap {
                    consumer: Consumer::Snake,
                });
            }
        } else {
            game_over(state, GameOverCause::Wall);
            return;
        }
    }

    // Eat before the collision check so a pear can carry the head away
    let mut ate = false;
    if let Some(effect) = consume_for_snake(state, next) {
        if let Some(target) = effect.teleport {
            next = target;
        }
        ate = true;
    }

    if let Some(index) = state.snake.collision_index(next) {
        if state.hp > 0 {
            state.hp -= 1;
            state.snake.body.truncate(index);
            log::debug!("Snake bit itself, {} hp left", state.hp);
            state.push_event(GameEvent::LostHp { hp_left: state.hp });
        } else {
            game_over(state, GameOverCause::SelfCollision);
            return;
        }
    }

    state.snake.body.push_front(next);

    if state.mouse.pos == next {
        if state.mouse.hp > 0 {
            state.mouse.hp -= 1;
            let cell = state.spawn_mouse_cell();
            state.mouse.pos = cell;
            state.mouse.cherry_armed = false;
            state.mouse.boost_until_ms = 0.0;
            state.push_event(GameEvent::MouseHit {
                hp_left: state.mouse.hp,
            });
        } else {
            state.score += state.tuning.mouse_eat_score;
            let cell = state.spawn_mouse_cell();
            state.mouse = Mouse::new(cell);
            ate = true;
            log::debug!("Mouse eaten, score {}", state.score);
            state.push_event(GameEvent::MouseEaten);
        }
    }

    if !ate && consume_for_snake(state, next).is_none() {
        state.snake.body.pop_back();
    }

    if had_cherry {
        state.cherry_steps = 0;
    }
}

/// Advance the mouse by one decision
pub fn tick_mouse(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let mv = {
        let view = Surroundings::new(
            state.grid,
            state.wrap_walls,
            &state.snake.body,
            state.items.items(),
            state.tuning.mouse_alert_dist,
        );
        state.mouse.decide(&view, &mut state.rng)
    };
    // Staying put never eats
    if mv == IVec2::ZERO {
        return;
    }

    let Some((mut dest, used_cherry)) =
        state
            .mouse
            .resolve_destination(state.grid, state.wrap_walls, mv)
    else {
        return;
    };
    if state.snake.occupies(dest) {
        return;
    }

    // Spend the wrap before eating so a cherry on the far side re-arms it
    if used_cherry {
        state.mouse.cherry_armed = false;
        state.push_event(GameEvent::CherryWrap {
            consumer: Consumer::Mouse,
        });
    }

    if let Some(target) = consume_for_mouse(state, dest).and_then(|e| e.teleport) {
        if !state.snake.occupies(target) {
            dest = target;
        }
    }
    state.mouse.pos = dest;
}

fn consume_for_snake(state: &mut GameState, cell: IVec2) -> Option<Effect> {
    let blocked = state.snake_cells();
    let ctx = ConsumeContext {
        consumer: Consumer::Snake,
        tuning: &state.tuning,
        high_score: state.high_score,
        wrap: state.wrap_walls,
    };
    let effect = state.items.consume(cell, &ctx, &blocked, &mut state.rng)?;

    state.score += effect.score;
    state.hp = (state.hp + effect.hp).min(state.tuning.max_hp);
    if let Some(slow) = effect.speed {
        state.slow_amount = slow.amount;
        state.slow_until_ms = state.now_ms + slow.duration_ms;
    }
    if effect.arm_wrap {
        state.cherry_steps = 1;
    }
    state.push_event(GameEvent::Ate {
        consumer: Consumer::Snake,
        kind: effect.kind,
    });
    Some(effect)
}

fn consume_for_mouse(state: &mut GameState, cell: IVec2) -> Option<Effect> {
    let mut blocked = state.snake_cells();
    blocked.insert(state.mouse.pos);
    let ctx = ConsumeContext {
        consumer: Consumer::Mouse,
        tuning: &state.tuning,
        high_score: state.high_score,
        wrap: state.wrap_walls,
    };
    let effect = state.items.consume(cell, &ctx, &blocked, &mut state.rng)?;

    state.mouse.hp += effect.hp;
    if let Some(boost) = effect.speed {
        state.mouse.boost_amount = boost.amount;
        state.mouse.boost_until_ms = state.now_ms + boost.duration_ms;
    }
    if effect.arm_wrap {
        state.mouse.cherry_armed = true;
    }
    state.push_event(GameEvent::Ate {
        consumer: Consumer::Mouse,
        kind: effect.kind,
    });
    Some(effect)
}

fn game_over(state: &mut GameState, cause: GameOverCause) {
    state.phase = GamePhase::GameOver;
    log::info!("Game over ({:?}), score {}", cause, state.score);
    state.push_event(GameEvent::GameOver { cause });
}
