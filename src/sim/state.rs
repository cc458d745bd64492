//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; the driver only
//! feeds it time and commands.

use std::collections::HashSet;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::Grid;
use super::items::{Consumer, ItemKind, ItemRegistry};
use super::mouse::Mouse;
use super::snake::Snake;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Board laid out, waiting for the first play
    Idle,
    /// Ticks running
    Playing,
    /// Ticks suspended by the player
    Paused,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Left the board with solid walls and no cherry step
    Wall,
    /// Bit itself with no hit points left
    SelfCollision,
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Ate { consumer: Consumer, kind: ItemKind },
    /// Snake bit itself and spent a hit point
    LostHp { hp_left: u32 },
    /// Snake caught a mouse that still had hit points
    MouseHit { hp_left: u32 },
    /// Snake ate the mouse
    MouseEaten,
    /// A cherry step carried someone through a solid wall
    CherryWrap { consumer: Consumer },
    GameOver { cause: GameOverCause },
}

/// Broken simulation invariant (treated as a fatal fault)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("snake length {len} outside 1..={max}")]
    SnakeLength { len: usize, max: usize },
    #[error("expected exactly one apple, found {0}")]
    AppleCount(usize),
    #[error("invalid special items on board: {0}")]
    Specials(String),
    #[error("hit points {hp} exceed cap {max}")]
    HitPoints { hp: u32, max: u32 },
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub grid: Grid,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,

    pub score: u64,
    /// Snake hit points (0..=max_hp)
    pub hp: u32,
    /// Banana slow in cells per second, active until `slow_until_ms`
    pub slow_amount: f64,
    pub slow_until_ms: f64,
    /// One-step wall pass for the snake (0 or 1)
    pub cherry_steps: u32,
    pub wrap_walls: bool,
    /// Stored best score, used for banana duration and the HUD
    pub high_score: u64,
    /// Timestamp of the current frame (ms)
    pub now_ms: f64,

    pub snake: Snake,
    pub mouse: Mouse,
    pub items: ItemRegistry,

    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game. `tuning` is expected to be validated.
    pub fn new(tuning: Tuning, seed: u64, high_score: u64) -> Self {
        let grid = Grid::new(tuning.grid);
        let center = IVec2::splat(grid.size / 2);
        let mut state = Self {
            tuning,
            grid,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            hp: 0,
            slow_amount: 0.0,
            slow_until_ms: 0.0,
            cherry_steps: 0,
            wrap_walls: false,
            high_score,
            now_ms: 0.0,
            snake: Snake::new(center),
            mouse: Mouse::new(IVec2::ZERO),
            items: ItemRegistry::new(grid),
            events: Vec::new(),
        };
        state.reset_to_idle();
        state
    }

    /// Back to the start layout; wrap mode and high score are kept
    pub fn reset_to_idle(&mut self) {
        let center = IVec2::splat(self.grid.size / 2);
        self.snake.reset(center);
        self.score = 0;
        self.hp = 0;
        self.slow_amount = 0.0;
        self.slow_until_ms = 0.0;
        self.cherry_steps = 0;
        self.items.clear();
        let blocked = self.snake_cells();
        self.items.ensure_apple(&blocked, &mut self.rng);
        let cell = self.spawn_mouse_cell();
        self.mouse = Mouse::new(cell);
        self.phase = GamePhase::Idle;
        self.events.clear();
    }

    /// Cells covered by the snake
    pub fn snake_cells(&self) -> HashSet<IVec2> {
        self.snake.body.iter().copied().collect()
    }

    /// A random cell clear of the snake and items
    pub fn spawn_mouse_cell(&mut self) -> IVec2 {
        let blocked = self.snake_cells();
        self.items.spawn_at_empty(&blocked, &mut self.rng)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Snake speed from score alone
    pub fn base_cps(&self) -> f64 {
        self.tuning.base_cps_for_score(self.score)
    }

    /// Banana slow currently in effect
    pub fn active_slow(&self) -> f64 {
        if self.now_ms < self.slow_until_ms {
            self.slow_amount
        } else {
            0.0
        }
    }

    pub fn slow_remaining_ms(&self) -> f64 {
        (self.slow_until_ms - self.now_ms).max(0.0)
    }

    /// Effective snake ticks per second
    pub fn snake_cps(&self) -> f64 {
        self.tuning.min_cps.max(self.base_cps() - self.active_slow())
    }

    /// Effective mouse ticks per second
    pub fn mouse_cps(&self) -> f64 {
        (self.tuning.base_mouse_cps + self.mouse.active_boost(self.now_ms))
            .clamp(self.tuning.min_mouse_cps, self.tuning.max_mouse_cps)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Verify the board-level invariants
    pub fn check_invariants(&self) -> Result<(), SimError> {
        let max = self.grid.cell_count();
        let len = self.snake.len();
        if len == 0 || len > max {
            return Err(SimError::SnakeLength { len, max });
        }

        if self.hp > self.tuning.max_hp {
            return Err(SimError::HitPoints {
                hp: self.hp,
                max: self.tuning.max_hp,
            });
        }

        let apples = self.items.apple_count();
        if apples != 1 {
            return Err(SimError::AppleCount(apples));
        }

        let specials: Vec<ItemKind> = self
            .items
            .items()
            .iter()
            .map(|it| it.kind)
            .filter(|k| k.is_special())
            .collect();
        match specials.as_slice() {
            [] => {}
            [ItemKind::Pear { .. }] => {
                return Err(SimError::Specials("unpaired pear".to_string()));
            }
            [_] => {}
            [ItemKind::Pear { pair_id: a }, ItemKind::Pear { pair_id: b }] if a == b => {}
            other => {
                return Err(SimError::Specials(format!("{:?}", other)));
            }
        }
        Ok(())
    }
}
