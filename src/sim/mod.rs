//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only; the driver decides when they happen
//! - Seeded RNG only
//! - Stable iteration order (items by ID, neighbours in a fixed order)
//! - No rendering, storage or platform dependencies

pub mod clock;
pub mod grid;
pub mod items;
pub mod mouse;
pub mod snake;
pub mod state;
pub mod tick;

pub use clock::TickAccumulator;
pub use grid::{Direction, Grid, NEIGHBOURS_8};
pub use items::{Consumer, Effect, Item, ItemKind, ItemRegistry, SpecialKind};
pub use mouse::{Mouse, Surroundings, path_step_to_nearest_item};
pub use snake::Snake;
pub use state::{GameEvent, GameOverCause, GamePhase, GameState, SimError};
pub use tick::{Command, apply_command, tick, tick_mouse};
