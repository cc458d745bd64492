//! Snake Chase - a grid Snake arcade game with an autonomous mouse
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, items, snake, mouse, ticks)
//! - `game`: Frame-driven loop that feeds the simulation
//! - `persistence`: High score and control bindings storage
//! - `controls`: Control binding record and key schemes
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance
//! - `ui`: Contracts for the HUD, renderer and overlays

pub mod controls;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use controls::{ControlBindings, ControlScheme, KeyBindings};
pub use game::{Game, GameError, LoopControl};
pub use persistence::Storage;
pub use tuning::Tuning;

/// Game configuration defaults (see [`Tuning`] for the runtime value)
pub mod consts {
    /// Grid side length in cells
    pub const GRID: i32 = 24;

    /// Snake speed in cells per second
    pub const BASE_CPS: f64 = 6.0;
    pub const MAX_CPS: f64 = 16.0;
    pub const MIN_CPS: f64 = 3.0;
    /// Speed gained per point of score
    pub const CPS_INC: f64 = 0.5;

    /// Snake hit points cap (extra lives from oranges)
    pub const MAX_HP: u32 = 3;

    /// Banana slow (snake) / boost (mouse) magnitude in cells per second
    pub const BANANA_SLOW: f64 = 2.0;
    pub const BANANA_BASE_MS: f64 = 3000.0;
    /// Extra slow duration per point of stored high score
    pub const BANANA_PER_HS_MS: f64 = 150.0;
    pub const BANANA_MAX_MS: f64 = 10000.0;

    /// Mouse speed in cells per second
    pub const BASE_MOUSE_CPS: f64 = 4.0;
    pub const MIN_MOUSE_CPS: f64 = 2.0;
    pub const MAX_MOUSE_CPS: f64 = 14.0;

    /// Chebyshev distance at or below which the mouse panics
    pub const MOUSE_ALERT_DIST: i32 = 3;
    /// Score for eating a mouse with no hit points left
    pub const MOUSE_EAT_SCORE: u64 = 5;

    /// Longest frame delta fed to the accumulators (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

    /// Storage keys
    pub const HS_KEY: &str = "snake_highscore_v1";
    pub const CONTROLS_KEY: &str = "snake_controls_v1";
}
