//! Presentation contracts
//!
//! The driver pushes plain snapshots through [`Frontend`]; drawing, DOM work
//! and overlay styling belong to the implementor.

pub mod frame;
pub mod headless;
pub mod hud;

pub use frame::FrameView;
pub use headless::HeadlessFrontend;
pub use hud::{GameOverSummary, HudSnapshot, slow_text, speed_text};

use thiserror::Error;

/// A presentation call failed; the driver treats this as fatal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("frontend error: {0}")]
pub struct FrontendError(pub String);

/// HUD, renderer and overlay sink
pub trait Frontend {
    /// Per-frame HUD values
    fn hud(&mut self, hud: &HudSnapshot) -> Result<(), FrontendError>;

    /// Per-frame board drawing
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), FrontendError>;

    /// Start screen offering play and the wrap toggle
    fn show_start(&mut self, wrap_walls: bool) -> Result<(), FrontendError>;

    /// Short-lived message
    fn show_hint(&mut self, text: &str) -> Result<(), FrontendError>;

    /// End-of-run summary offering restart and the wrap toggle
    fn show_game_over(&mut self, summary: &GameOverSummary) -> Result<(), FrontendError>;

    fn clear_overlays(&mut self) -> Result<(), FrontendError> {
        Ok(())
    }

    /// Fatal fault report. Called at most once per session.
    fn show_error(&mut self, message: &str);
}
