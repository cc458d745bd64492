//! Frontend that logs instead of drawing
//!
//! Used by the native demo and by tests, which inspect what was shown.

use super::{FrameView, Frontend, FrontendError, GameOverSummary, HudSnapshot};

#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    pub frames: u64,
    pub last_hud: Option<HudSnapshot>,
    pub hints: Vec<String>,
    pub start_shown: bool,
    pub game_over: Option<GameOverSummary>,
    pub errors: Vec<String>,
    /// Make the next `render` fail (fault injection)
    pub fail_next_render: bool,
}

impl HeadlessFrontend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontend for HeadlessFrontend {
    fn hud(&mut self, hud: &HudSnapshot) -> Result<(), FrontendError> {
        if self.last_hud.as_ref() != Some(hud) {
            log::trace!(
                "HUD score={} best={} hp={} speed={} slow={}",
                hud.score,
                hud.high_score,
                hud.hp,
                hud.speed,
                hud.slow
            );
        }
        self.last_hud = Some(hud.clone());
        Ok(())
    }

    fn render(&mut self, _frame: &FrameView<'_>) -> Result<(), FrontendError> {
        if std::mem::take(&mut self.fail_next_render) {
            return Err(FrontendError("render target lost".to_string()));
        }
        self.frames += 1;
        Ok(())
    }

    fn show_start(&mut self, wrap_walls: bool) -> Result<(), FrontendError> {
        log::info!("Ready (wrap {})", if wrap_walls { "on" } else { "off" });
        self.start_shown = true;
        Ok(())
    }

    fn show_hint(&mut self, text: &str) -> Result<(), FrontendError> {
        log::info!("{}", text);
        self.hints.push(text.to_string());
        Ok(())
    }

    fn show_game_over(&mut self, summary: &GameOverSummary) -> Result<(), FrontendError> {
        log::info!(
            "Game over: score {} (best {}), hp {}",
            summary.score,
            summary.best,
            summary.hp
        );
        self.game_over = Some(summary.clone());
        Ok(())
    }

    fn clear_overlays(&mut self) -> Result<(), FrontendError> {
        self.start_shown = false;
        self.game_over = None;
        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        log::error!("{}", message);
        self.errors.push(message.to_string());
    }
}
