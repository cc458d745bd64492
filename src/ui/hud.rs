//! HUD values and their text formatting

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Everything the HUD shows each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub high_score: u64,
    pub hp: u32,
    /// e.g. "1.5x", or "1.5x (×0.78)" while slowed
    pub speed: String,
    /// Remaining slow time, e.g. "2.3s"
    pub slow: String,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let base = state.base_cps();
        Self {
            score: state.score,
            high_score: state.high_score.max(state.score),
            hp: state.hp,
            speed: speed_text(base / state.tuning.base_cps, state.snake_cps() / base),
            slow: slow_text(state.slow_remaining_ms()),
        }
    }
}

/// Speed tier relative to the starting speed, plus the slow factor when
/// one applies (`effect` is capped at 1)
pub fn speed_text(base_factor: f64, effect: f64) -> String {
    let effect = effect.min(1.0);
    if effect < 1.0 {
        format!("{:.1}x (×{:.2})", base_factor, effect)
    } else {
        format!("{:.1}x", base_factor)
    }
}

pub fn slow_text(remaining_ms: f64) -> String {
    format!("{:.1}s", remaining_ms.max(0.0) / 1000.0)
}

/// Game-over overlay contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u64,
    /// High score after this run was recorded
    pub best: u64,
    pub hp: u32,
    pub wrap_walls: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_speed_text() {
        assert_eq!(speed_text(1.0, 1.0), "1.0x");
        assert_eq!(speed_text(1.5, 0.75), "1.5x (×0.75)");
        assert_eq!(speed_text(2.0, 1.25), "2.0x");
    }

    #[test]
    fn test_slow_text() {
        assert_eq!(slow_text(2340.0), "2.3s");
        assert_eq!(slow_text(0.0), "0.0s");
        assert_eq!(slow_text(-40.0), "0.0s");
    }

    #[test]
    fn test_snapshot_while_slowed() {
        let mut state = GameState::new(Tuning::default(), 3, 20);
        state.score = 6;
        state.slow_amount = 2.0;
        state.now_ms = 500.0;
        state.slow_until_ms = 2500.0;

        let hud = HudSnapshot::from_state(&state);
        // base 9 cps = 1.5x, slowed to 7 cps
        assert_eq!(hud.speed, "1.5x (×0.78)");
        assert_eq!(hud.slow, "2.0s");
        assert_eq!(hud.high_score, 20);
    }
}
