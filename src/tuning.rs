//! Data-driven game balance
//!
//! A `Tuning` value is handed to the simulation at construction and never
//! mutated afterwards, so tests can run the engine with alternate numbers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Invalid tuning values or an unparsable tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("grid size {0} is too small (minimum 4)")]
    GridTooSmall(i32),
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{min_name} ({min}) exceeds {max_name} ({max})")]
    InvertedRange {
        min_name: &'static str,
        min: f64,
        max_name: &'static str,
        max: f64,
    },
    #[error("tuning JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Grid side length in cells
    pub grid: i32,

    // === Snake speed ===
    pub base_cps: f64,
    pub max_cps: f64,
    pub min_cps: f64,
    pub cps_inc: f64,

    /// Snake hit points cap
    pub max_hp: u32,

    // === Banana ===
    pub banana_slow: f64,
    pub banana_base_ms: f64,
    pub banana_per_hs_ms: f64,
    pub banana_max_ms: f64,

    // === Mouse ===
    pub base_mouse_cps: f64,
    pub min_mouse_cps: f64,
    pub max_mouse_cps: f64,
    pub mouse_alert_dist: i32,
    pub mouse_eat_score: u64,

    /// Longest frame delta fed to the tick accumulators (ms)
    pub max_frame_delta_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid: consts::GRID,

            base_cps: consts::BASE_CPS,
            max_cps: consts::MAX_CPS,
            min_cps: consts::MIN_CPS,
            cps_inc: consts::CPS_INC,

            max_hp: consts::MAX_HP,

            banana_slow: consts::BANANA_SLOW,
            banana_base_ms: consts::BANANA_BASE_MS,
            banana_per_hs_ms: consts::BANANA_PER_HS_MS,
            banana_max_ms: consts::BANANA_MAX_MS,

            base_mouse_cps: consts::BASE_MOUSE_CPS,
            min_mouse_cps: consts::MIN_MOUSE_CPS,
            max_mouse_cps: consts::MAX_MOUSE_CPS,
            mouse_alert_dist: consts::MOUSE_ALERT_DIST,
            mouse_eat_score: consts::MOUSE_EAT_SCORE,

            max_frame_delta_ms: consts::MAX_FRAME_DELTA_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every tick duration has a floor and ranges are ordered
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.grid < 4 {
            return Err(TuningError::GridTooSmall(self.grid));
        }
        for (name, value) in [
            ("base_cps", self.base_cps),
            ("min_cps", self.min_cps),
            ("base_mouse_cps", self.base_mouse_cps),
            ("min_mouse_cps", self.min_mouse_cps),
            ("max_frame_delta_ms", self.max_frame_delta_ms),
        ] {
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { name, value });
            }
        }
        if self.min_cps > self.max_cps {
            return Err(TuningError::InvertedRange {
                min_name: "min_cps",
                min: self.min_cps,
                max_name: "max_cps",
                max: self.max_cps,
            });
        }
        if self.min_mouse_cps > self.max_mouse_cps {
            return Err(TuningError::InvertedRange {
                min_name: "min_mouse_cps",
                min: self.min_mouse_cps,
                max_name: "max_mouse_cps",
                max: self.max_mouse_cps,
            });
        }
        Ok(())
    }

    /// Snake speed before slow effects
    pub fn base_cps_for_score(&self, score: u64) -> f64 {
        self.max_cps.min(self.base_cps + score as f64 * self.cps_inc)
    }

    /// Banana effect duration, scaled by the stored high score and capped
    pub fn banana_duration_ms(&self, high_score: u64) -> f64 {
        self.banana_max_ms
            .min(self.banana_base_ms + high_score as f64 * self.banana_per_hs_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.grid, 24);
    }

    #[test]
    fn test_base_cps_caps_at_max() {
        let tuning = Tuning::default();
        assert_eq!(tuning.base_cps_for_score(0), 6.0);
        assert_eq!(tuning.base_cps_for_score(4), 8.0);
        assert_eq!(tuning.base_cps_for_score(1000), 16.0);
    }

    #[test]
    fn test_banana_duration_scales_with_high_score() {
        let tuning = Tuning::default();
        assert_eq!(tuning.banana_duration_ms(0), 3000.0);
        assert_eq!(tuning.banana_duration_ms(10), 4500.0);
        assert_eq!(tuning.banana_duration_ms(500), 10000.0);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "grid": 10, "max_hp": 1 }"#).unwrap();
        assert_eq!(tuning.grid, 10);
        assert_eq!(tuning.max_hp, 1);
        assert_eq!(tuning.base_cps, 6.0);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "grid": 2 }"#),
            Err(TuningError::GridTooSmall(2))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "min_cps": 0 }"#),
            Err(TuningError::NonPositive { name: "min_cps", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "min_mouse_cps": 20 }"#),
            Err(TuningError::InvertedRange { .. })
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(TuningError::Json(_))));
    }
}
