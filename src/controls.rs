//! Control bindings and key schemes
//!
//! Persisted as a single JSON record next to the high score.

use serde::{Deserialize, Serialize};

/// Movement key preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControlScheme {
    #[default]
    Wasd,
    Arrows,
    /// Individually rebound keys
    Custom,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::Wasd => "wasd",
            ControlScheme::Arrows => "arrows",
            ControlScheme::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wasd" => Some(ControlScheme::Wasd),
            "arrows" | "arrow" => Some(ControlScheme::Arrows),
            "custom" => Some(ControlScheme::Custom),
            _ => None,
        }
    }
}

pub const DEFAULT_PAUSE_KEY: &str = "KeyP";
pub const DEFAULT_RESTART_KEY: &str = "KeyR";
pub const DEFAULT_WRAP_KEY: &str = "KeyT";

/// Physical key codes (`KeyboardEvent.code` values) for each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub up: String,
    pub left: String,
    pub down: String,
    pub right: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: "KeyW".to_string(),
            left: "KeyA".to_string(),
            down: "KeyS".to_string(),
            right: "KeyD".to_string(),
            pause: Some(DEFAULT_PAUSE_KEY.to_string()),
            restart: Some(DEFAULT_RESTART_KEY.to_string()),
            wrap: Some(DEFAULT_WRAP_KEY.to_string()),
        }
    }
}

impl KeyBindings {
    /// Replace the movement keys with a preset, keeping the action keys
    pub fn with_movement(mut self, scheme: ControlScheme) -> Self {
        let (up, left, down, right) = match scheme {
            ControlScheme::Wasd => ("KeyW", "KeyA", "KeyS", "KeyD"),
            ControlScheme::Arrows => ("ArrowUp", "ArrowLeft", "ArrowDown", "ArrowRight"),
            ControlScheme::Custom => return self,
        };
        self.up = up.to_string();
        self.left = left.to_string();
        self.down = down.to_string();
        self.right = right.to_string();
        self
    }

    pub fn pause_key(&self) -> &str {
        self.pause.as_deref().unwrap_or(DEFAULT_PAUSE_KEY)
    }

    pub fn restart_key(&self) -> &str {
        self.restart.as_deref().unwrap_or(DEFAULT_RESTART_KEY)
    }

    pub fn wrap_key(&self) -> &str {
        self.wrap.as_deref().unwrap_or(DEFAULT_WRAP_KEY)
    }
}

/// The stored control record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ControlBindings {
    pub scheme: ControlScheme,
    pub keys: KeyBindings,
}

impl ControlBindings {
    /// Bindings for a preset scheme with default action keys
    pub fn from_scheme(scheme: ControlScheme) -> Self {
        Self {
            scheme,
            keys: KeyBindings::default().with_movement(scheme),
        }
    }

    /// Fully custom bindings
    pub fn custom(keys: KeyBindings) -> Self {
        Self {
            scheme: ControlScheme::Custom,
            keys,
        }
    }

    /// Bindings as saved: preset schemes always carry their preset movement keys
    pub fn normalized(self) -> Self {
        let keys = self.keys.with_movement(self.scheme);
        Self {
            scheme: self.scheme,
            keys,
        }
    }
}
