//! Keyboard input mapping
//!
//! Key codes are `KeyboardEvent.code` strings ("KeyW", "ArrowUp", ...), so
//! bindings follow physical keys regardless of layout.

use std::collections::HashMap;

use crate::controls::KeyBindings;
use crate::sim::{Command, Direction};

/// Key code to command lookup built from the stored bindings
#[derive(Debug, Clone)]
pub struct KeyMap {
    moves: HashMap<String, Direction>,
    pause: String,
    restart: String,
    wrap: String,
}

impl KeyMap {
    pub fn new(keys: &KeyBindings) -> Self {
        let moves = [
            (keys.up.clone(), Direction::Up),
            (keys.down.clone(), Direction::Down),
            (keys.left.clone(), Direction::Left),
            (keys.right.clone(), Direction::Right),
        ]
        .into_iter()
        .collect();
        Self {
            moves,
            pause: keys.pause_key().to_string(),
            restart: keys.restart_key().to_string(),
            wrap: keys.wrap_key().to_string(),
        }
    }

    /// Movement keys win over action keys bound to the same code
    pub fn command_for(&self, code: &str) -> Option<Command> {
        if let Some(&dir) = self.moves.get(code) {
            return Some(Command::Turn(dir));
        }
        if code == self.pause {
            Some(Command::Pause)
        } else if code == self.restart {
            Some(Command::Restart)
        } else if code == self.wrap {
            Some(Command::ToggleWrap)
        } else {
            None
        }
    }

    pub fn pause_key(&self) -> &str {
        &self.pause
    }

    pub fn wrap_key(&self) -> &str {
        &self.wrap
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(&KeyBindings::default())
    }
}

/// Short label for a key code: "KeyW" -> "W", arrows -> glyphs
pub fn key_label(code: &str) -> String {
    if code.is_empty() {
        return "?".to_string();
    }
    if let Some(letter) = code.strip_prefix("Key") {
        return letter.to_string();
    }
    match code {
        "ArrowUp" => "↑",
        "ArrowDown" => "↓",
        "ArrowLeft" => "←",
        "ArrowRight" => "→",
        other => other,
    }
    .to_string()
}
