//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Time
//! - Input events (key codes to commands)

pub mod input;
pub mod time;

pub use input::{KeyMap, key_label};
pub use time::now_ms;

/// Install the logger for this platform. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Install the console logger and panic hook. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
