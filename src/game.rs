//! Frame-driven game loop
//!
//! [`Game`] is the single mutator of the simulation. The host calls
//! [`Game::frame`] once per display refresh with a monotonic timestamp and
//! forwards input through [`Game::handle_key`] / [`Game::handle_command`].
//! Any fault halts the loop for good and is reported once.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::controls::ControlBindings;
use crate::persistence::{KeyValueStore, Storage};
use crate::platform::{KeyMap, key_label};
use crate::sim::{
    Command, GameEvent, GamePhase, GameState, SimError, TickAccumulator, apply_command, tick,
    tick_mouse,
};
use crate::tuning::{Tuning, TuningError};
use crate::ui::{FrameView, Frontend, FrontendError, GameOverSummary, HudSnapshot};

/// Fatal loop errors
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
    #[error("simulation invariant broken: {0}")]
    Sim(#[from] SimError),
    #[error(transparent)]
    Frontend(#[from] FrontendError),
    #[error("panic during frame: {0}")]
    Panic(String),
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Halt,
}

/// Game instance holding all state
pub struct Game<B: KeyValueStore> {
    state: GameState,
    snake_clock: TickAccumulator,
    mouse_clock: TickAccumulator,
    last_time_ms: Option<f64>,
    storage: Storage<B>,
    keys: KeyMap,
    halted: bool,
    error_reported: bool,
}

impl<B: KeyValueStore> Game<B> {
    /// Idle game using the stored high score and control bindings
    pub fn new(tuning: Tuning, seed: u64, storage: Storage<B>) -> Result<Self, GameError> {
        tuning.validate()?;
        let keys = storage
            .controls()
            .map(|c| KeyMap::new(&c.keys))
            .unwrap_or_default();
        let state = GameState::new(tuning, seed, storage.high_score());
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state,
            snake_clock: TickAccumulator::new(),
            mouse_clock: TickAccumulator::new(),
            last_time_ms: None,
            storage,
            keys,
            halted: false,
            error_reported: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn storage(&self) -> &Storage<B> {
        &self.storage
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether saved control bindings exist (first runs should ask for them)
    pub fn has_saved_controls(&self) -> bool {
        self.storage.controls().is_some()
    }

    /// Save new bindings and start using them
    pub fn set_controls(&mut self, bindings: ControlBindings) {
        let bindings = bindings.normalized();
        self.storage.set_controls(&bindings);
        self.keys = KeyMap::new(&bindings.keys);
    }

    /// Show the start overlay for the idle board
    pub fn open<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> LoopControl {
        self.guarded(frontend, |game, frontend| {
            frontend.show_start(game.state.wrap_walls)?;
            frontend.hud(&HudSnapshot::from_state(&game.state))?;
            Ok(())
        })
    }

    /// Translate a key code through the current bindings
    pub fn handle_key<F: Frontend + ?Sized>(&mut self, code: &str, frontend: &mut F) -> LoopControl {
        match self.keys.command_for(code) {
            Some(command) => self.handle_command(command, frontend),
            None if self.halted => LoopControl::Halt,
            None => LoopControl::Continue,
        }
    }

    pub fn handle_command<F: Frontend + ?Sized>(
        &mut self,
        command: Command,
        frontend: &mut F,
    ) -> LoopControl {
        self.guarded(frontend, |game, frontend| game.apply(command, frontend))
    }

    /// Advance to `now_ms`, run due ticks, then push HUD and frame
    pub fn frame<F: Frontend + ?Sized>(&mut self, now_ms: f64, frontend: &mut F) -> LoopControl {
        self.guarded(frontend, |game, frontend| game.step_frame(now_ms, frontend))
    }

    /// Report an externally caught fault; only the first one is shown
    pub fn report_fault<F: Frontend + ?Sized>(&mut self, err: GameError, frontend: &mut F) {
        self.halted = true;
        if self.error_reported {
            log::debug!("Suppressed further fault: {}", err);
            return;
        }
        self.error_reported = true;
        log::error!("Game halted: {}", err);
        frontend.show_error(&err.to_string());
    }

    fn guarded<F, Op>(&mut self, frontend: &mut F, op: Op) -> LoopControl
    where
        F: Frontend + ?Sized,
        Op: FnOnce(&mut Self, &mut F) -> Result<(), GameError>,
    {
        if self.halted {
            return LoopControl::Halt;
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| op(&mut *self, &mut *frontend)));
        let err = match outcome {
            Ok(Ok(())) => return LoopControl::Continue,
            Ok(Err(err)) => err,
            Err(payload) => GameError::Panic(panic_message(payload)),
        };
        self.report_fault(err, frontend);
        LoopControl::Halt
    }

    fn apply<F: Frontend + ?Sized>(&mut self, command: Command, frontend: &mut F) -> Result<(), GameError> {
        let changed = apply_command(&mut self.state, command);
        if !changed {
            return Ok(());
        }
        match command {
            Command::Turn(_) => {}
            Command::Start | Command::Restart => {
                self.reset_clocks();
                frontend.clear_overlays()?;
                let hint = format!(
                    "Pause with {} · Toggle wrap with {}",
                    key_label(self.keys.pause_key()),
                    key_label(self.keys.wrap_key())
                );
                frontend.show_hint(&hint)?;
            }
            Command::Pause => {
                if self.state.phase == GamePhase::Paused {
                    let hint = format!(
                        "Paused — press {} to resume",
                        key_label(self.keys.pause_key())
                    );
                    frontend.show_hint(&hint)?;
                } else {
                    frontend.clear_overlays()?;
                }
            }
            Command::ToggleWrap => {
                let hint = format!("Wrap: {}", if self.state.wrap_walls { "On" } else { "Off" });
                frontend.show_hint(&hint)?;
            }
        }
        Ok(())
    }

    fn reset_clocks(&mut self) {
        self.snake_clock.reset();
        self.mouse_clock.reset();
        self.last_time_ms = None;
    }

    fn step_frame<F: Frontend + ?Sized>(&mut self, now_ms: f64, frontend: &mut F) -> Result<(), GameError> {
        let dt_ms = match self.last_time_ms {
            Some(last) => (now_ms - last).clamp(0.0, self.state.tuning.max_frame_delta_ms),
            None => 0.0,
        };
        self.last_time_ms = Some(now_ms);
        self.state.now_ms = now_ms;

        // Clocks only bank time while playing, so a pause freezes them
        if self.state.is_playing() {
            let dt = dt_ms / 1000.0;
            self.snake_clock.advance(dt);
            self.mouse_clock.advance(dt);

            while self.state.is_playing() && self.snake_clock.try_consume(self.state.snake_cps()) {
                tick(&mut self.state);
            }
            while self.state.is_playing() && self.mouse_clock.try_consume(self.state.mouse_cps()) {
                tick_mouse(&mut self.state);
            }
        }

        self.state.check_invariants()?;
        self.process_events(frontend)?;

        frontend.hud(&HudSnapshot::from_state(&self.state))?;
        frontend.render(&FrameView::from_state(&self.state))?;
        Ok(())
    }

    fn process_events<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Result<(), GameError> {
        for event in self.state.drain_events() {
            log::debug!("{:?}", event);
            if let GameEvent::GameOver { .. } = event {
                let best = self.storage.record_score(self.state.score);
                self.state.high_score = best;
                frontend.show_game_over(&GameOverSummary {
                    score: self.state.score,
                    best,
                    hp: self.state.hp,
                    wrap_walls: self.state.wrap_walls,
                })?;
            }
        }
        Ok(())
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
