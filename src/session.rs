//! One match, driven by the host's frame callback
//!
//! The session owns the state, the frame clock and the held-key state. The
//! host calls [`Session::frame`] once per animation frame and reads
//! [`Session::state`] to draw; ticks can never overlap.

use crate::clock::FrameClock;
use crate::platform::{InputState, KeyBindings};
use crate::settings::{ArenaSettings, SettingsError};
use crate::sim::{GameState, tick};
use crate::ui::{PlayerPanel, Scoreboard};

/// Game instance holding all match state
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    clock: FrameClock,
    input: InputState,
}

impl Session {
    /// Build a match from validated settings with the default key layout
    pub fn new(settings: ArenaSettings) -> Result<Self, SettingsError> {
        Self::with_bindings(settings, KeyBindings::default())
    }

    pub fn with_bindings(
        settings: ArenaSettings,
        bindings: KeyBindings,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            state: GameState::new(settings),
            clock: FrameClock::default(),
            input: InputState::new(bindings),
        })
    }

    /// Start the match and the frame clock
    pub fn start(&mut self) {
        self.state.start();
        self.clock.start();
    }

    /// Stop advancing; `start` resumes without replaying the gap
    pub fn stop(&mut self) {
        self.clock.stop();
        self.input.clear();
    }

    pub fn pause(&mut self) {
        self.state.set_paused(true);
        self.input.clear();
    }

    pub fn resume(&mut self) {
        self.state.set_paused(false);
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Queue a pause toggle for the next tick
    pub fn toggle_pause(&mut self) {
        self.input.request_pause();
    }

    /// Run at most one tick for this frame; returns true if the state advanced
    pub fn frame(&mut self, time_ms: f64) -> bool {
        let Some(dt) = self.clock.advance(time_ms) else {
            return false;
        };
        let input = self.input.snapshot();
        let before = self.state.time_ticks;
        tick(&mut self.state, &input, dt);
        self.state.time_ticks != before
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn panels(&self) -> Vec<PlayerPanel> {
        PlayerPanel::all(&self.state)
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::from_state(&self.state)
    }
}
