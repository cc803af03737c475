//! Keyboard to control-intent mapping
//!
//! The host forwards raw key presses and releases; once per tick the
//! simulation takes a snapshot of what is held. Several keys may drive the
//! same intent (player two fires with either right Control or right Shift),
//! so held keys are tracked and intents are derived from them.

use std::collections::BTreeSet;

use crate::sim::{Controls, TankId, TickInput};

/// One named control axis of a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    TurretLeft,
    TurretRight,
    Shoot,
}

impl Intent {
    fn hold(self, controls: &mut Controls) {
        match self {
            Intent::Forward => controls.forward = true,
            Intent::Backward => controls.backward = true,
            Intent::TurnLeft => controls.turn_left = true,
            Intent::TurnRight => controls.turn_right = true,
            Intent::TurretLeft => controls.turret_left = true,
            Intent::TurretRight => controls.turret_right = true,
            Intent::Shoot => controls.shoot = true,
        }
    }
}

/// A single key assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: String,
    pub tank: TankId,
    pub intent: Intent,
}

/// Key assignments for both players
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<Binding>,
}

impl Default for KeyBindings {
    /// Player one: WASD, Q/E turret, Space fires.
    /// Player two: arrows, comma/period turret, right Control or Shift fires.
    fn default() -> Self {
        let mut bindings = Self::empty();
        for (key, intent) in [
            ("KeyW", Intent::Forward),
            ("KeyS", Intent::Backward),
            ("KeyA", Intent::TurnLeft),
            ("KeyD", Intent::TurnRight),
            ("KeyQ", Intent::TurretLeft),
            ("KeyE", Intent::TurretRight),
            ("Space", Intent::Shoot),
        ] {
            bindings.bind(key, 1, intent);
        }
        for (key, intent) in [
            ("ArrowUp", Intent::Forward),
            ("ArrowDown", Intent::Backward),
            ("ArrowLeft", Intent::TurnLeft),
            ("ArrowRight", Intent::TurnRight),
            ("Comma", Intent::TurretLeft),
            ("Period", Intent::TurretRight),
            ("ControlRight", Intent::Shoot),
            ("ShiftRight", Intent::Shoot),
        ] {
            bindings.bind(key, 2, intent);
        }
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Assign a key; a key already bound is reassigned
    pub fn bind(&mut self, key: &str, tank: TankId, intent: Intent) {
        self.bindings.retain(|b| b.key != key);
        self.bindings.push(Binding {
            key: key.to_string(),
            tank,
            intent,
        });
    }

    pub fn lookup(&self, key: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.key == key)
    }

    /// Tanks that have at least one key
    pub fn tanks(&self) -> BTreeSet<TankId> {
        self.bindings.iter().map(|b| b.tank).collect()
    }
}

/// Held keys, sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: BTreeSet<String>,
    pause_requested: bool,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
            pause_requested: false,
        }
    }

    /// Record a press; returns true if the key is bound (host should
    /// swallow the event so the page does not scroll)
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.bindings.lookup(key).is_none() {
            return false;
        }
        self.held.insert(key.to_string());
        true
    }

    /// Record a release; returns true if the key is bound
    pub fn key_up(&mut self, key: &str) -> bool {
        self.held.remove(key);
        self.bindings.lookup(key).is_some()
    }

    /// Release everything (e.g. on window blur)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Ask for a pause toggle on the next snapshot
    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Intents for every bound tank; one-shot requests are consumed
    pub fn snapshot(&mut self) -> TickInput {
        let mut input = TickInput {
            pause: std::mem::take(&mut self.pause_requested),
            ..Default::default()
        };
        for tank in self.bindings.tanks() {
            input.controls.insert(tank, Controls::default());
        }
        for key in &self.held {
            if let Some(binding) = self.bindings.lookup(key) {
                let controls = input.controls.entry(binding.tank).or_default();
                binding.intent.hold(controls);
            }
        }
        input
    }
}
