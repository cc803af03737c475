//! Tank Duel - A two-player top-down tank arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, combat, respawn)
//! - `clock`: Frame timestamps to simulation deltas
//! - `platform`: Keyboard to control-intent mapping
//! - `settings`: Data-driven arena tuning
//! - `session`: One match, owned by the host's frame loop
//! - `ui`: Read-only HUD and scoreboard view models

pub mod clock;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use clock::FrameClock;
pub use session::Session;
pub use settings::{ArenaSettings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::{FRAC_PI_2, PI};

    /// Arena dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Tank bounding box
    pub const TANK_WIDTH: f32 = 60.0;
    pub const TANK_HEIGHT: f32 = 80.0;

    /// Tank motion (pixels/s, radians/s)
    pub const TANK_SPEED: f32 = 150.0;
    pub const TANK_TURN_SPEED: f32 = 3.0;
    pub const TURRET_TURN_SPEED: f32 = 4.0;

    /// Tank combat stats
    pub const TANK_MAX_HEALTH: i32 = 100;
    pub const TANK_MAX_AMMO: u32 = 5;
    /// Seconds between shots, and per passively regenerated round
    pub const TANK_RELOAD_TIME: f64 = 1.0;
    pub const TANK_RESPAWN_TIME: f64 = 3.0;

    /// Projectile defaults
    pub const BULLET_SPEED: f32 = 300.0;
    pub const BULLET_DAMAGE: i32 = 20;
    pub const BULLET_SIZE: f32 = 5.0;

    /// Spawn points (top-left of the tank box) and facing
    pub const PLAYER_ONE_SPAWN: (f32, f32) = (200.0, 300.0);
    pub const PLAYER_ONE_ANGLE: f32 = FRAC_PI_2;
    pub const PLAYER_TWO_SPAWN: (f32, f32) = (600.0, 300.0);
    pub const PLAYER_TWO_ANGLE: f32 = 3.0 * PI / 2.0;

    /// Obstacle layout (x, y, width, height)
    pub const OBSTACLES: [(f32, f32, f32, f32); 5] = [
        (100.0, 100.0, 50.0, 50.0),
        (650.0, 100.0, 50.0, 50.0),
        (100.0, 450.0, 50.0, 50.0),
        (650.0, 450.0, 50.0, 50.0),
        (375.0, 275.0, 50.0, 50.0),
    ];

    /// Largest delta the frame clock hands to the simulation (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Slack for timer comparisons against an accumulated match clock
    pub const TIME_EPSILON: f64 = 1e-9;
}

/// Normalize an angle to [0, 2π) for display
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Unit vector pointing along `angle` (0 = +x, π/2 = +y in screen space)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
