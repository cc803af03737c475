//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only (never reads a wall clock)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{
    bullet_obstacle_collision, bullet_tank_collision, tank_obstacle_collision, tank_tank_collision,
};
pub use rect::{Rect, overlaps};
pub use state::{Bullet, BulletId, GameEvent, GamePhase, GameState, Obstacle, Tank, TankId};
pub use tick::{Controls, TickInput, tick};
