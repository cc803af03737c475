//! Arena tuning
//!
//! Every number the simulation uses is fixed when a match is built. Defaults
//! reproduce the classic two-tank layout; a JSON file can override any field.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::rect::{Rect, overlaps};

/// Problems loading or validating arena settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Where a tank enters the match and which way it faces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SpawnPoint {
    /// Top-left of the tank box
    pub pos: Vec2,
    /// Initial chassis and turret angle (radians)
    pub angle: f32,
}

/// Numeric constants, spawns and obstacle layout for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Tanks ===
    pub tank_width: f32,
    pub tank_height: f32,
    pub tank_speed: f32,
    pub tank_turn_speed: f32,
    pub turret_turn_speed: f32,
    pub max_health: i32,
    pub max_ammo: u32,
    /// Seconds between shots and per regenerated round
    pub reload_time: f64,
    /// Seconds a destroyed tank stays out
    pub respawn_time: f64,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub bullet_size: f32,

    // === Layout ===
    /// Player one, then player two
    pub spawns: [SpawnPoint; 2],
    pub obstacles: Vec<Rect>,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            tank_width: TANK_WIDTH,
            tank_height: TANK_HEIGHT,
            tank_speed: TANK_SPEED,
            tank_turn_speed: TANK_TURN_SPEED,
            turret_turn_speed: TURRET_TURN_SPEED,
            max_health: TANK_MAX_HEALTH,
            max_ammo: TANK_MAX_AMMO,
            reload_time: TANK_RELOAD_TIME,
            respawn_time: TANK_RESPAWN_TIME,

            bullet_speed: BULLET_SPEED,
            bullet_damage: BULLET_DAMAGE,
            bullet_size: BULLET_SIZE,

            spawns: [
                SpawnPoint {
                    pos: Vec2::new(PLAYER_ONE_SPAWN.0, PLAYER_ONE_SPAWN.1),
                    angle: PLAYER_ONE_ANGLE,
                },
                SpawnPoint {
                    pos: Vec2::new(PLAYER_TWO_SPAWN.0, PLAYER_TWO_SPAWN.1),
                    angle: PLAYER_TWO_ANGLE,
                },
            ],
            obstacles: OBSTACLES
                .iter()
                .map(|&(x, y, w, h)| Rect::new(x, y, w, h))
                .collect(),
        }
    }
}

impl ArenaSettings {
    /// Parse and validate settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded arena settings from {}", path.display());
        Ok(settings)
    }

    /// Tank box at a spawn point
    pub fn spawn_rect(&self, spawn: &SpawnPoint) -> Rect {
        Rect::at(spawn.pos, self.tank_width, self.tank_height)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("tank_width", self.tank_width)?;
        positive("tank_height", self.tank_height)?;
        positive("tank_speed", self.tank_speed)?;
        positive("tank_turn_speed", self.tank_turn_speed)?;
        positive("turret_turn_speed", self.turret_turn_speed)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("bullet_size", self.bullet_size)?;

        if !(self.reload_time > 0.0) {
            return Err(SettingsError::Invalid {
                field: "reload_time",
                reason: format!("must be positive, got {}", self.reload_time),
            });
        }
        if !(self.respawn_time >= 0.0) {
            return Err(SettingsError::Invalid {
                field: "respawn_time",
                reason: format!("must not be negative, got {}", self.respawn_time),
            });
        }
        if self.max_health <= 0 {
            return Err(SettingsError::Invalid {
                field: "max_health",
                reason: format!("must be positive, got {}", self.max_health),
            });
        }
        if self.max_ammo == 0 {
            return Err(SettingsError::Invalid {
                field: "max_ammo",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.bullet_damage <= 0 {
            return Err(SettingsError::Invalid {
                field: "bullet_damage",
                reason: format!("must be positive, got {}", self.bullet_damage),
            });
        }

        for (index, spawn) in self.spawns.iter().enumerate() {
            let rect = self.spawn_rect(spawn);
            if !rect.within(self.field_width, self.field_height) {
                return Err(SettingsError::Invalid {
                    field: "spawns",
                    reason: format!("spawn {} is outside the field", index + 1),
                });
            }
            if self.obstacles.iter().any(|obstacle| overlaps(&rect, obstacle)) {
                return Err(SettingsError::Invalid {
                    field: "spawns",
                    reason: format!("spawn {} overlaps an obstacle", index + 1),
                });
            }
        }
        if overlaps(&self.spawn_rect(&self.spawns[0]), &self.spawn_rect(&self.spawns[1])) {
            return Err(SettingsError::Invalid {
                field: "spawns",
                reason: "spawn boxes overlap each other".to_string(),
            });
        }

        Ok(())
    }
}
