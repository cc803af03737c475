//! Game state and core simulation types
//!
//! Everything the presentation layer may read between ticks lives here.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::TIME_EPSILON;
use crate::settings::{ArenaSettings, SpawnPoint};

pub type TankId = u32;
pub type BulletId = u32;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entities placed, waiting for the host to start the match
    Ready,
    /// Active gameplay
    Playing,
    /// Match is paused; ticks are no-ops
    Paused,
}

/// Something that happened during the last tick (for sound/flash effects)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { tank: TankId, bullet: BulletId },
    TankHit { tank: TankId, shooter: TankId, damage: i32 },
    TankDestroyed { tank: TankId, killer: Option<TankId> },
    TankRespawned { tank: TankId },
}

/// A player's tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub id: TankId,
    /// Top-left of the bounding box
    pub pos: Vec2,
    /// Body orientation (radians, unbounded)
    pub chassis_angle: f32,
    /// Gun orientation (radians, unbounded, independent of the body)
    pub turret_angle: f32,
    /// Drops to zero or below on the killing hit
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    /// Match time of the last shot or reload credit (`None` = never fired)
    pub last_shot_time: Option<f64>,
    pub reload_time: f64,
    /// Linear speed (pixels/s)
    pub speed: f32,
    /// Chassis angular speed (radians/s)
    pub turn_speed: f32,
    /// Turret angular speed (radians/s)
    pub turret_turn_speed: f32,
    pub width: f32,
    pub height: f32,
    pub alive: bool,
    pub last_death_time: f64,
    pub respawn_time: f64,
    pub kills: u32,
    pub deaths: u32,
    /// Where this tank (re)enters the match
    pub spawn: SpawnPoint,
}

impl Tank {
    pub fn new(id: TankId, spawn: SpawnPoint, settings: &ArenaSettings) -> Self {
        Self {
            id,
            pos: spawn.pos,
            chassis_angle: spawn.angle,
            turret_angle: spawn.angle,
            health: settings.max_health,
            max_health: settings.max_health,
            ammo: settings.max_ammo,
            max_ammo: settings.max_ammo,
            last_shot_time: None,
            reload_time: settings.reload_time,
            speed: settings.tank_speed,
            turn_speed: settings.tank_turn_speed,
            turret_turn_speed: settings.turret_turn_speed,
            width: settings.tank_width,
            height: settings.tank_height,
            alive: true,
            last_death_time: 0.0,
            respawn_time: settings.respawn_time,
            kills: 0,
            deaths: 0,
            spawn,
        }
    }

    /// Bounding box at the current position
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.width, self.height)
    }

    /// Bounding box the tank would occupy at its spawn point
    #[inline]
    pub fn spawn_rect(&self) -> Rect {
        Rect::at(self.spawn.pos, self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Reload interval has passed since the last shot (or no shot yet)
    pub fn reloaded(&self, now: f64) -> bool {
        match self.last_shot_time {
            Some(last) => timer_elapsed(now, last, self.reload_time),
            None => true,
        }
    }

    /// Respawn delay has passed since death
    pub fn respawn_due(&self, now: f64) -> bool {
        !self.alive && timer_elapsed(now, self.last_death_time, self.respawn_time)
    }

    /// Seconds until respawn, `None` while alive
    pub fn respawn_remaining(&self, now: f64) -> Option<f64> {
        if self.alive {
            return None;
        }
        Some((self.last_death_time + self.respawn_time - now).max(0.0))
    }

    /// Apply a hit; returns true if this hit killed the tank
    pub fn take_damage(&mut self, damage: i32, now: f64) -> bool {
        self.health -= damage;
        if self.health <= 0 {
            self.alive = false;
            self.last_death_time = now;
            self.deaths += 1;
            return true;
        }
        false
    }

    /// Return to the spawn point with full health and ammo
    pub fn respawn(&mut self) {
        self.alive = true;
        self.health = self.max_health;
        self.ammo = self.max_ammo;
        self.pos = self.spawn.pos;
        self.chassis_angle = self.spawn.angle;
        self.turret_angle = self.spawn.angle;
        self.last_shot_time = None;
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: BulletId,
    /// Top-left of the bounding box
    pub pos: Vec2,
    /// Travel direction, fixed when fired
    pub angle: f32,
    pub speed: f32,
    pub damage: i32,
    /// Tank that fired this bullet; it can never hit its owner
    pub owner: TankId,
    pub width: f32,
    pub height: f32,
}

impl Bullet {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.width, self.height)
    }

    /// Position is outside the field on any axis
    pub fn out_of_bounds(&self, field_width: f32, field_height: f32) -> bool {
        self.pos.x < 0.0 || self.pos.x > field_width || self.pos.y < 0.0 || self.pos.y > field_height
    }
}

/// Static wall block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Tuning this match was built from
    pub settings: ArenaSettings,
    /// Current phase
    pub phase: GamePhase,
    /// Simulated match time in seconds
    pub clock: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tanks by id (iteration is ascending by id)
    pub tanks: BTreeMap<TankId, Tank>,
    /// Bullets in flight by id
    pub bullets: BTreeMap<BulletId, Bullet>,
    /// Immutable wall layout
    pub obstacles: Vec<Obstacle>,
    /// Events produced by the most recent tick
    #[serde(default)]
    pub events: Vec<GameEvent>,
    /// Next bullet ID
    next_id: BulletId,
}

impl GameState {
    /// Place both tanks at their spawns and load the obstacle layout
    pub fn new(settings: ArenaSettings) -> Self {
        let tanks = settings
            .spawns
            .iter()
            .zip(1..)
            .map(|(spawn, id)| (id, Tank::new(id, *spawn, &settings)))
            .collect();
        let obstacles = settings
            .obstacles
            .iter()
            .map(|rect| Obstacle { rect: *rect })
            .collect();

        Self {
            settings,
            phase: GamePhase::Ready,
            clock: 0.0,
            time_ticks: 0,
            tanks,
            bullets: BTreeMap::new(),
            obstacles,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new bullet ID
    pub fn next_entity_id(&mut self) -> BulletId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin play (no effect once started)
    pub fn start(&mut self) {
        if self.phase == GamePhase::Ready {
            log::info!("Match started with {} tanks", self.tanks.len());
            self.phase = GamePhase::Playing;
        }
    }

    /// Gate or ungate the simulation; ignored before the match starts
    pub fn set_paused(&mut self, paused: bool) {
        self.phase = match (self.phase, paused) {
            (GamePhase::Playing, true) => GamePhase::Paused,
            (GamePhase::Paused, false) => GamePhase::Playing,
            (phase, _) => phase,
        };
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.tanks.get(&id)
    }

    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.get_mut(&id)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(ArenaSettings::default())
    }
}

/// `now - since >= duration`, tolerant of clock accumulation error
#[inline]
pub fn timer_elapsed(now: f64, since: f64, duration: f64) -> bool {
    now - since + TIME_EPSILON >= duration
}
