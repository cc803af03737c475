//! HUD view models
//!
//! Plain data the presentation layer draws from: one panel per player and a
//! scoreboard. Built from a state snapshot; never mutates it.

use serde::{Deserialize, Serialize};

use crate::sim::{GameState, Tank, TankId};

/// Health/ammo/score block shown for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPanel {
    pub tank: TankId,
    /// Never below zero, even on the killing hit
    pub health: i32,
    pub max_health: i32,
    /// 0.0..=1.0, width of the health bar
    pub health_fraction: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub score: u32,
    pub alive: bool,
    /// Seconds until the tank re-enters, while dead
    pub respawn_in: Option<f64>,
}

impl PlayerPanel {
    pub fn from_tank(tank: &Tank, now: f64) -> Self {
        let health = tank.health.max(0);
        Self {
            tank: tank.id,
            health,
            max_health: tank.max_health,
            health_fraction: (health as f32 / tank.max_health as f32).clamp(0.0, 1.0),
            ammo: tank.ammo,
            max_ammo: tank.max_ammo,
            score: tank.kills,
            alive: tank.alive,
            respawn_in: tank.respawn_remaining(now),
        }
    }

    /// Panels for every tank, in id order
    pub fn all(state: &GameState) -> Vec<Self> {
        state
            .tanks
            .values()
            .map(|tank| Self::from_tank(tank, state.clock))
            .collect()
    }
}

/// One scoreboard line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub tank: TankId,
    pub kills: u32,
    pub deaths: u32,
    pub kd_ratio: f32,
}

/// Kills, deaths and K/D for every tank
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub rows: Vec<ScoreRow>,
}

impl Scoreboard {
    pub fn from_state(state: &GameState) -> Self {
        let rows = state
            .tanks
            .values()
            .map(|tank| ScoreRow {
                tank: tank.id,
                kills: tank.kills,
                deaths: tank.deaths,
                kd_ratio: kd_ratio(tank.kills, tank.deaths),
            })
            .collect();
        Self { rows }
    }

    /// Tank with strictly the most kills
    pub fn leader(&self) -> Option<TankId> {
        let best = self.rows.iter().map(|row| row.kills).max()?;
        let mut leaders = self.rows.iter().filter(|row| row.kills == best);
        let leader = leaders.next()?;
        if leaders.next().is_some() {
            return None;
        }
        Some(leader.tank)
    }
}

/// Kills per death; with no deaths the ratio is the kill count
pub fn kd_ratio(kills: u32, deaths: u32) -> f32 {
    if deaths == 0 {
        kills as f32
    } else {
        kills as f32 / deaths as f32
    }
}
