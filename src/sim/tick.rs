//! Simulation tick
//!
//! Advances the match by one caller-supplied timestep. Tanks are updated in
//! ascending id order, then bullets in ascending id order, so identical inputs
//! always produce identical states.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::collision::{bullet_obstacle_collision, bullet_tank_collision, tank_obstacle_collision};
use super::rect::{Rect, overlaps};
use super::state::{Bullet, GameEvent, GameState, Obstacle, Tank, TankId};
use crate::heading;
use crate::settings::ArenaSettings;

/// Held intents for one tank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub turret_left: bool,
    pub turret_right: bool,
    pub shoot: bool,
}

impl Controls {
    /// -1, 0 or +1 from a pair of opposing intents
    fn axis(negative: bool, positive: bool) -> f32 {
        (positive as i32 - negative as i32) as f32
    }

    pub fn turn_axis(&self) -> f32 {
        Self::axis(self.turn_left, self.turn_right)
    }

    pub fn turret_axis(&self) -> f32 {
        Self::axis(self.turret_left, self.turret_right)
    }

    pub fn drive_axis(&self) -> f32 {
        Self::axis(self.backward, self.forward)
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Intents per tank; a missing tank holds nothing
    pub controls: BTreeMap<TankId, Controls>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn controls_for(&self, id: TankId) -> Controls {
        self.controls.get(&id).copied().unwrap_or_default()
    }

    /// Builder helper for scripted input
    pub fn with(mut self, id: TankId, controls: Controls) -> Self {
        self.controls.insert(id, controls);
        self
    }
}

/// A bullet a tank asked to spawn this tick
struct Shot {
    owner: TankId,
    pos: glam::Vec2,
    angle: f32,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.pause {
        let paused = state.is_running();
        state.set_paused(paused);
    }

    if !state.is_running() {
        return;
    }

    state.time_ticks += 1;
    state.clock += dt as f64;
    let now = state.clock;

    let ids: Vec<TankId> = state.tanks.keys().copied().collect();
    for id in ids {
        update_tank(state, id, input.controls_for(id), dt, now);
    }

    update_bullets(state, dt, now);
}

fn update_tank(state: &mut GameState, id: TankId, controls: Controls, dt: f32, now: f64) {
    // Boxes of every other live tank, as they stand right now
    let blockers: Vec<Rect> = state
        .tanks
        .values()
        .filter(|other| other.id != id && other.alive)
        .map(Tank::rect)
        .collect();

    let Some(tank) = state.tanks.get_mut(&id) else {
        return;
    };

    if !tank.alive {
        if tank.respawn_due(now) {
            let spawn = tank.spawn_rect();
            if blockers.iter().any(|other| overlaps(&spawn, other)) {
                log::debug!("Tank {} respawn deferred: spawn point occupied", id);
            } else {
                tank.respawn();
                log::info!("Tank {} respawned", id);
                state.events.push(GameEvent::TankRespawned { tank: id });
            }
        }
        return;
    }

    rotate(tank, &controls, dt);
    drive(tank, &controls, dt, &state.settings, &state.obstacles, &blockers);

    let shot = try_fire(tank, &controls, now);
    passive_reload(tank, now);

    if let Some(shot) = shot {
        spawn_bullet(state, shot);
    }
}

fn rotate(tank: &mut Tank, controls: &Controls, dt: f32) {
    tank.chassis_angle += tank.turn_speed * dt * controls.turn_axis();
    tank.turret_angle += tank.turret_turn_speed * dt * controls.turret_axis();
}

/// Translate along the chassis heading, clamp to the field, roll back on contact
fn drive(
    tank: &mut Tank,
    controls: &Controls,
    dt: f32,
    settings: &ArenaSettings,
    obstacles: &[Obstacle],
    blockers: &[Rect],
) {
    let original = tank.pos;

    let step = heading(tank.chassis_angle) * tank.speed * dt * controls.drive_axis();
    let mut pos = original + step;
    pos.x = pos.x.min(settings.field_width - tank.width).max(0.0);
    pos.y = pos.y.min(settings.field_height - tank.height).max(0.0);
    tank.pos = pos;

    // Obstacles first, then other tanks; either one rolls the move back
    if tank_obstacle_collision(tank, obstacles)
        || blockers.iter().any(|other| overlaps(&tank.rect(), other))
    {
        tank.pos = original;
    }
}

/// Spend a round if the trigger is held, ammo remains and the gun has reloaded
fn try_fire(tank: &mut Tank, controls: &Controls, now: f64) -> Option<Shot> {
    if !controls.shoot || tank.ammo == 0 || !tank.reloaded(now) {
        return None;
    }

    tank.ammo -= 1;
    tank.last_shot_time = Some(now);
    Some(Shot {
        owner: tank.id,
        pos: tank.center(),
        angle: tank.turret_angle,
    })
}

/// Credit one round per whole reload interval since the last shot.
/// Runs after `try_fire`, so a shot this tick has already reset the timer.
fn passive_reload(tank: &mut Tank, now: f64) {
    if tank.ammo >= tank.max_ammo {
        return;
    }
    let Some(last) = tank.last_shot_time else {
        return;
    };
    if !tank.reloaded(now) {
        return;
    }

    let elapsed = now - last + crate::consts::TIME_EPSILON;
    let intervals = (elapsed / tank.reload_time).floor();
    if intervals >= 1.0 {
        let missing = tank.max_ammo - tank.ammo;
        let credit = intervals.min(missing as f64) as u32;
        tank.ammo += credit;
        tank.last_shot_time = Some(now);
    }
}

fn spawn_bullet(state: &mut GameState, shot: Shot) {
    let id = state.next_entity_id();
    let settings = &state.settings;
    state.bullets.insert(
        id,
        Bullet {
            id,
            pos: shot.pos,
            angle: shot.angle,
            speed: settings.bullet_speed,
            damage: settings.bullet_damage,
            owner: shot.owner,
            width: settings.bullet_size,
            height: settings.bullet_size,
        },
    );
    state.events.push(GameEvent::ShotFired {
        tank: shot.owner,
        bullet: id,
    });
}

/// Move every bullet, then resolve exactly one outcome per bullet
fn update_bullets(state: &mut GameState, dt: f32, now: f64) {
    let field_width = state.settings.field_width;
    let field_height = state.settings.field_height;
    let mut spent = Vec::new();

    for bullet in state.bullets.values_mut() {
        bullet.pos += heading(bullet.angle) * bullet.speed * dt;

        if bullet.out_of_bounds(field_width, field_height) {
            spent.push(bullet.id);
            continue;
        }

        if bullet_obstacle_collision(bullet, &state.obstacles) {
            spent.push(bullet.id);
            continue;
        }

        let Some(victim) = state
            .tanks
            .values_mut()
            .find(|tank| tank.alive && bullet_tank_collision(bullet, tank))
        else {
            continue;
        };

        spent.push(bullet.id);
        let victim_id = victim.id;
        state.events.push(GameEvent::TankHit {
            tank: victim_id,
            shooter: bullet.owner,
            damage: bullet.damage,
        });

        if !victim.take_damage(bullet.damage, now) {
            continue;
        }

        // Credit the shooter if it is still in the match
        let killer = match state.tanks.get_mut(&bullet.owner) {
            Some(shooter) => {
                shooter.kills += 1;
                Some(shooter.id)
            }
            None => None,
        };
        log::info!("Tank {} destroyed by tank {}", victim_id, bullet.owner);
        state.events.push(GameEvent::TankDestroyed {
            tank: victim_id,
            killer,
        });
    }

    for id in spent {
        state.bullets.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SpawnPoint;
    use crate::sim::state::GamePhase;
    use glam::Vec2;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-3;

    /// Default arena without walls, already started
    fn open_arena() -> GameState {
        let settings = ArenaSettings {
            obstacles: Vec::new(),
            ..ArenaSettings::default()
        };
        let mut state = GameState::new(settings);
        state.start();
        state
    }

    fn started() -> GameState {
        let mut state = GameState::default();
        state.start();
        state
    }

    fn hold(id: TankId, controls: Controls) -> TickInput {
        TickInput::default().with(id, controls)
    }

    fn shoot() -> Controls {
        Controls {
            shoot: true,
            ..Default::default()
        }
    }

    fn forward() -> Controls {
        Controls {
            forward: true,
            ..Default::default()
        }
    }

    fn put_bullet(state: &mut GameState, owner: TankId, pos: Vec2, angle: f32) -> u32 {
        let id = state.next_entity_id();
        state.bullets.insert(
            id,
            Bullet {
                id,
                pos,
                angle,
                speed: 300.0,
                damage: 20,
                owner,
                width: 5.0,
                height: 5.0,
            },
        );
        id
    }

    fn place(state: &mut GameState, id: TankId, x: f32, y: f32, angle: f32) {
        let tank = state.tank_mut(id).unwrap();
        tank.pos = Vec2::new(x, y);
        tank.chassis_angle = angle;
        tank.turret_angle = angle;
    }

    #[test]
    fn test_tick_is_noop_before_start() {
        let mut state = GameState::default();
        tick(&mut state, &hold(1, forward()), 1.0);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.tank(1).unwrap().pos, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = started();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, 0.5);
        assert_eq!(state.phase, GamePhase::Paused);

        // Held intents do nothing while paused
        tick(&mut state, &hold(1, forward()), 0.5);
        assert_eq!(state.clock, 0.0);
        assert_eq!(state.tank(1).unwrap().pos, Vec2::new(200.0, 300.0));

        // Unpause runs the same tick
        tick(&mut state, &pause, 0.5);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.clock, 0.5);
    }

    #[test]
    fn test_forward_moves_along_chassis() {
        // Tank 1 faces π/2 (down the screen) at spawn
        let mut state = started();
        tick(&mut state, &hold(1, forward()), 1.0);

        let tank = state.tank(1).unwrap();
        let expected = Vec2::new(200.0 + 150.0 * (PI / 2.0).cos(), 300.0 + 150.0 * (PI / 2.0).sin());
        assert!((tank.pos - expected).length() < EPS);
        assert!((tank.pos.y - 450.0).abs() < EPS);
    }

    #[test]
    fn test_forward_and_backward_cancel() {
        let mut state = started();
        let both = Controls {
            forward: true,
            backward: true,
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        tick(&mut state, &hold(1, both), 0.5);

        let tank = state.tank(1).unwrap();
        assert_eq!(tank.pos, Vec2::new(200.0, 300.0));
        assert_eq!(tank.chassis_angle, PI / 2.0);
    }

    #[test]
    fn test_backward_reverses_heading() {
        let mut state = open_arena();
        place(&mut state, 1, 300.0, 200.0, 0.0);
        let back = Controls {
            backward: true,
            ..Default::default()
        };
        tick(&mut state, &hold(1, back), 0.5);
        assert!((state.tank(1).unwrap().pos.x - 225.0).abs() < EPS);
    }

    #[test]
    fn test_turret_rotates_independently() {
        let mut state = started();
        let controls = Controls {
            turn_right: true,
            turret_left: true,
            ..Default::default()
        };
        tick(&mut state, &hold(1, controls), 0.25);

        let tank = state.tank(1).unwrap();
        assert!((tank.chassis_angle - (PI / 2.0 + 0.75)).abs() < EPS);
        assert!((tank.turret_angle - (PI / 2.0 - 1.0)).abs() < EPS);
    }

    #[test]
    fn test_clamped_at_field_edge() {
        let mut state = open_arena();
        place(&mut state, 1, 700.0, 100.0, 0.0);
        tick(&mut state, &hold(1, forward()), 2.0);
        assert_eq!(state.tank(1).unwrap().pos.x, 740.0);

        place(&mut state, 1, 10.0, 5.0, -PI / 2.0);
        tick(&mut state, &hold(1, forward()), 1.0);
        let tank = state.tank(1).unwrap();
        assert_eq!(tank.pos.y, 0.0);
        assert!((tank.pos.x - 10.0).abs() < EPS);
    }

    #[test]
    fn test_obstacle_rolls_back_translation_only() {
        let mut state = started();
        // Facing right at the central block
        place(&mut state, 1, 300.0, 260.0, 0.0);
        let controls = Controls {
            forward: true,
            turret_right: true,
            ..Default::default()
        };
        tick(&mut state, &hold(1, controls), 0.2);

        let tank = state.tank(1).unwrap();
        assert_eq!(tank.pos, Vec2::new(300.0, 260.0));
        assert!((tank.turret_angle - 0.8).abs() < EPS);
    }

    #[test]
    fn test_tank_blocks_tank() {
        let mut state = open_arena();
        place(&mut state, 1, 100.0, 100.0, 0.0);
        place(&mut state, 2, 200.0, 100.0, 0.0);
        tick(&mut state, &hold(1, forward()), 0.5);
        assert_eq!(state.tank(1).unwrap().pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_dead_tank_does_not_block() {
        let mut state = open_arena();
        place(&mut state, 1, 100.0, 100.0, 0.0);
        place(&mut state, 2, 200.0, 100.0, 0.0);
        state.tank_mut(2).unwrap().take_damage(100, 0.0);
        tick(&mut state, &hold(1, forward()), 0.5);
        assert!((state.tank(1).unwrap().pos.x - 175.0).abs() < EPS);
    }

    #[test]
    fn test_unknown_tank_intents_are_ignored() {
        let mut state = started();
        let input = TickInput::default().with(42, shoot()).with(7, forward());
        tick(&mut state, &input, 0.5);

        assert!(state.bullets.is_empty());
        assert_eq!(state.tank(1).unwrap().pos, Vec2::new(200.0, 300.0));
        assert_eq!(state.tank(2).unwrap().pos, Vec2::new(600.0, 300.0));
    }

    #[test]
    fn test_fire_spawns_bullet_at_center() {
        let mut state = started();
        state.tank_mut(1).unwrap().turret_angle = 0.0;
        tick(&mut state, &hold(1, shoot()), 0.0);

        assert_eq!(state.bullets.len(), 1);
        let bullet = state.bullets.values().next().unwrap();
        assert_eq!(bullet.owner, 1);
        assert_eq!(bullet.pos, Vec2::new(230.0, 340.0));
        assert_eq!(bullet.angle, 0.0);
        assert_eq!(state.tank(1).unwrap().ammo, 4);
        assert!(matches!(state.events[0], GameEvent::ShotFired { tank: 1, .. }));
    }

    #[test]
    fn test_reload_gates_firing() {
        let mut state = open_arena();
        let input = hold(1, shoot());

        // t = 0: first shot
        tick(&mut state, &input, 0.0);
        assert_eq!(state.tank(1).unwrap().ammo, 4);
        assert_eq!(state.bullets.len(), 1);

        // t = 0.5: still reloading
        tick(&mut state, &input, 0.5);
        assert_eq!(state.tank(1).unwrap().ammo, 4);
        assert_eq!(state.tank(1).unwrap().last_shot_time, Some(0.0));

        // t = 1.0: fires again
        tick(&mut state, &input, 0.5);
        assert_eq!(state.tank(1).unwrap().ammo, 3);
        assert_eq!(state.tank(1).unwrap().last_shot_time, Some(1.0));
    }

    #[test]
    fn test_fire_takes_precedence_over_passive_reload() {
        let mut state = open_arena();
        tick(&mut state, &hold(1, shoot()), 0.0);
        assert_eq!(state.tank(1).unwrap().ammo, 4);

        // Exactly one interval later the shot consumes it; no round is
        // credited back in the same tick.
        tick(&mut state, &hold(1, shoot()), 1.0);
        let tank = state.tank(1).unwrap();
        assert_eq!(tank.ammo, 3);
        assert_eq!(tank.last_shot_time, Some(1.0));
    }

    #[test]
    fn test_passive_reload_credits_whole_intervals() {
        let mut state = open_arena();
        {
            let tank = state.tank_mut(1).unwrap();
            tank.ammo = 1;
            tank.last_shot_time = Some(0.0);
        }

        // 2.5 intervals: two rounds, timer restarts now
        tick(&mut state, &TickInput::default(), 2.5);
        let tank = state.tank(1).unwrap();
        assert_eq!(tank.ammo, 3);
        assert_eq!(tank.last_shot_time, Some(2.5));

        // Ten intervals later ammo caps at max
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.tank(1).unwrap().ammo, 5);
    }

    #[test]
    fn test_empty_tank_cannot_fire() {
        let mut state = open_arena();
        state.tank_mut(1).unwrap().ammo = 0;
        state.tank_mut(1).unwrap().last_shot_time = Some(0.0);
        tick(&mut state, &hold(1, shoot()), 0.5);
        assert!(state.bullets.is_empty());
        assert_eq!(state.tank(1).unwrap().ammo, 0);
    }

    #[test]
    fn test_bullet_keeps_angle_after_turret_turns() {
        let mut state = open_arena();
        place(&mut state, 1, 100.0, 100.0, 0.0);
        tick(&mut state, &hold(1, shoot()), 0.0);

        let turn = Controls {
            turret_right: true,
            ..Default::default()
        };
        tick(&mut state, &hold(1, turn), 0.1);
        let bullet = state.bullets.values().next().unwrap();
        assert_eq!(bullet.angle, 0.0);
        assert!((bullet.pos - Vec2::new(160.0, 140.0)).length() < EPS);
    }

    #[test]
    fn test_bullet_leaves_field() {
        let mut state = open_arena();
        put_bullet(&mut state, 1, Vec2::new(790.0, 300.0), 0.0);
        // Keep tank 2 out of the bullet's path
        place(&mut state, 2, 600.0, 400.0, 0.0);

        tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.bullets.is_empty());
        assert!(state.events.is_empty());
        assert_eq!(state.tank(2).unwrap().health, 100);
    }

    #[test]
    fn test_bullet_stops_at_obstacle() {
        let mut state = started();
        put_bullet(&mut state, 1, Vec2::new(360.0, 290.0), 0.0);
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.bullets.is_empty());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_bullet_never_hits_owner() {
        let mut state = open_arena();
        // Parked inside its own tank
        put_bullet(&mut state, 1, Vec2::new(230.0, 340.0), 0.0);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.tank(1).unwrap().health, 100);
    }

    #[test]
    fn test_bullet_hits_exactly_one_tank() {
        let mut state = open_arena();
        // Two overlapping enemies can only happen via direct placement
        state.tanks.insert(3, Tank::new(3, SpawnPoint::default(), &state.settings));
        place(&mut state, 2, 400.0, 100.0, 0.0);
        place(&mut state, 3, 410.0, 110.0, 0.0);
        put_bullet(&mut state, 1, Vec2::new(420.0, 120.0), 0.0);

        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.bullets.is_empty());
        assert_eq!(state.tank(2).unwrap().health, 80);
        assert_eq!(state.tank(3).unwrap().health, 100);
    }

    #[test]
    fn test_five_hits_destroy_tank() {
        let mut state = open_arena();
        for hit in 1..=5 {
            // Dropped right onto tank 2
            put_bullet(&mut state, 1, Vec2::new(620.0, 320.0), 0.0);
            tick(&mut state, &TickInput::default(), 0.0);
            let victim = state.tank(2).unwrap();
            assert_eq!(victim.health, 100 - 20 * hit);
            assert_eq!(victim.alive, hit < 5);
        }

        assert_eq!(state.tank(2).unwrap().deaths, 1);
        assert_eq!(state.tank(1).unwrap().kills, 1);
        assert!(state.events.contains(&GameEvent::TankDestroyed {
            tank: 2,
            killer: Some(1),
        }));
    }

    #[test]
    fn test_kill_credit_dropped_for_missing_owner() {
        let mut state = open_arena();
        state.tank_mut(2).unwrap().health = 20;
        put_bullet(&mut state, 9, Vec2::new(620.0, 320.0), 0.0);

        tick(&mut state, &TickInput::default(), 0.0);
        let victim = state.tank(2).unwrap();
        assert!(!victim.alive);
        assert_eq!(victim.deaths, 1);
        assert_eq!(state.tank(1).unwrap().kills, 0);
        assert!(state.events.contains(&GameEvent::TankDestroyed { tank: 2, killer: None }));
    }

    #[test]
    fn test_dead_tank_is_not_hit_and_ignores_input() {
        let mut state = open_arena();
        state.tank_mut(2).unwrap().take_damage(100, 0.0);
        put_bullet(&mut state, 1, Vec2::new(620.0, 320.0), 0.0);

        tick(&mut state, &hold(2, forward()), 0.0);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.tank(2).unwrap().pos, Vec2::new(600.0, 300.0));
    }

    #[test]
    fn test_respawn_restores_spawn_state() {
        let mut state = open_arena();
        {
            let tank = state.tank_mut(2).unwrap();
            tank.pos = Vec2::new(50.0, 50.0);
            tank.chassis_angle = 1.0;
            tank.turret_angle = 2.0;
            tank.ammo = 0;
            tank.health = 20;
        }
        put_bullet(&mut state, 1, Vec2::new(70.0, 70.0), 0.0);
        tick(&mut state, &TickInput::default(), 0.0);
        assert!(!state.tank(2).unwrap().alive);

        for _ in 0..11 {
            tick(&mut state, &TickInput::default(), 0.25);
            assert!(!state.tank(2).unwrap().alive);
        }
        tick(&mut state, &TickInput::default(), 0.25);

        let tank = state.tank(2).unwrap();
        assert!(tank.alive);
        assert_eq!(tank.pos, Vec2::new(600.0, 300.0));
        assert_eq!(tank.chassis_angle, 3.0 * PI / 2.0);
        assert_eq!(tank.turret_angle, 3.0 * PI / 2.0);
        assert_eq!(tank.health, 100);
        assert_eq!(tank.ammo, 5);
        assert!(state.events.contains(&GameEvent::TankRespawned { tank: 2 }));
    }

    #[test]
    fn test_respawn_waits_for_clear_spawn() {
        let mut state = open_arena();
        state.tank_mut(2).unwrap().take_damage(100, 0.0);
        place(&mut state, 1, 610.0, 310.0, 0.0);

        tick(&mut state, &TickInput::default(), 3.0);
        assert!(!state.tank(2).unwrap().alive);

        place(&mut state, 1, 100.0, 100.0, 0.0);
        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.tank(2).unwrap().alive);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = started();
        let mut state2 = started();

        let inputs = [
            hold(1, Controls {
                turret_left: true,
                shoot: true,
                ..Default::default()
            }),
            hold(2, forward()),
            TickInput::default().with(1, forward()).with(2, shoot()),
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, 1.0 / 60.0);
                tick(&mut state2, input, 1.0 / 60.0);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(
            serde_json::to_string(&state1).unwrap(),
            serde_json::to_string(&state2).unwrap()
        );
    }
}
