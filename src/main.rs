//! Tank Duel entry point
//!
//! Runs a scripted headless match through the same session a browser host
//! would drive, then prints the scoreboard as JSON. Pass a settings JSON path
//! as the first argument to override the arena tuning.

use tank_duel::sim::GameEvent;
use tank_duel::ui::Scoreboard;
use tank_duel::{ArenaSettings, Session};

/// Simulated frame spacing (60 Hz)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Length of the demo match in seconds
const DEMO_SECONDS: f64 = 20.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tank Duel (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => ArenaSettings::load(&path).unwrap_or_else(|e| {
            log::error!("{e}; falling back to default arena");
            ArenaSettings::default()
        }),
        None => ArenaSettings::default(),
    };

    let mut session = match Session::new(settings) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Cannot start match: {e}");
            std::process::exit(1);
        }
    };
    session.start();

    let frames = (DEMO_SECONDS * 1000.0 / FRAME_MS) as u64;
    for frame in 0..=frames {
        drive_player_one(&mut session);
        session.frame(frame as f64 * FRAME_MS);

        for event in &session.state().events {
            match event {
                GameEvent::TankDestroyed { tank, killer } => {
                    log::info!("t={:.2}s tank {} destroyed (killer: {:?})", session.state().clock, tank, killer)
                }
                GameEvent::TankRespawned { tank } => {
                    log::info!("t={:.2}s tank {} back in play", session.state().clock, tank)
                }
                _ => log::debug!("{:?}", event),
            }
        }
    }

    let board = Scoreboard::from_state(session.state());
    match serde_json::to_string_pretty(&board) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode scoreboard: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host embeds the library and drives `Session::frame` itself
}

/// Swing player one's turret toward +x, then hold the trigger
fn drive_player_one(session: &mut Session) {
    let Some(tank) = session.state().tank(1) else {
        return;
    };
    let aim = tank_duel::normalize_angle(tank.turret_angle);
    let on_target = !(0.05..=std::f32::consts::TAU - 0.05).contains(&aim);

    if on_target {
        session.key_up("KeyQ");
        session.key_down("Space");
    } else {
        session.key_down("KeyQ");
        session.key_up("Space");
    }
}
