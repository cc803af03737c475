//! Frame clock
//!
//! Converts the host's frame timestamps (milliseconds, e.g. from
//! `requestAnimationFrame`) into the seconds-per-tick the simulation consumes.

use crate::consts::MAX_FRAME_DELTA;

/// Turns monotonically increasing timestamps into simulation deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    running: bool,
    last_time: Option<f64>,
    /// Longest delta handed out; a stalled tab resumes with this instead
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA)
    }
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            running: false,
            last_time: None,
            max_delta,
        }
    }

    /// Begin (or resume) handing out deltas; the next timestamp only sets the baseline
    pub fn start(&mut self) {
        self.running = true;
        self.last_time = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_time = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record a frame timestamp and return the seconds to simulate, if any
    pub fn advance(&mut self, time_ms: f64) -> Option<f32> {
        if !self.running {
            return None;
        }

        let previous = self.last_time.replace(time_ms)?;
        let dt = ((time_ms - previous) / 1000.0).max(0.0) as f32;
        if dt > self.max_delta {
            log::debug!("Frame delta {:.3}s clamped to {:.3}s", dt, self.max_delta);
        }
        Some(dt.min(self.max_delta))
    }
}
