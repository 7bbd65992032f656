//! Scheduled actions: timed translations and repeating timers
//!
//! A motion moves one body linearly over a fixed duration, then reports the
//! body as finished so its owner can remove it. Motions are keyed by body and
//! can be cancelled individually.

use glam::Vec2;

use super::physics::{BodyId, PhysicsBackend};
use crate::consts::{MAX_TIMER_FIRES, TIMER_EPSILON};

/// A linear translate-then-remove action on one body
#[derive(Debug, Clone)]
pub struct Motion {
    pub body: BodyId,
    pub from: Vec2,
    pub delta: Vec2,
    pub duration: f32,
    pub elapsed: f32,
}

impl Motion {
    /// Fraction of the motion completed (0-1)
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + TIMER_EPSILON >= self.duration
    }

    fn position(&self) -> Vec2 {
        self.from + self.delta * self.progress()
    }
}

/// All in-flight motions of a session
#[derive(Debug, Clone, Default)]
pub struct MotionScheduler {
    motions: Vec<Motion>,
}

impl MotionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `body` by `delta` over `duration` seconds, starting at `from`
    pub fn schedule_translate(&mut self, body: BodyId, from: Vec2, delta: Vec2, duration: f32) {
        self.motions.push(Motion {
            body,
            from,
            delta,
            duration: duration.max(TIMER_EPSILON),
            elapsed: 0.0,
        });
    }

    /// Advance every motion, write positions to the backend, and return the
    /// bodies whose motion completed this step
    pub fn advance<P: PhysicsBackend>(&mut self, dt: f32, physics: &mut P) -> Vec<BodyId> {
        let mut finished = Vec::new();
        for motion in &mut self.motions {
            motion.elapsed += dt;
            physics.set_position(motion.body, motion.position());
            if motion.is_finished() {
                finished.push(motion.body);
            }
        }
        self.motions.retain(|m| !m.is_finished());
        finished
    }

    /// Stop all scheduled motion for one body; returns whether any was running
    pub fn cancel(&mut self, body: BodyId) -> bool {
        let before = self.motions.len();
        self.motions.retain(|m| m.body != body);
        self.motions.len() != before
    }

    pub fn get(&self, body: BodyId) -> Option<&Motion> {
        self.motions.iter().find(|m| m.body == body)
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }
}

/// Timer that fires every `period` seconds until stopped
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    period: f32,
    elapsed: f32,
    running: bool,
}

impl RepeatingTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
            running: true,
        }
    }

    /// Advance the timer, returning how many times it fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running || self.period <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed + TIMER_EPSILON >= self.period {
            if fired == MAX_TIMER_FIRES {
                self.elapsed = self.elapsed.rem_euclid(self.period);
                log::warn!("Timer with period {} fell behind; dropping backlog", self.period);
                break;
            }
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
