//! Difficulty ramp: obstacles cross the playfield faster over time
//!
//! One ramp exists per session. It owns a single repeating timer, started when
//! the session is created, and never compounds with the spawn cadence.

use super::actions::RepeatingTimer;
use crate::config::GameConfig;

#[derive(Debug, Clone)]
pub struct DifficultyRamp {
    timer: RepeatingTimer,
    initial: f32,
    floor: f32,
    step: f32,
    /// Number of times the ramp has fired
    steps: u32,
}

impl DifficultyRamp {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            timer: RepeatingTimer::new(config.ramp_interval),
            initial: config.initial_traversal,
            floor: config.traversal_floor,
            step: config.ramp_step,
            steps: 0,
        }
    }

    /// Current traversal duration
    ///
    /// Derived from the step count so repeated decrements do not drift.
    pub fn traversal_duration(&self) -> f32 {
        if self.initial <= self.floor {
            return self.initial;
        }
        (self.initial - self.step * self.steps as f32).max(self.floor)
    }

    pub fn at_floor(&self) -> bool {
        self.traversal_duration() <= self.floor
    }

    /// Advance the ramp; returns the new duration if it changed
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        let fired = self.timer.advance(dt);
        let before = self.traversal_duration();
        for _ in 0..fired {
            if self.at_floor() {
                break;
            }
            self.steps += 1;
        }
        let after = self.traversal_duration();
        (after < before).then_some(after)
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn run(ramp: &mut DifficultyRamp, seconds: f32) {
        let ticks = (seconds / SIM_DT).round() as u32;
        for _ in 0..ticks {
            ramp.advance(SIM_DT);
        }
    }

    #[test]
    fn test_first_step_after_ten_seconds() {
        let mut ramp = DifficultyRamp::new(&GameConfig::default());
        assert_eq!(ramp.traversal_duration(), 4.0);

        run(&mut ramp, 9.9);
        assert_eq!(ramp.traversal_duration(), 4.0);

        run(&mut ramp, 0.1);
        assert!((ramp.traversal_duration() - 3.8).abs() < 1e-5);
    }

    #[test]
    fn test_floor_after_hundred_seconds() {
        let mut ramp = DifficultyRamp::new(&GameConfig::default());
        run(&mut ramp, 100.0);
        assert_eq!(ramp.traversal_duration(), 2.0);
        run(&mut ramp, 100.0);
        assert_eq!(ramp.traversal_duration(), 2.0);
        assert!(ramp.at_floor());
    }

    #[test]
    fn test_reports_changes_only() {
        let mut ramp = DifficultyRamp::new(&GameConfig::default());
        assert_eq!(ramp.advance(5.0), None);
        let changed = ramp.advance(5.0).unwrap();
        assert!((changed - 3.8).abs() < 1e-5);
    }

    #[test]
    fn test_stopped_ramp_holds() {
        let mut ramp = DifficultyRamp::new(&GameConfig::default());
        ramp.stop();
        assert_eq!(ramp.advance(50.0), None);
        assert_eq!(ramp.traversal_duration(), 4.0);
    }

    proptest! {
        #[test]
        fn prop_monotone_and_floored(steps in prop::collection::vec(0.0f32..3.0, 1..200)) {
            let mut ramp = DifficultyRamp::new(&GameConfig::default());
            let mut last = ramp.traversal_duration();
            for dt in steps {
                ramp.advance(dt);
                let now = ramp.traversal_duration();
                prop_assert!(now <= last);
                prop_assert!(now >= 2.0);
                last = now;
            }
        }
    }
}
