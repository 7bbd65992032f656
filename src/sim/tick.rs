//! Fixed timestep simulation tick
//!
//! Applies one tick's input to a session and advances it. Also hosts the
//! fixed-step frame clock and the autopilot used by the demo runner.

use glam::Vec2;

use super::contact::EntityTag;
use super::physics::PhysicsBackend;
use super::state::GameSession;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Primary action (tap/click/space)
    pub flap: bool,
    /// Pointer press position in playfield coordinates
    pub tap: Option<Vec2>,
    /// Demo mode - the game plays itself
    pub autopilot: bool,
}

impl TickInput {
    pub fn flap() -> Self {
        Self {
            flap: true,
            ..Default::default()
        }
    }

    pub fn tap(at: Vec2) -> Self {
        Self {
            tap: Some(at),
            ..Default::default()
        }
    }

    /// Whether this input counts as the primary action
    pub fn primary_action(&self) -> bool {
        self.flap || self.tap.is_some()
    }
}

/// Advance a session by one fixed timestep
///
/// Input is applied before motion so a flap affects this tick's integration.
pub fn tick<P: PhysicsBackend>(session: &mut GameSession<P>, input: &TickInput, dt: f32) {
    if !session.is_run_active() {
        return;
    }

    let wants_flap = if input.autopilot {
        autopilot_wants_flap(session)
    } else {
        input.primary_action()
    };
    if wants_flap {
        session.on_input();
    }

    session.on_tick(dt);
}

/// Autopilot: keep the player hovering just below the centre of the next gap
fn autopilot_wants_flap<P: PhysicsBackend>(session: &GameSession<P>) -> bool {
    let pos = session.player_position();
    let vel = session.player_velocity();
    let config = &session.config;
    let radius = config.player_radius();

    // The nearest trigger still ahead of the player's back edge marks the next gap
    let next_pair = session
        .entities()
        .iter()
        .filter(|e| e.tag == EntityTag::ScoreTrigger)
        .filter_map(|e| {
            let x = session.physics().position(e.body)?.x;
            (x + config.obstacle_width / 2.0 > pos.x - radius).then_some((x, e.pair_id))
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .and_then(|(_, pair_id)| pair_id);

    let target = next_pair
        .and_then(|pair_id| {
            session
                .entities()
                .iter()
                .find(|e| e.pair_id == Some(pair_id) && e.tag == EntityTag::Obstacle)
                .and_then(|upper| {
                    let center = session.physics().position(upper.body)?;
                    // Upper body centre sits half a playfield above the gap edge
                    let gap_edge = center.y - upper.size.y / 2.0;
                    Some(gap_edge - config.gap() * 0.7)
                })
        })
        .unwrap_or(config.playfield_height / 2.0);

    pos.y < target && vel.y <= 0.0
}

/// Fixed-step clock: turns variable frame times into whole simulation steps
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time; returns how many `SIM_DT` steps to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop whatever the substep cap left behind
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Leftover fraction of a step, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{GameEvent, SessionPhase};

    #[test]
    fn test_flap_input_lifts_player() {
        let mut session = GameSession::new(GameConfig::default(), 12345);
        tick(&mut session, &TickInput::flap(), SIM_DT);
        assert!(session.player_velocity().y > 0.0);
        assert!(session.drain_events().contains(&GameEvent::Flapped));

        // Without input gravity takes over
        for _ in 0..60 {
            tick(&mut session, &TickInput::default(), SIM_DT);
        }
        assert!(session.player_velocity().y < 0.0);
    }

    #[test]
    fn test_tap_counts_as_flap() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        tick(&mut session, &TickInput::tap(Vec2::new(10.0, 10.0)), SIM_DT);
        assert!(session.player_velocity().y > 0.0);
    }

    #[test]
    fn test_no_input_dies_on_ground() {
        let mut session = GameSession::new(GameConfig::default(), 2);
        for _ in 0..240 {
            tick(&mut session, &TickInput::default(), SIM_DT);
        }
        assert_eq!(session.phase(), SessionPhase::Terminated);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay identical
        let mut session1 = GameSession::new(GameConfig::default(), 99999);
        let mut session2 = GameSession::new(GameConfig::default(), 99999);

        for i in 0..600 {
            let input = TickInput {
                flap: i % 25 == 0,
                ..Default::default()
            };
            tick(&mut session1, &input, SIM_DT);
            tick(&mut session2, &input, SIM_DT);
        }

        assert_eq!(session1.time_ticks, session2.time_ticks);
        assert_eq!(session1.score(), session2.score());
        assert_eq!(session1.sprites(), session2.sprites());
        assert_eq!(session1.drain_events(), session2.drain_events());
    }

    #[test]
    fn test_autopilot_keeps_flying() {
        let mut session = GameSession::new(GameConfig::default(), 4);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        // Before any pair reaches the player the autopilot only has to avoid the ground
        for _ in 0..120 {
            tick(&mut session, &input, SIM_DT);
        }
        assert!(session.is_run_active());
    }

    #[test]
    fn test_fixed_step() {
        let mut clock = FixedStep::new();
        assert_eq!(clock.advance(SIM_DT * 2.5), 2);
        assert!((clock.alpha() - 0.5).abs() < 0.01);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);

        // Huge frame times are clamped and capped
        assert!(clock.advance(10.0) <= MAX_SUBSTEPS);
        assert!(clock.alpha() <= 1.0 + 1e-4);
    }
}
