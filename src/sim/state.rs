//! Game session state and core simulation types
//!
//! A `GameSession` owns everything that lives for one run: the player, the
//! obstacle pairs, their scheduled motion, the timers and the score. It is
//! created fresh for every run and dropped when the run ends.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actions::{MotionScheduler, RepeatingTimer};
use super::collision::Shape;
use super::contact::{ContactOutcome, EntityTag, classify};
use super::difficulty::DifficultyRamp;
use super::physics::{BodyDesc, BodyId, ContactBegin, PhysicsBackend, PhysicsWorld};
use super::spawner::{PairLayout, travel_delta};
use crate::config::GameConfig;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Run in progress
    Active,
    /// Run ended; absorbing
    Terminated,
}

/// Something that happened during a tick, for HUD/sound/logging frontends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Flapped,
    PairSpawned { pair_id: u32, gap_y: f32 },
    PairRemoved { pair_id: u32 },
    Scored { score: u32 },
    SpeedIncreased { traversal: f32 },
    GameOver { score: u32 },
}

/// What a frontend should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Bird,
    PipeUp,
    PipeDown,
    Ground,
    /// Invisible; only reported for debug overlays
    ScoreZone,
}

/// A node in the session's scene, backed by one physics body
#[derive(Debug, Clone)]
pub struct Entity {
    pub body: BodyId,
    pub tag: EntityTag,
    pub sprite: SpriteKind,
    pub size: Vec2,
    /// Obstacle pair this entity belongs to
    pub pair_id: Option<u32>,
}

/// Render snapshot of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub center: Vec2,
    pub size: Vec2,
}

/// One run of the game
#[derive(Debug)]
pub struct GameSession<P: PhysicsBackend = PhysicsWorld> {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    phase: SessionPhase,
    score: u32,
    traversal_duration: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds since the session started
    pub elapsed: f32,
    input_enabled: bool,
    physics: P,
    player: Entity,
    ground: Entity,
    /// Spawned obstacle bodies and triggers, in spawn order
    entities: Vec<Entity>,
    motions: MotionScheduler,
    spawn_timer: RepeatingTimer,
    ramp: DifficultyRamp,
    events: Vec<GameEvent>,
    contacts: Vec<ContactBegin>,
    next_pair_id: u32,
}

impl GameSession<PhysicsWorld> {
    /// Start a session on the built-in physics world
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let gravity = Vec2::new(0.0, config.gravity_accel());
        Self::with_backend(config, seed, PhysicsWorld::new(gravity))
    }
}

impl<P: PhysicsBackend> GameSession<P> {
    /// Start a session on a caller-provided physics backend
    pub fn with_backend(config: GameConfig, seed: u64, mut physics: P) -> Self {
        let w = config.playfield_width;
        let h = config.playfield_height;

        let ground_size = Vec2::new(w, config.ground_thickness);
        let ground_body = physics.create_body(
            BodyDesc::fixed(Shape::rect(ground_size.x, ground_size.y))
                .with_position(Vec2::new(w / 2.0, config.ground_thickness / 2.0))
                .with_masks(
                    EntityTag::Ground.category(),
                    EntityTag::Ground.contact_mask(),
                    EntityTag::Ground.collision_mask(),
                ),
        );
        let ground = Entity {
            body: ground_body,
            tag: EntityTag::Ground,
            sprite: SpriteKind::Ground,
            size: ground_size,
            pair_id: None,
        };

        // A third of the width left of centre, halfway up
        let player_start = Vec2::new(w / 2.0 - w / 3.0, h / 2.0);
        let player_body = physics.create_body(
            BodyDesc::dynamic(Shape::circle(config.player_radius()))
                .with_position(player_start)
                .with_masks(
                    EntityTag::Player.category(),
                    EntityTag::Player.contact_mask(),
                    EntityTag::Player.collision_mask(),
                ),
        );
        let player = Entity {
            body: player_body,
            tag: EntityTag::Player,
            sprite: SpriteKind::Bird,
            size: Vec2::splat(config.player_height),
            pair_id: None,
        };

        log::info!("Session started (seed {})", seed);

        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            phase: SessionPhase::Active,
            score: 0,
            traversal_duration: config.initial_traversal,
            time_ticks: 0,
            elapsed: 0.0,
            input_enabled: true,
            physics,
            player,
            ground,
            entities: Vec::new(),
            motions: MotionScheduler::new(),
            spawn_timer: RepeatingTimer::new(config.spawn_interval),
            ramp: DifficultyRamp::new(&config),
            events: Vec::new(),
            contacts: Vec::new(),
            next_pair_id: 1,
            config,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_run_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds a newly spawned pair takes to cross the playfield
    pub fn traversal_duration(&self) -> f32 {
        self.traversal_duration
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Mutable backend access, for hosts that drive bodies directly
    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn ground(&self) -> &Entity {
        &self.ground
    }

    pub fn player_position(&self) -> Vec2 {
        self.physics.position(self.player.body).unwrap_or(Vec2::ZERO)
    }

    pub fn player_velocity(&self) -> Vec2 {
        self.physics.velocity(self.player.body).unwrap_or(Vec2::ZERO)
    }

    /// Spawned obstacle bodies and triggers
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of obstacle pairs currently in the scene
    pub fn pair_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.tag == EntityTag::ScoreTrigger)
            .count()
    }

    pub fn motions(&self) -> &MotionScheduler {
        &self.motions
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add a spawned entity to the scene
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove a spawned entity and its body; returns it if it was present
    pub fn remove_entity(&mut self, body: BodyId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.body == body)?;
        let entity = self.entities.remove(idx);
        self.motions.cancel(body);
        self.physics.remove_body(body);
        Some(entity)
    }

    /// Primary action: reset vertical motion and flap upward
    pub fn on_input(&mut self) {
        if !self.is_run_active() || !self.input_enabled {
            return;
        }
        let body = self.player.body;
        self.physics.set_velocity(body, Vec2::ZERO);
        self.physics
            .apply_impulse(body, Vec2::new(0.0, self.config.flap_impulse), self.config.player_mass);
        self.events.push(GameEvent::Flapped);
    }

    /// Apply the outcome of two tagged bodies touching
    pub fn on_contact(&mut self, a: EntityTag, b: EntityTag) -> ContactOutcome {
        if !self.is_run_active() {
            return ContactOutcome::Ignore;
        }
        let outcome = classify(a, b);
        match outcome {
            ContactOutcome::IncrementScore => {
                self.score += 1;
                log::debug!("Score {}", self.score);
                self.events.push(GameEvent::Scored { score: self.score });
            }
            ContactOutcome::TerminateRun => self.terminate(),
            ContactOutcome::Ignore => {}
        }
        outcome
    }

    /// Advance timers, scheduled motion and physics by one step
    pub fn on_tick(&mut self, dt: f32) {
        if !self.is_run_active() {
            return;
        }
        self.time_ticks += 1;
        self.elapsed += dt;

        for body in self.motions.advance(dt, &mut self.physics) {
            if let Some(entity) = self.remove_entity(body) {
                // The trigger goes last of the three; report the pair once
                if entity.tag == EntityTag::ScoreTrigger {
                    if let Some(pair_id) = entity.pair_id {
                        self.events.push(GameEvent::PairRemoved { pair_id });
                    }
                }
            }
        }

        for _ in 0..self.spawn_timer.advance(dt) {
            self.spawn_pair();
        }

        if let Some(traversal) = self.ramp.advance(dt) {
            self.traversal_duration = traversal;
            log::debug!("Traversal duration now {:.2}s", traversal);
            self.events.push(GameEvent::SpeedIncreased { traversal });
        }

        let mut contacts = std::mem::take(&mut self.contacts);
        contacts.clear();
        self.physics.step(dt, &mut contacts);
        for contact in &contacts {
            if !self.is_run_active() {
                break;
            }
            let (Some(a), Some(b)) = (
                EntityTag::from_category(contact.category_a),
                EntityTag::from_category(contact.category_b),
            ) else {
                continue;
            };
            self.on_contact(a, b);
        }
        self.contacts = contacts;
    }

    /// Create one obstacle pair and schedule its motion
    pub fn spawn_pair(&mut self) -> PairLayout {
        let layout = PairLayout::random(&self.config, &mut self.rng);
        self.spawn_pair_at(layout.clone());
        layout
    }

    /// Create an obstacle pair with a known layout
    pub fn spawn_pair_at(&mut self, layout: PairLayout) -> u32 {
        let pair_id = self.next_pair_id;
        self.next_pair_id += 1;

        let parts = [
            (EntityTag::Obstacle, SpriteKind::PipeUp, layout.upper_center, layout.body_size),
            (EntityTag::Obstacle, SpriteKind::PipeDown, layout.lower_center, layout.body_size),
            (EntityTag::ScoreTrigger, SpriteKind::ScoreZone, layout.trigger_center, layout.trigger_size),
        ];
        let delta = travel_delta(&self.config);
        for (tag, sprite, center, size) in parts {
            let body = self.physics.create_body(
                BodyDesc::fixed(Shape::rect(size.x, size.y))
                    .with_position(center)
                    .with_masks(tag.category(), tag.contact_mask(), tag.collision_mask()),
            );
            self.motions
                .schedule_translate(body, center, delta, self.traversal_duration);
            self.add_entity(Entity {
                body,
                tag,
                sprite,
                size,
                pair_id: Some(pair_id),
            });
        }

        log::debug!("Spawned pair {} with gap edge at {:.1}", pair_id, layout.random_y);
        self.events.push(GameEvent::PairSpawned {
            pair_id,
            gap_y: layout.gap_center(),
        });
        pair_id
    }

    /// End the run: freeze every entity and stop all timers
    pub fn terminate(&mut self) {
        if !self.is_run_active() {
            return;
        }
        self.phase = SessionPhase::Terminated;
        self.input_enabled = false;
        self.physics.set_velocity(self.player.body, Vec2::ZERO);

        self.motions.cancel(self.player.body);
        for entity in &self.entities {
            self.motions.cancel(entity.body);
        }
        self.spawn_timer.stop();
        self.ramp.stop();

        log::info!("Run over with score {} after {:.1}s", self.score, self.elapsed);
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    /// Everything a frontend needs to draw this frame
    pub fn sprites(&self) -> Vec<Sprite> {
        std::iter::once(&self.ground)
            .chain(self.entities.iter())
            .chain(std::iter::once(&self.player))
            .filter_map(|e| {
                self.physics.position(e.body).map(|center| Sprite {
                    kind: e.sprite,
                    center,
                    size: e.size,
                })
            })
            .collect()
    }

    /// HUD text for the score label
    pub fn score_label(&self) -> String {
        self.score.to_string()
    }
}
