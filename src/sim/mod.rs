//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod actions;
pub mod collision;
pub mod contact;
pub mod difficulty;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use actions::{Motion, MotionScheduler, RepeatingTimer};
pub use collision::{CollisionResult, Shape, shape_collision};
pub use contact::{ContactOutcome, EntityTag, classify};
pub use difficulty::DifficultyRamp;
pub use physics::{BodyDesc, BodyId, ContactBegin, PhysicsBackend, PhysicsWorld};
pub use spawner::{PairLayout, spawn_band, travel_delta};
pub use state::{Entity, GameEvent, GameSession, SessionPhase, Sprite, SpriteKind};
pub use tick::{FixedStep, TickInput, tick};
