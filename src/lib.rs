//! Flappy - headless gameplay core for a flappy-bird style side-scroller
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle spawning, scoring, session state)
//! - `scene`: Menu/session presentation and transitions
//! - `config`: Data-driven game tuning

pub mod config;
pub mod scene;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use scene::{Director, MenuScene, Scene};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the fixed-step clock
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Slack when comparing accumulated timer time against a period
    pub const TIMER_EPSILON: f32 = 1e-4;
    /// Most firings a repeating timer reports for one advance; the rest of the backlog is dropped
    pub const MAX_TIMER_FIRES: u32 = 8;
}
