//! Game tuning and configuration
//!
//! Every gameplay constant lives here so a frontend can load a JSON file
//! instead of recompiling. Missing keys fall back to the defaults.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;

/// Errors raised while loading a configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io(std::io::Error),
    /// The contents were not valid JSON for `GameConfig`
    Parse(serde_json::Error),
    /// A value is out of range (field name, reason)
    Invalid(&'static str, &'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {}", err),
            ConfigError::Parse(err) => write!(f, "failed to parse config: {}", err),
            ConfigError::Invalid(field, reason) => write!(f, "invalid config `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(..) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Gameplay tuning
///
/// Distances are in playfield units (origin bottom-left, y up), times in seconds.
/// Gravity, impulse and mass are empirical and carry no physical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Height of the ground strip along the bottom edge
    pub ground_thickness: f32,

    // === Player ===
    /// Player sprite height; the collision circle has half this as radius
    pub player_height: f32,
    /// Downward pull (multiplied by `world_scale`)
    pub gravity: f32,
    /// Points per gravity unit
    pub world_scale: f32,
    /// Upward impulse applied on every flap
    pub flap_impulse: f32,
    pub player_mass: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    /// Vertical gap as a multiple of player height
    pub gap_factor: f32,
    /// Lower bound of the gap's upper edge, as a fraction of playfield height
    pub band_min: f32,
    /// Upper bound of the gap's upper edge, as a fraction of playfield height
    pub band_max: f32,
    /// Seconds between obstacle pairs
    pub spawn_interval: f32,

    // === Difficulty ===
    /// Seconds for a pair to cross the playfield at session start
    pub initial_traversal: f32,
    /// Traversal duration never drops below this
    pub traversal_floor: f32,
    /// Seconds between speed-ups
    pub ramp_interval: f32,
    /// Traversal seconds removed on each speed-up
    pub ramp_step: f32,

    // === Presentation ===
    /// Cross-fade length between menu and session
    pub transition_duration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: 480.0,
            playfield_height: 640.0,
            ground_thickness: 10.0,

            player_height: 24.0,
            gravity: -5.0,
            world_scale: 100.0,
            flap_impulse: 40.0,
            player_mass: 0.2,

            obstacle_width: 52.0,
            gap_factor: 4.0,
            band_min: 0.2,
            band_max: 0.7,
            spawn_interval: 2.0,

            initial_traversal: 4.0,
            traversal_floor: 2.0,
            ramp_interval: 10.0,
            ramp_step: 0.2,

            transition_duration: 1.0,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    ///
    /// A gap that does not fit the spawn band is allowed and only logged:
    /// such pairs may be impassable but the game still runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("player_height", self.player_height),
            ("player_mass", self.player_mass),
            ("obstacle_width", self.obstacle_width),
            ("spawn_interval", self.spawn_interval),
            ("initial_traversal", self.initial_traversal),
            ("traversal_floor", self.traversal_floor),
            ("ramp_interval", self.ramp_interval),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(field, "must be positive"));
            }
        }
        // A timer period shorter than one tick cannot be honoured
        for (field, value) in [
            ("spawn_interval", self.spawn_interval),
            ("ramp_interval", self.ramp_interval),
        ] {
            if value < SIM_DT {
                return Err(ConfigError::Invalid(field, "must be at least one tick"));
            }
        }
        if self.ramp_step < 0.0 {
            return Err(ConfigError::Invalid("ramp_step", "must not be negative"));
        }
        if self.band_min > self.band_max {
            return Err(ConfigError::Invalid("band_min", "must not exceed band_max"));
        }

        let band_low = self.band_min * self.playfield_height;
        if band_low - self.gap() < self.ground_thickness {
            log::warn!(
                "Gap {:.1} reaches into the ground when the gap edge sits at {:.1}",
                self.gap(),
                band_low
            );
        }
        Ok(())
    }

    /// Vertical gap between the two bodies of a pair
    pub fn gap(&self) -> f32 {
        self.player_height * self.gap_factor
    }

    /// Radius of the player's collision circle
    pub fn player_radius(&self) -> f32 {
        self.player_height / 2.0
    }

    /// Gravity acceleration in playfield units per second squared
    pub fn gravity_accel(&self) -> f32 {
        self.gravity * self.world_scale
    }

    /// Vertical speed the player has right after a flap
    pub fn flap_velocity(&self) -> f32 {
        self.flap_impulse / self.player_mass
    }

    /// Distance an obstacle travels before it is removed
    pub fn travel_distance(&self) -> f32 {
        self.playfield_width + self.obstacle_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "spawn_interval": 1.5 }"#).unwrap();
        assert_eq!(config.spawn_interval, 1.5);
        assert_eq!(config.initial_traversal, 4.0);
        assert_eq!(config.gap(), 96.0);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = GameConfig::from_json(r#"{ "ramp_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("ramp_interval", _)));
    }

    #[test]
    fn test_rejects_sub_tick_intervals() {
        let err = GameConfig::from_json(r#"{ "spawn_interval": 1e-30 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("spawn_interval", _)));
        let err = GameConfig::from_json(r#"{ "ramp_interval": 0.01 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("ramp_interval", _)));
        assert!(GameConfig::from_json(r#"{ "spawn_interval": 0.5 }"#).is_ok());
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse config"));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_roundtrip_through_json() {
        let config = GameConfig {
            gap_factor: 5.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }
}
