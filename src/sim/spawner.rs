//! Obstacle pair spawning
//!
//! A pair is two full-height solid bodies separated by a vertical gap, plus a
//! thin score trigger between them. The layout math is pure so it can be
//! checked without a physics world.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;

/// Placement of one obstacle pair at spawn time (centres, playfield units)
#[derive(Debug, Clone, PartialEq)]
pub struct PairLayout {
    /// Height of the gap's upper edge (bottom of the upper body)
    pub random_y: f32,
    pub gap: f32,
    pub upper_center: Vec2,
    pub lower_center: Vec2,
    pub trigger_center: Vec2,
    /// Size of the upper and lower bodies
    pub body_size: Vec2,
    pub trigger_size: Vec2,
}

impl PairLayout {
    /// Lay out a pair whose gap's upper edge sits at `random_y`
    pub fn compute(config: &GameConfig, random_y: f32) -> Self {
        let h = config.playfield_height;
        let w = config.obstacle_width;
        let gap = config.gap();
        // Just beyond the right edge
        let x = config.playfield_width + w;

        Self {
            random_y,
            gap,
            upper_center: Vec2::new(x, random_y + h / 2.0),
            lower_center: Vec2::new(x, random_y - gap - h / 2.0),
            trigger_center: Vec2::new(x, h / 2.0),
            body_size: Vec2::new(w, h),
            trigger_size: Vec2::new(1.0, h),
        }
    }

    /// Draw the gap edge from the configured band and lay out the pair
    pub fn random(config: &GameConfig, rng: &mut Pcg32) -> Self {
        let (min_y, max_y) = spawn_band(config);
        let random_y = if max_y > min_y {
            rng.random_range(min_y..=max_y)
        } else {
            min_y
        };
        Self::compute(config, random_y)
    }

    pub fn upper_bottom(&self) -> f32 {
        self.upper_center.y - self.body_size.y / 2.0
    }

    pub fn lower_top(&self) -> f32 {
        self.lower_center.y + self.body_size.y / 2.0
    }

    /// Vertical centre of the gap
    pub fn gap_center(&self) -> f32 {
        self.random_y - self.gap / 2.0
    }
}

/// Range the gap's upper edge is drawn from
pub fn spawn_band(config: &GameConfig) -> (f32, f32) {
    (
        config.band_min * config.playfield_height,
        config.band_max * config.playfield_height,
    )
}

/// Leftward translation every spawned body receives
pub fn travel_delta(config: &GameConfig) -> Vec2 {
    Vec2::new(-config.travel_distance(), 0.0)
}
