//! Overlap tests for the headless physics world
//!
//! Bodies are circles or axis-aligned rectangles, positioned by their centre.
//! A hit reports the normal along which the first shape must move to separate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Shape {
    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Rect {
            half_extents: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Separation direction for the first shape
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check two placed shapes against each other
pub fn shape_collision(a: &Shape, a_pos: Vec2, b: &Shape, b_pos: Vec2) -> CollisionResult {
    match (*a, *b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle_collision(a_pos, ra, b_pos, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect_collision(a_pos, radius, b_pos, half_extents)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            let mut result = circle_rect_collision(b_pos, radius, a_pos, half_extents);
            result.normal = -result.normal;
            result
        }
        (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
            rect_rect_collision(a_pos, ha, b_pos, hb)
        }
    }
}

pub fn circle_circle_collision(a_pos: Vec2, ra: f32, b_pos: Vec2, rb: f32) -> CollisionResult {
    let delta = a_pos - b_pos;
    let dist = delta.length();
    if dist >= ra + rb {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        normal: delta.try_normalize().unwrap_or(Vec2::Y),
        penetration: ra + rb - dist,
    }
}

/// Circle against an axis-aligned rectangle
///
/// Finds the closest point of the rectangle to the circle centre. When the
/// centre is inside the rectangle the shallowest face is used instead.
pub fn circle_rect_collision(
    center: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let local = center - rect_center;
    let closest = local.clamp(-half_extents, half_extents);
    let offset = local - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Centre inside the rectangle
    let depth = half_extents - local.abs();
    if depth.x < depth.y {
        CollisionResult {
            hit: true,
            normal: Vec2::new(local.x.signum(), 0.0),
            penetration: depth.x + radius,
        }
    } else {
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, local.y.signum()),
            penetration: depth.y + radius,
        }
    }
}

pub fn rect_rect_collision(a_pos: Vec2, ha: Vec2, b_pos: Vec2, hb: Vec2) -> CollisionResult {
    let delta = a_pos - b_pos;
    let overlap = (ha + hb) - delta.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return CollisionResult::miss();
    }
    if overlap.x < overlap.y {
        CollisionResult {
            hit: true,
            normal: Vec2::new(sign_or_one(delta.x), 0.0),
            penetration: overlap.x,
        }
    } else {
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, sign_or_one(delta.y)),
            penetration: overlap.y,
        }
    }
}

#[inline]
fn sign_or_one(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Remove the part of a velocity that points into a surface
#[inline]
pub fn cancel_into_surface(velocity: Vec2, normal: Vec2) -> Vec2 {
    let into = velocity.dot(normal);
    if into < 0.0 { velocity - into * normal } else { velocity }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_above_rect() {
        // Rect spanning y in [-5, 5], circle of radius 4 centred at y = 8
        let result = circle_rect_collision(Vec2::new(0.0, 8.0), 4.0, Vec2::ZERO, Vec2::new(10.0, 5.0));
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_misses_corner() {
        // Diagonal distance to the corner is ~4.24, larger than the radius
        let result = circle_rect_collision(Vec2::new(13.0, 8.0), 4.0, Vec2::ZERO, Vec2::new(10.0, 5.0));
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_inside_rect_uses_shallow_face() {
        let result = circle_rect_collision(Vec2::new(9.0, 0.0), 2.0, Vec2::ZERO, Vec2::new(10.0, 5.0));
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_circle_flips_normal() {
        let rect = Shape::rect(20.0, 10.0);
        let circle = Shape::circle(4.0);
        let result = shape_collision(&rect, Vec2::ZERO, &circle, Vec2::new(0.0, 8.0));
        assert!(result.hit);
        assert_eq!(result.normal, -Vec2::Y);
    }

    #[test]
    fn test_rect_rect() {
        let hit = rect_rect_collision(Vec2::new(9.0, 0.0), Vec2::splat(5.0), Vec2::ZERO, Vec2::splat(5.0));
        assert!(hit.hit);
        assert_eq!(hit.normal, Vec2::X);

        let touching = rect_rect_collision(Vec2::new(10.0, 0.0), Vec2::splat(5.0), Vec2::ZERO, Vec2::splat(5.0));
        assert!(!touching.hit);
    }

    #[test]
    fn test_cancel_into_surface() {
        let v = cancel_into_surface(Vec2::new(3.0, -10.0), Vec2::Y);
        assert_eq!(v, Vec2::new(3.0, 0.0));
        // Moving away is untouched
        let v = cancel_into_surface(Vec2::new(3.0, 10.0), Vec2::Y);
        assert_eq!(v, Vec2::new(3.0, 10.0));
    }
}
