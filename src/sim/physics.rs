//! Physics provider interface and the built-in headless world
//!
//! The session only talks to `PhysicsBackend`, so a host engine can plug in its
//! own simulation. `PhysicsWorld` is a small deterministic implementation:
//! explicit Euler integration, gravity on dynamic bodies, begin-only contact
//! events and push-out resolution for dynamic bodies.

use std::collections::BTreeSet;

use glam::Vec2;

use super::collision::{Shape, cancel_into_surface, shape_collision};

/// Handle to a body owned by a physics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

/// Description of a body before creation
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub shape: Shape,
    pub position: Vec2,
    /// Dynamic bodies integrate gravity and velocity; static ones only move when repositioned
    pub dynamic: bool,
    pub category: u32,
    /// Categories that produce contact-begin events with this body
    pub contact_mask: u32,
    /// Categories this body is pushed out of (dynamic bodies only)
    pub collision_mask: u32,
}

impl BodyDesc {
    /// A static body with the given shape
    pub fn fixed(shape: Shape) -> Self {
        Self {
            shape,
            position: Vec2::ZERO,
            dynamic: false,
            category: 0,
            contact_mask: 0,
            collision_mask: 0,
        }
    }

    /// A dynamic body with the given shape
    pub fn dynamic(shape: Shape) -> Self {
        Self {
            dynamic: true,
            ..Self::fixed(shape)
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_masks(mut self, category: u32, contact_mask: u32, collision_mask: u32) -> Self {
        self.category = category;
        self.contact_mask = contact_mask;
        self.collision_mask = collision_mask;
        self
    }
}

/// Two bodies started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBegin {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub category_a: u32,
    pub category_b: u32,
}

/// What the gameplay layer needs from a physics engine
pub trait PhysicsBackend {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId;

    /// Remove a body; unknown ids are ignored
    fn remove_body(&mut self, id: BodyId);

    /// Advance the simulation and append the contacts that began this step
    fn step(&mut self, dt: f32, contacts: &mut Vec<ContactBegin>);

    fn position(&self, id: BodyId) -> Option<Vec2>;
    fn set_position(&mut self, id: BodyId, position: Vec2);
    fn velocity(&self, id: BodyId) -> Option<Vec2>;
    fn set_velocity(&mut self, id: BodyId, velocity: Vec2);
    /// Instantaneous velocity change of `impulse / mass`
    fn apply_impulse(&mut self, id: BodyId, impulse: Vec2, mass: f32);
    fn body_count(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Body {
    id: BodyId,
    desc: BodyDesc,
    position: Vec2,
    velocity: Vec2,
}

/// Deterministic headless physics world
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    gravity: Vec2,
    /// Sorted by id for stable iteration
    bodies: Vec<Body>,
    /// Pairs (lower id first) that were touching at the end of the last step
    touching: BTreeSet<(BodyId, BodyId)>,
    next_id: u32,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            touching: BTreeSet::new(),
            next_id: 1,
        }
    }

    fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|idx| &self.bodies[idx])
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        match self.bodies.binary_search_by_key(&id, |b| b.id) {
            Ok(idx) => Some(&mut self.bodies[idx]),
            Err(_) => None,
        }
    }

    fn wants_contact(a: &BodyDesc, b: &BodyDesc) -> bool {
        // Two static bodies never report each other
        (a.dynamic || b.dynamic)
            && (a.category & b.contact_mask != 0 || b.category & a.contact_mask != 0)
    }

    fn collides(mover: &BodyDesc, other: &BodyDesc) -> bool {
        mover.dynamic && mover.collision_mask & other.category != 0
    }
}

impl PhysicsBackend for PhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            position: desc.position,
            velocity: Vec2::ZERO,
            desc,
        });
        id
    }

    fn remove_body(&mut self, id: BodyId) {
        if let Ok(idx) = self.bodies.binary_search_by_key(&id, |b| b.id) {
            self.bodies.remove(idx);
            self.touching.retain(|&(a, b)| a != id && b != id);
        }
    }

    fn step(&mut self, dt: f32, contacts: &mut Vec<ContactBegin>) {
        for body in self.bodies.iter_mut().filter(|b| b.desc.dynamic) {
            body.velocity += self.gravity * dt;
            body.position += body.velocity * dt;
        }

        let mut now_touching = BTreeSet::new();
        let mut pushes: Vec<(usize, Vec2, f32)> = Vec::new();

        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                let contact = Self::wants_contact(&a.desc, &b.desc);
                let a_collides = Self::collides(&a.desc, &b.desc);
                let b_collides = Self::collides(&b.desc, &a.desc);
                if !contact && !a_collides && !b_collides {
                    continue;
                }

                let result = shape_collision(&a.desc.shape, a.position, &b.desc.shape, b.position);
                if !result.hit {
                    continue;
                }

                if contact {
                    let key = (a.id, b.id);
                    if !self.touching.contains(&key) {
                        contacts.push(ContactBegin {
                            body_a: a.id,
                            body_b: b.id,
                            category_a: a.desc.category,
                            category_b: b.desc.category,
                        });
                    }
                    now_touching.insert(key);
                }
                if a_collides {
                    pushes.push((i, result.normal, result.penetration));
                }
                if b_collides {
                    pushes.push((j, -result.normal, result.penetration));
                }
            }
        }

        for (idx, normal, depth) in pushes {
            let body = &mut self.bodies[idx];
            body.position += normal * depth;
            body.velocity = cancel_into_surface(body.velocity, normal);
        }

        self.touching = now_touching;
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(|b| b.position)
    }

    fn set_position(&mut self, id: BodyId, position: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.position = position;
        }
    }

    fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.velocity = velocity;
        }
    }

    fn apply_impulse(&mut self, id: BodyId, impulse: Vec2, mass: f32) {
        if let Some(body) = self.body_mut(id) {
            if body.desc.dynamic && mass > 0.0 {
                body.velocity += impulse / mass;
            }
        }
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn ball(world: &mut PhysicsWorld, pos: Vec2) -> BodyId {
        world.create_body(
            BodyDesc::dynamic(Shape::circle(5.0))
                .with_position(pos)
                .with_masks(1, 2 | 4, 4),
        )
    }

    #[test]
    fn test_gravity_integration() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -600.0));
        let id = ball(&mut world, Vec2::new(0.0, 100.0));
        let mut contacts = Vec::new();
        world.step(DT, &mut contacts);

        assert!((world.velocity(id).unwrap().y + 10.0).abs() < 0.001);
        assert!(world.position(id).unwrap().y < 100.0);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_static_bodies_ignore_gravity() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -600.0));
        let wall = world.create_body(BodyDesc::fixed(Shape::rect(10.0, 10.0)).with_position(Vec2::new(50.0, 50.0)));
        let mut contacts = Vec::new();
        for _ in 0..10 {
            world.step(DT, &mut contacts);
        }
        assert_eq!(world.position(wall), Some(Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn test_contact_begins_once() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let id = ball(&mut world, Vec2::new(-20.0, 0.0));
        // Sensor: contact only, no collision
        world.create_body(
            BodyDesc::fixed(Shape::rect(1.0, 100.0)).with_masks(2, 1, 0),
        );
        world.set_velocity(id, Vec2::new(120.0, 0.0));

        let mut contacts = Vec::new();
        for _ in 0..30 {
            world.step(DT, &mut contacts);
        }
        assert_eq!(contacts.len(), 1);
        // Passed straight through
        assert!(world.position(id).unwrap().x > 20.0);
    }

    #[test]
    fn test_collision_pushes_out() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -600.0));
        let id = ball(&mut world, Vec2::new(0.0, 12.0));
        world.create_body(
            BodyDesc::fixed(Shape::rect(200.0, 10.0)).with_masks(4, 0, 0),
        );

        let mut contacts = Vec::new();
        for _ in 0..60 {
            world.step(DT, &mut contacts);
        }
        // Rests on top of the floor (top at y = 5, radius 5)
        assert!(world.position(id).unwrap().y >= 9.9);
        assert!(!contacts.is_empty());
    }

    #[test]
    fn test_static_pairs_are_silent() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.create_body(BodyDesc::fixed(Shape::rect(10.0, 10.0)).with_masks(2, 8, 0));
        world.create_body(BodyDesc::fixed(Shape::rect(10.0, 10.0)).with_masks(8, 2, 0));
        let mut contacts = Vec::new();
        world.step(DT, &mut contacts);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = ball(&mut world, Vec2::ZERO);
        let b = ball(&mut world, Vec2::new(100.0, 0.0));
        world.remove_body(a);
        world.remove_body(a);
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.position(a), None);
        assert!(world.position(b).is_some());
    }

    #[test]
    fn test_impulse() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let id = ball(&mut world, Vec2::ZERO);
        world.apply_impulse(id, Vec2::new(0.0, 40.0), 0.1);
        assert!((world.velocity(id).unwrap().y - 400.0).abs() < 0.001);
    }
}
