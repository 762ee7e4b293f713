//! Physical bodies: the two top-level asteroids and their fragments.
//!
//! A [`Body`] carries only what the sphere-collision model needs.  Rotation is
//! never touched; the transform holds a translation and a uniform scale so the
//! renderer can draw the shared asteroid mesh at the right size.

use bevy::prelude::*;

/// Which parent a body or swarm belongs to.
///
/// Body A starts at negative coordinates and its fragments drift back toward
/// negative coordinates; body B mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Negative,
    Positive,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Negative, Side::Positive];

    /// Slot of this side in the simulation's `[A, B]` arrays.
    pub fn index(self) -> usize {
        match self {
            Side::Negative => 0,
            Side::Positive => 1,
        }
    }
}

/// One physical object: a top-level asteroid or a fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Translation + uniform scale.  Rotation stays at identity.
    pub transform: Transform,
    /// World units per frame.
    pub velocity: Vec3,
    radius: f32,
    mass: f32,
    /// Set once this body's velocity has been rewritten during the current
    /// frame's resolution pass.  Cleared by the loop at the end of the frame.
    pub resolved: bool,
}

impl Body {
    /// Build a body at `position` drawn at uniform `scale`.
    ///
    /// `radius` and `mass` are clamped to be non-negative; they never change
    /// afterwards.
    pub fn new(position: Vec3, scale: f32, velocity: Vec3, radius: f32, mass: f32) -> Self {
        Self {
            transform: Transform::from_translation(position).with_scale(Vec3::splat(scale)),
            velocity,
            radius: radius.max(0.0),
            mass: mass.max(0.0),
            resolved: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn momentum(&self) -> Vec3 {
        self.velocity * self.mass
    }

    /// Move the body by `velocity * dt`.  The frame loop always passes 1.0.
    pub fn integrate(&mut self, dt: f32) {
        self.transform.translation += self.velocity * dt;
    }

    /// Move the body by an explicit per-frame delta, ignoring its velocity.
    pub fn translate(&mut self, delta: Vec3) {
        self.transform.translation += delta;
    }
}

/// Ordered fragments spawned from one parent body.
///
/// Members of a swarm are never tested against each other, only against the
/// opposing swarm.
#[derive(Debug, Clone, PartialEq)]
pub struct Swarm {
    pub side: Side,
    pub bodies: Vec<Body>,
}

impl Swarm {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            bodies: Vec::new(),
        }
    }

    pub fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            bodies: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn transforms(&self) -> Vec<Transform> {
        self.bodies.iter().map(|b| b.transform).collect()
    }

    pub fn total_momentum(&self) -> Vec3 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Advance every fragment by its own velocity.
    pub fn integrate(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.integrate(dt);
        }
    }

    pub fn clear_resolved(&mut self) {
        for body in &mut self.bodies {
            body.resolved = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_body_clamps_negative_radius_and_mass() {
        let b = Body::new(Vec3::ZERO, 1.0, Vec3::ZERO, -1.0, -2.0);
        assert_eq!(b.radius(), 0.0);
        assert_eq!(b.mass(), 0.0);
        assert!(!b.resolved);
    }

    #[test]
    fn transform_carries_position_and_uniform_scale() {
        let b = Body::new(Vec3::new(1.0, 2.0, 3.0), 0.5, Vec3::ZERO, 1.0, 1.0);
        assert_eq!(b.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.transform.scale, Vec3::splat(0.5));
        assert_eq!(b.transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn integrate_moves_by_velocity() {
        let mut b = Body::new(Vec3::ZERO, 1.0, Vec3::new(0.5, -0.25, 0.0), 1.0, 1.0);
        b.integrate(1.0);
        b.integrate(1.0);
        assert_eq!(b.position(), Vec3::new(1.0, -0.5, 0.0));
    }

    #[test]
    fn swarm_clear_resolved_resets_every_member() {
        let mut swarm = Swarm::new(Side::Positive);
        for _ in 0..3 {
            let mut b = Body::new(Vec3::ZERO, 1.0, Vec3::ZERO, 1.0, 1.0);
            b.resolved = true;
            swarm.bodies.push(b);
        }
        swarm.clear_resolved();
        assert!(swarm.bodies.iter().all(|b| !b.resolved));
    }
}
