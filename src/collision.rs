//! Sphere-overlap detection and elastic velocity resolution.
//!
//! ## Per-frame contract
//!
//! [`resolve`] rewrites a body's velocity at most once per frame: the first
//! overlapping partner processed wins and marks the body `resolved`.  Later
//! overlaps in the same frame are still detected but leave that body alone.
//! Which partner wins therefore depends on iteration order, and multi-body
//! contacts are not physically exact.  The loop clears the flags once every
//! pair has been visited.

use crate::body::Body;
use crate::error::{SimError, SimResult};

/// True when the bounding spheres of `a` and `b` touch or overlap.
#[inline]
pub fn collides(a: &Body, b: &Body) -> bool {
    collides_within(a, b, 0.0)
}

/// Like [`collides`], with the contact threshold widened by `tolerance`.
#[inline]
pub fn collides_within(a: &Body, b: &Body, tolerance: f32) -> bool {
    a.position().distance(b.position()) <= a.radius() + b.radius() + tolerance
}

/// Combined mass of the pair, or [`SimError::DegenerateMass`] when it is zero,
/// negative or not finite.  [`resolve`] fails exactly when this does, so
/// callers can vet a whole batch of pairs before mutating any of them.
pub fn resolvable_mass(a: &Body, b: &Body) -> SimResult<f32> {
    let total_mass = a.mass() + b.mass();
    if total_mass.is_finite() && total_mass > 0.0 {
        Ok(total_mass)
    } else {
        Err(SimError::DegenerateMass {
            mass_a: a.mass(),
            mass_b: b.mass(),
        })
    }
}

/// Elastic collision in the pair's center-of-mass frame.
///
/// Both new velocities are computed from the pre-collision velocities, then
/// applied only to bodies that are not already `resolved` this frame.
/// Returns [`SimError::DegenerateMass`] without touching either body when the
/// combined mass is not positive.
pub fn resolve(a: &mut Body, b: &mut Body) -> SimResult<()> {
    let total_mass = resolvable_mass(a, b)?;

    let v_cm = (a.momentum() + b.momentum()) / total_mass;
    let ua = a.velocity - v_cm;
    let ub = b.velocity - v_cm;

    let new_a = v_cm + (ua * (a.mass() - b.mass()) + ub * (2.0 * b.mass())) / total_mass;
    let new_b = v_cm + (ub * (b.mass() - a.mass()) + ua * (2.0 * a.mass())) / total_mass;

    if !a.resolved {
        a.velocity = new_a;
        a.resolved = true;
    }
    if !b.resolved {
        b.velocity = new_b;
        b.resolved = true;
    }
    Ok(())
}
