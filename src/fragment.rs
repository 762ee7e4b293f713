//! Fragment generation: turn one parent asteroid into a swarm of debris.
//!
//! Each fragment gets a bell-shaped random scale, a radius and mass derived
//! from that scale, and a uniformly drawn offset and velocity from its side's
//! ranges.  The random source is passed in so a seeded generator reproduces
//! the same fragment field exactly.

use crate::body::{Body, Side, Swarm};
use crate::constants::SCALE_REDRAW_LIMIT;
use crate::error::SimResult;
use crate::estimate::{estimate_mass, estimate_radius};
use bevy::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::sync::Arc;

/// Per-swarm generation ranges.  See [`crate::config::SimConfig::swarm`].
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmConfig {
    pub count: usize,
    pub scale_min: f32,
    pub scale_max: f32,
    pub offset_min: Vec3,
    pub offset_max: Vec3,
    pub velocity_min: Vec3,
    pub velocity_max: Vec3,
}

/// Everything needed to turn a scale into a radius and a mass.
#[derive(Debug, Clone)]
pub struct MassModel {
    /// Local-space vertices of the shared asteroid mesh.
    pub vertices: Arc<[Vec3]>,
    pub safety_factor: f32,
    pub density: f32,
}

impl MassModel {
    /// Build a body of the given scale, deriving radius and mass once.
    pub fn body(&self, position: Vec3, scale: f32, velocity: Vec3) -> SimResult<Body> {
        let radius = estimate_radius(&self.vertices, scale, self.safety_factor)?;
        let mass = estimate_mass(radius, self.density);
        Ok(Body::new(position, scale, velocity, radius, mass))
    }
}

/// Bell-shaped draw centred on the middle of `[min, max]` with a deviation of
/// a sixth of the range, so nearly every value lands inside it.
///
/// Positive values outside the range are returned as-is.  Non-positive draws
/// are retried, and after [`SCALE_REDRAW_LIMIT`] attempts the midpoint is used.
/// An inverted range is rejected by config validation; here it degenerates to
/// the midpoint.
pub fn sample_scale<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let mean = 0.5 * (min + max);
    let Ok(normal) = Normal::new(mean, (max - min) / 6.0) else {
        return mean;
    };
    for _ in 0..SCALE_REDRAW_LIMIT {
        let scale = normal.sample(rng);
        if scale > 0.0 {
            return scale;
        }
    }
    mean
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}

fn sample_vec3<R: Rng + ?Sized>(rng: &mut R, min: Vec3, max: Vec3) -> Vec3 {
    Vec3::new(
        sample_axis(rng, min.x, max.x),
        sample_axis(rng, min.y, max.y),
        sample_axis(rng, min.z, max.z),
    )
}

/// Spawn `config.count` fragments around `origin`.
///
/// Draw order per fragment is scale, offset, velocity.  Keep it stable:
/// seeded tests depend on it.
pub fn generate_fragments<R: Rng + ?Sized>(
    origin: Vec3,
    side: Side,
    config: &SwarmConfig,
    model: &MassModel,
    rng: &mut R,
) -> SimResult<Swarm> {
    let mut swarm = Swarm::with_capacity(side, config.count);

    for _ in 0..config.count {
        let scale = sample_scale(rng, config.scale_min, config.scale_max);
        let offset = sample_vec3(rng, config.offset_min, config.offset_max);
        let velocity = sample_vec3(rng, config.velocity_min, config.velocity_max);
        swarm.bodies.push(model.body(origin + offset, scale, velocity)?);
    }

    Ok(swarm)
}
