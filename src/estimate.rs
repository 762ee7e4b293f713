//! Bounding-radius and mass estimation from mesh geometry.
//!
//! The asteroid mesh is shared by every body.  Its local-space vertex set is
//! read once and never modified; each body derives its own radius and mass from
//! that set and its own scale.

use crate::error::{SimError, SimResult};
use bevy::prelude::*;
use bevy_mesh::VertexAttributeValues;
use std::f32::consts::PI;

/// `safety_factor * max(scale * |v|)` over every vertex in local space.
///
/// Fails on an empty vertex set, on a vertex set with no extent (every vertex
/// at the origin), and on a negative or non-finite scale.
pub fn estimate_radius(vertices: &[Vec3], scale: f32, safety_factor: f32) -> SimResult<f32> {
    if vertices.is_empty() {
        return Err(SimError::EmptyMesh);
    }
    if !scale.is_finite() || scale < 0.0 {
        return Err(SimError::InvalidScale { scale });
    }

    let extent = vertices.iter().map(|v| v.length()).fold(0.0, f32::max);
    if !extent.is_finite() || extent <= 0.0 {
        return Err(SimError::DegenerateMesh { extent });
    }
    Ok(safety_factor * (scale * extent))
}

/// Uniform-sphere mass: `density * 4/3 * π * r³`.
#[inline]
pub fn estimate_mass(radius: f32, density: f32) -> f32 {
    density * (4.0 / 3.0) * PI * radius.powi(3)
}

/// Copy the local-space positions out of a [`Mesh`].
///
/// Only `Float32x3` positions are supported, which is what every Bevy
/// primitive mesh builder produces.
pub fn mesh_positions(mesh: &Mesh) -> SimResult<Vec<Vec3>> {
    match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(positions)) if !positions.is_empty() => {
            Ok(positions.iter().map(|p| Vec3::from_array(*p)).collect())
        }
        _ => Err(SimError::EmptyMesh),
    }
}
