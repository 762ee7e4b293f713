//! Simulation-specific error types.
//!
//! Core operations return [`SimResult`] instead of panicking so that the
//! frame loop can stop cleanly on a broken invariant rather than keep running
//! with a zero-mass body or a radius computed from nothing.
//!
//! ## Usage
//!
//! ```rust
//! use fracture::error::{SimError, SimResult};
//!
//! fn checked_scale(scale: f32) -> SimResult<f32> {
//!     if scale.is_finite() && scale >= 0.0 {
//!         Ok(scale)
//!     } else {
//!         Err(SimError::InvalidScale { scale })
//!     }
//! }
//! # assert!(checked_scale(0.5).is_ok());
//! ```

use std::fmt;

/// Top-level error enum for the fracture simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Two bodies were resolved against each other while their combined mass
    /// was zero, negative or not finite.  The center-of-mass velocity is
    /// undefined in that case.
    DegenerateMass {
        /// Mass of the first body of the pair.
        mass_a: f32,
        /// Mass of the second body of the pair.
        mass_b: f32,
    },

    /// A bounding radius was requested for a mesh with no vertices.
    EmptyMesh,

    /// Every vertex sits at the local origin (or is not finite), so the mesh
    /// has no extent to derive a radius from.
    DegenerateMesh {
        /// Largest vertex distance from the origin.
        extent: f32,
    },

    /// A scale factor was negative or not finite.
    InvalidScale {
        /// The rejected scale.
        scale: f32,
    },

    /// Configuration constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// The configuration file exists but could not be parsed.
    ConfigParse {
        /// Path of the offending file.
        path: String,
        /// Parser message.
        message: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::DegenerateMass { mass_a, mass_b } => write!(
                f,
                "invalid body pair: combined mass {} + {} must be positive and finite",
                mass_a, mass_b
            ),
            SimError::EmptyMesh => {
                write!(f, "bounding radius requested for a mesh with no vertices")
            }
            SimError::DegenerateMesh { extent } => write!(
                f,
                "mesh has no usable extent (farthest vertex at {}); radius would be zero",
                extent
            ),
            SimError::InvalidScale { scale } => {
                write!(f, "scale {} must be finite and non-negative", scale)
            }
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::ConfigParse { path, message } => {
                write!(f, "failed to parse {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `density` is strictly positive and finite.
///
/// A zero density produces zero-mass fragments, which the resolver rejects.
pub fn validate_density(value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name: "DENSITY",
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `safety_factor` is strictly positive and finite.
pub fn validate_safety_factor(value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name: "SAFETY_FACTOR",
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if `collision_tolerance` is negative or not finite.
pub fn validate_collision_tolerance(value: f32) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name: "COLLISION_TOLERANCE",
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless a scale is strictly positive and finite.
pub fn validate_positive_scale(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `min <= max` and both ends are finite.
///
/// The reported value is `min`; an inverted range would otherwise collapse
/// every draw onto one end.
pub fn validate_range(name: &'static str, min: f32, max: f32) -> SimResult<()> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value: min,
            safe_range: "finite, min <= max",
        })
    }
}

/// [`validate_range`] on each axis of a `[x, y, z]` range.
pub fn validate_range3(name: &'static str, min: [f32; 3], max: [f32; 3]) -> SimResult<()> {
    for (lo, hi) in min.into_iter().zip(max) {
        validate_range(name, lo, hi)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_must_be_positive() {
        assert!(validate_density(1.0).is_ok());
        assert!(validate_density(0.0).is_err());
        assert!(validate_density(f32::NAN).is_err());
    }

    #[test]
    fn tolerance_allows_zero_but_not_negative() {
        assert!(validate_collision_tolerance(0.0).is_ok());
        assert!(validate_collision_tolerance(-0.1).is_err());
    }

    #[test]
    fn range_rejects_inverted_and_non_finite_bounds() {
        assert!(validate_range("R", 0.0, 0.0).is_ok());
        assert!(validate_range("R", -1.0, 1.0).is_ok());
        assert!(validate_range("R", 0.004, 0.001).is_err());
        assert!(validate_range("R", f32::NAN, 1.0).is_err());
        assert!(validate_range3("R3", [-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]).is_ok());
        assert_eq!(
            validate_range3("R3", [0.0, 2.0, 0.0], [1.0, 1.0, 1.0]),
            Err(SimError::UnsafeConstant {
                name: "R3",
                value: 2.0,
                safe_range: "finite, min <= max",
            })
        );
    }

    #[test]
    fn degenerate_mass_message_names_both_masses() {
        let msg = SimError::DegenerateMass {
            mass_a: 0.0,
            mass_b: 0.0,
        }
        .to_string();
        assert!(msg.contains("invalid body pair"));
        assert!(msg.contains("0 + 0"));
    }
}
