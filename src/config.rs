//! Runtime simulation configuration loaded from `assets/fracture.toml`.
//!
//! [`SimConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_sim_config`] reads
//! `assets/fracture.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about.
//!
//! Vectors are written as three-element arrays:
//!
//! ```toml
//! body_a_position = [-4.0, -2.0, 0.0]
//! fragment_count_b = 400
//! ```
//!
//! Values are fixed once the simulation is built; editing the file requires a
//! restart.

use crate::body::Side;
use crate::constants::*;
use crate::error::{
    validate_collision_tolerance, validate_density, validate_positive_scale, validate_range,
    validate_range3, validate_safety_factor, SimError, SimResult,
};
use crate::fragment::SwarmConfig;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/fracture.toml";

/// Construction-time simulation configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Top-level Bodies ──────────────────────────────────────────────────────
    pub body_a_position: [f32; 3],
    pub body_b_position: [f32; 3],
    pub body_a_scale: f32,
    pub body_b_scale: f32,
    pub approach_velocity_a: [f32; 3],
    pub approach_velocity_b: [f32; 3],

    // ── Estimation ────────────────────────────────────────────────────────────
    pub safety_factor: f32,
    pub density: f32,
    pub collision_tolerance: f32,
    pub mesh_radius: f32,

    // ── Swarm A ───────────────────────────────────────────────────────────────
    pub fragment_count_a: usize,
    pub fragment_scale_min_a: f32,
    pub fragment_scale_max_a: f32,
    pub fragment_offset_min_a: [f32; 3],
    pub fragment_offset_max_a: [f32; 3],
    pub fragment_velocity_min_a: [f32; 3],
    pub fragment_velocity_max_a: [f32; 3],

    // ── Swarm B ───────────────────────────────────────────────────────────────
    pub fragment_count_b: usize,
    pub fragment_scale_min_b: f32,
    pub fragment_scale_max_b: f32,
    pub fragment_offset_min_b: [f32; 3],
    pub fragment_offset_max_b: [f32; 3],
    pub fragment_velocity_min_b: [f32; 3],
    pub fragment_velocity_max_b: [f32; 3],

    // ── Randomness ────────────────────────────────────────────────────────────
    /// Seed for the fragment generator.  `None` picks a fresh seed per run.
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Top-level Bodies
            body_a_position: BODY_A_POSITION,
            body_b_position: BODY_B_POSITION,
            body_a_scale: BODY_A_SCALE,
            body_b_scale: BODY_B_SCALE,
            approach_velocity_a: APPROACH_VELOCITY_A,
            approach_velocity_b: APPROACH_VELOCITY_B,
            // Estimation
            safety_factor: SAFETY_FACTOR,
            density: DENSITY,
            collision_tolerance: COLLISION_TOLERANCE,
            mesh_radius: MESH_RADIUS,
            // Swarm A
            fragment_count_a: FRAGMENT_COUNT_A,
            fragment_scale_min_a: FRAGMENT_SCALE_MIN_A,
            fragment_scale_max_a: FRAGMENT_SCALE_MAX_A,
            fragment_offset_min_a: FRAGMENT_OFFSET_MIN_A,
            fragment_offset_max_a: FRAGMENT_OFFSET_MAX_A,
            fragment_velocity_min_a: FRAGMENT_VELOCITY_MIN_A,
            fragment_velocity_max_a: FRAGMENT_VELOCITY_MAX_A,
            // Swarm B
            fragment_count_b: FRAGMENT_COUNT_B,
            fragment_scale_min_b: FRAGMENT_SCALE_MIN_B,
            fragment_scale_max_b: FRAGMENT_SCALE_MAX_B,
            fragment_offset_min_b: FRAGMENT_OFFSET_MIN_B,
            fragment_offset_max_b: FRAGMENT_OFFSET_MAX_B,
            fragment_velocity_min_b: FRAGMENT_VELOCITY_MIN_B,
            fragment_velocity_max_b: FRAGMENT_VELOCITY_MAX_B,
            // Randomness
            rng_seed: None,
        }
    }
}

impl SimConfig {
    /// Parse a TOML document, filling missing keys from the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Read and parse `path`.
    ///
    /// `Ok(None)` when the file does not exist; a parse failure is an error.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Option<Self>> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return Ok(None),
        };
        Self::from_toml_str(&contents)
            .map(Some)
            .map_err(|e| SimError::ConfigParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }

    /// Reject values that would break the radius/mass invariants.
    pub fn validate(&self) -> SimResult<()> {
        validate_safety_factor(self.safety_factor)?;
        validate_density(self.density)?;
        validate_collision_tolerance(self.collision_tolerance)?;
        validate_positive_scale("MESH_RADIUS", self.mesh_radius)?;
        validate_positive_scale("BODY_A_SCALE", self.body_a_scale)?;
        validate_positive_scale("BODY_B_SCALE", self.body_b_scale)?;
        validate_positive_scale("FRAGMENT_SCALE_MIN_A", self.fragment_scale_min_a)?;
        validate_positive_scale("FRAGMENT_SCALE_MAX_A", self.fragment_scale_max_a)?;
        validate_positive_scale("FRAGMENT_SCALE_MIN_B", self.fragment_scale_min_b)?;
        validate_positive_scale("FRAGMENT_SCALE_MAX_B", self.fragment_scale_max_b)?;

        // Ranges: min <= max per axis, both swarms.
        validate_range(
            "FRAGMENT_SCALE_A",
            self.fragment_scale_min_a,
            self.fragment_scale_max_a,
        )?;
        validate_range(
            "FRAGMENT_SCALE_B",
            self.fragment_scale_min_b,
            self.fragment_scale_max_b,
        )?;
        validate_range3(
            "FRAGMENT_OFFSET_A",
            self.fragment_offset_min_a,
            self.fragment_offset_max_a,
        )?;
        validate_range3(
            "FRAGMENT_OFFSET_B",
            self.fragment_offset_min_b,
            self.fragment_offset_max_b,
        )?;
        validate_range3(
            "FRAGMENT_VELOCITY_A",
            self.fragment_velocity_min_a,
            self.fragment_velocity_max_a,
        )?;
        validate_range3(
            "FRAGMENT_VELOCITY_B",
            self.fragment_velocity_min_b,
            self.fragment_velocity_max_b,
        )?;
        Ok(())
    }

    pub fn body_position(&self, side: Side) -> Vec3 {
        match side {
            Side::Negative => Vec3::from_array(self.body_a_position),
            Side::Positive => Vec3::from_array(self.body_b_position),
        }
    }

    pub fn body_scale(&self, side: Side) -> f32 {
        match side {
            Side::Negative => self.body_a_scale,
            Side::Positive => self.body_b_scale,
        }
    }

    pub fn approach_velocity(&self, side: Side) -> Vec3 {
        match side {
            Side::Negative => Vec3::from_array(self.approach_velocity_a),
            Side::Positive => Vec3::from_array(self.approach_velocity_b),
        }
    }

    /// Generation ranges for the swarm spawned by the body on `side`.
    pub fn swarm(&self, side: Side) -> SwarmConfig {
        match side {
            Side::Negative => SwarmConfig {
                count: self.fragment_count_a,
                scale_min: self.fragment_scale_min_a,
                scale_max: self.fragment_scale_max_a,
                offset_min: Vec3::from_array(self.fragment_offset_min_a),
                offset_max: Vec3::from_array(self.fragment_offset_max_a),
                velocity_min: Vec3::from_array(self.fragment_velocity_min_a),
                velocity_max: Vec3::from_array(self.fragment_velocity_max_a),
            },
            Side::Positive => SwarmConfig {
                count: self.fragment_count_b,
                scale_min: self.fragment_scale_min_b,
                scale_max: self.fragment_scale_max_b,
                offset_min: Vec3::from_array(self.fragment_offset_min_b),
                offset_max: Vec3::from_array(self.fragment_offset_max_b),
                velocity_min: Vec3::from_array(self.fragment_velocity_min_b),
                velocity_max: Vec3::from_array(self.fragment_velocity_max_b),
            },
        }
    }
}

/// Startup system: attempt to load [`CONFIG_PATH`] and overwrite the
/// `SimConfig` resource with any values present in the file.
///
/// A missing file keeps the defaults.  Parse errors and values that fail
/// validation are logged and the defaults are kept.
pub fn load_sim_config(mut config: ResMut<SimConfig>) {
    match SimConfig::load(CONFIG_PATH) {
        Ok(Some(loaded)) => match loaded.validate() {
            Ok(()) => {
                *config = loaded;
                info!("Loaded simulation config from {CONFIG_PATH}");
            }
            Err(e) => warn!("Rejected {CONFIG_PATH}: {e}; using defaults"),
        },
        Ok(None) => info!("No {CONFIG_PATH} found; using compiled defaults"),
        Err(e) => warn!("{e}; using defaults"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = SimConfig::from_toml_str(
            "fragment_count_b = 12\nbody_a_position = [1.0, 2.0, 3.0]\nrng_seed = 42\n",
        )
        .unwrap();
        assert_eq!(cfg.fragment_count_b, 12);
        assert_eq!(cfg.body_position(Side::Negative), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cfg.rng_seed, Some(42));
        assert_eq!(cfg.fragment_count_a, FRAGMENT_COUNT_A);
        assert_eq!(cfg.density, DENSITY);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(SimConfig::from_toml_str("fragment_count_a = \"many\"").is_err());
    }

    #[test]
    fn zero_density_fails_validation() {
        let cfg = SimConfig {
            density: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimError::UnsafeConstant {
                name: "DENSITY",
                ..
            })
        ));
    }

    #[test]
    fn inverted_ranges_fail_validation() {
        let cfg = SimConfig::from_toml_str(
            "fragment_offset_min_a = [1.0, 1.0, 1.0]\n\
             fragment_offset_max_a = [-1.0, -1.0, -1.0]\n",
        )
        .unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(SimError::UnsafeConstant {
                name: "FRAGMENT_OFFSET_A",
                ..
            })
        ));

        let cfg = SimConfig {
            fragment_scale_min_a: 0.004,
            fragment_scale_max_a: 0.001,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimError::UnsafeConstant {
                name: "FRAGMENT_SCALE_A",
                ..
            })
        ));

        let cfg = SimConfig {
            fragment_velocity_min_b: [0.0, 0.5, 0.0],
            fragment_velocity_max_b: [0.1, 0.1, 0.1],
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimError::UnsafeConstant {
                name: "FRAGMENT_VELOCITY_B",
                ..
            })
        ));
    }

    #[test]
    fn degenerate_ranges_are_allowed() {
        let cfg = SimConfig {
            fragment_offset_min_b: [0.5; 3],
            fragment_offset_max_b: [0.5; 3],
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_file_loads_as_none() {
        assert_eq!(SimConfig::load("does/not/exist.toml"), Ok(None));
    }

    #[test]
    fn swarm_config_selects_the_right_side() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.swarm(Side::Negative).count, FRAGMENT_COUNT_A);
        assert_eq!(cfg.swarm(Side::Positive).count, FRAGMENT_COUNT_B);
        assert_eq!(
            cfg.swarm(Side::Positive).velocity_max,
            Vec3::from_array(FRAGMENT_VELOCITY_MAX_B)
        );
    }
}
