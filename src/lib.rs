//! Two-asteroid collision and fragmentation simulation.
//!
//! Two rigid spheres approach, collide, and shatter into two swarms of
//! fragments that bounce off each other with elastic collisions.  The physics
//! lives in [`simulation::Simulation`]; everything under
//! [`asteroid_rendering`] and [`graphics`] only reads its transforms.

pub mod asteroid_rendering;
pub mod body;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod estimate;
pub mod fragment;
pub mod graphics;
pub mod simulation;
