//! Centralised simulation constants.
//!
//! Every tuneable value lives here and is mirrored by a field on
//! [`crate::config::SimConfig`], which uses these as its compiled defaults.
//!
//! ## Units
//!
//! Distances are world units.  Velocities are world units **per frame**: the
//! loop is ticked once per rendered frame, not by wall-clock time.

// ── Top-level Bodies ──────────────────────────────────────────────────────────

/// Initial position of body A (the negative-side asteroid).
pub const BODY_A_POSITION: [f32; 3] = [-4.0, -2.0, 0.0];

/// Initial position of body B (the positive-side asteroid).
pub const BODY_B_POSITION: [f32; 3] = [3.5, 2.0, 0.0];

/// Uniform scale applied to the asteroid mesh for body A.
pub const BODY_A_SCALE: f32 = 0.02;

/// Uniform scale applied to the asteroid mesh for body B.
pub const BODY_B_SCALE: f32 = 0.015;

/// Per-frame translation of body A while approaching.
pub const APPROACH_VELOCITY_A: [f32; 3] = [0.005, 0.0025, 0.0];

/// Per-frame translation of body B while approaching.
pub const APPROACH_VELOCITY_B: [f32; 3] = [-0.005, -0.0025, 0.0];

// ── Estimation ────────────────────────────────────────────────────────────────

/// Multiplier applied to the farthest scaled vertex distance.
///
/// Values above 1.0 inflate the collision sphere past the visible mesh so
/// fragments react slightly before their surfaces touch.
pub const SAFETY_FACTOR: f32 = 1.1;

/// Uniform density used to turn a bounding radius into a mass.
pub const DENSITY: f32 = 1.0;

/// Extra distance added to `ra + rb` before two bodies count as colliding.
/// Zero means exact sphere contact (touching counts).
pub const COLLISION_TOLERANCE: f32 = 0.0;

/// Base radius (model units) of the procedural asteroid mesh.
///
/// Chosen so that the default body scales yield world radii of roughly one
/// unit, which lets the approach finish in a few hundred frames.
pub const MESH_RADIUS: f32 = 50.0;

// ── Swarm A (negative side) ───────────────────────────────────────────────────

pub const FRAGMENT_COUNT_A: usize = 320;
pub const FRAGMENT_SCALE_MIN_A: f32 = 0.001;
pub const FRAGMENT_SCALE_MAX_A: f32 = 0.004;
pub const FRAGMENT_OFFSET_MIN_A: [f32; 3] = [-1.2, -1.0, -0.6];
pub const FRAGMENT_OFFSET_MAX_A: [f32; 3] = [0.3, 0.3, 0.6];
pub const FRAGMENT_VELOCITY_MIN_A: [f32; 3] = [-0.02, -0.015, -0.006];
pub const FRAGMENT_VELOCITY_MAX_A: [f32; 3] = [0.004, 0.004, 0.006];

// ── Swarm B (positive side) ───────────────────────────────────────────────────

pub const FRAGMENT_COUNT_B: usize = 260;
pub const FRAGMENT_SCALE_MIN_B: f32 = 0.001;
pub const FRAGMENT_SCALE_MAX_B: f32 = 0.0035;
pub const FRAGMENT_OFFSET_MIN_B: [f32; 3] = [-0.3, -0.3, -0.6];
pub const FRAGMENT_OFFSET_MAX_B: [f32; 3] = [1.2, 1.0, 0.6];
pub const FRAGMENT_VELOCITY_MIN_B: [f32; 3] = [-0.004, -0.004, -0.006];
pub const FRAGMENT_VELOCITY_MAX_B: [f32; 3] = [0.02, 0.015, 0.006];

// ── Scale Sampling ────────────────────────────────────────────────────────────

/// How many times a non-positive scale draw is retried before falling back to
/// the midpoint of the nominal range.
pub const SCALE_REDRAW_LIMIT: u32 = 8;
