//! End-to-end runs of the default two-asteroid scenario.
//!
//! Uses the real procedural asteroid mesh and the compiled defaults, so these
//! tests exercise the same numbers the binary uses.

use bevy::prelude::*;
use fracture::asteroid_rendering::asteroid_mesh;
use fracture::body::Side;
use fracture::config::SimConfig;
use fracture::constants::{FRAGMENT_COUNT_A, FRAGMENT_COUNT_B, MESH_RADIUS};
use fracture::estimate::mesh_positions;
use fracture::simulation::{Phase, Simulation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn default_sim(seed: u64) -> Simulation {
    let vertices: Arc<[Vec3]> = mesh_positions(&asteroid_mesh(MESH_RADIUS))
        .expect("asteroid mesh has positions")
        .into();
    Simulation::new(SimConfig::default(), vertices, StdRng::seed_from_u64(seed))
        .expect("default config builds")
}

/// Frames of approach before the spheres touch, from the closed form
/// `|d0 + n·u| = R` with `u` the per-frame change of separation.
fn analytic_contact_frame(sim: &Simulation) -> u64 {
    let cfg = sim.config();
    let pa = Vec3::from_array(cfg.body_a_position).as_dvec3();
    let pb = Vec3::from_array(cfg.body_b_position).as_dvec3();
    let va = Vec3::from_array(cfg.approach_velocity_a).as_dvec3();
    let vb = Vec3::from_array(cfg.approach_velocity_b).as_dvec3();
    let [a, b] = sim.top_level();
    let reach = f64::from(a.radius() + b.radius());

    let d0 = pb - pa;
    let u = vb - va;
    let uu = u.length_squared();
    let du = d0.dot(u);
    let disc = du * du - uu * (d0.length_squared() - reach * reach);
    assert!(disc >= 0.0, "default bodies must meet");
    let t = (-du - disc.sqrt()) / uu;
    t.ceil() as u64
}

fn run_until_fragmented(sim: &mut Simulation, max_frames: u64) {
    sim.launch();
    for _ in 0..max_frames {
        sim.advance().expect("advance");
        if sim.phase() == Phase::Fragmented {
            return;
        }
    }
    panic!("no collision within {max_frames} frames");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_bodies_collide_on_the_predicted_frame() {
    let mut sim = default_sim(1);
    let expected = analytic_contact_frame(&sim);
    run_until_fragmented(&mut sim, 5_000);

    let got = sim.stats().collision_frame.expect("collision recorded");
    assert_eq!(got, expected, "collision on frame {got}, expected {expected}");
}

#[test]
fn fragmentation_produces_configured_counts() {
    let mut sim = default_sim(2);
    run_until_fragmented(&mut sim, 5_000);

    let (a, b) = sim.fragment_transforms();
    assert_eq!(a.len(), FRAGMENT_COUNT_A);
    assert_eq!(b.len(), FRAGMENT_COUNT_B);
    assert_eq!(sim.swarms()[0].side, Side::Negative);
    assert_eq!(sim.swarms()[1].side, Side::Positive);
}

#[test]
fn fragments_are_smaller_than_their_parents() {
    let mut sim = default_sim(3);
    run_until_fragmented(&mut sim, 5_000);

    for (parent, swarm) in sim.top_level().iter().zip(sim.swarms()) {
        for body in &swarm.bodies {
            assert!(body.radius() > 0.0 && body.mass() > 0.0);
            assert!(body.radius() < parent.radius());
        }
    }
}

#[test]
fn fragmented_frames_keep_counts_and_move_fragments() {
    let mut sim = default_sim(4);
    run_until_fragmented(&mut sim, 5_000);
    let (before, _) = sim.fragment_transforms();

    for _ in 0..120 {
        sim.advance().expect("advance");
    }

    let (after_a, after_b) = sim.fragment_transforms();
    assert_eq!(after_a.len(), FRAGMENT_COUNT_A);
    assert_eq!(after_b.len(), FRAGMENT_COUNT_B);
    let moved = before
        .iter()
        .zip(&after_a)
        .filter(|(old, new)| old.translation != new.translation)
        .count();
    assert!(moved > FRAGMENT_COUNT_A / 2);
}

#[test]
fn top_level_bodies_stop_once_fragmented() {
    let mut sim = default_sim(5);
    run_until_fragmented(&mut sim, 5_000);
    let frozen = sim.top_level_transforms();
    for _ in 0..10 {
        sim.advance().expect("advance");
    }
    assert_eq!(sim.top_level_transforms(), frozen);
}

#[test]
fn reset_after_fragmentation_restores_exact_start() {
    let mut sim = default_sim(6);
    let start = sim.top_level_transforms();
    run_until_fragmented(&mut sim, 5_000);
    for _ in 0..30 {
        sim.advance().expect("advance");
    }

    sim.reset();

    assert_eq!(sim.phase(), Phase::Idle);
    assert_eq!(sim.top_level_transforms(), start);
    let (a, b) = sim.fragment_transforms();
    assert!(a.is_empty());
    assert!(b.is_empty());
}

#[test]
fn reset_mid_approach_restores_exact_start() {
    let mut sim = default_sim(7);
    let start = sim.top_level_transforms();
    sim.launch();
    for _ in 0..100 {
        sim.advance().expect("advance");
    }
    assert_ne!(sim.top_level_transforms(), start);

    sim.reset();
    assert_eq!(sim.top_level_transforms(), start);
    assert_eq!(sim.phase(), Phase::Idle);
}

#[test]
fn same_seed_gives_the_same_fragment_field() {
    let mut first = default_sim(42);
    let mut second = default_sim(42);
    run_until_fragmented(&mut first, 5_000);
    run_until_fragmented(&mut second, 5_000);
    for _ in 0..50 {
        first.advance().expect("advance");
        second.advance().expect("advance");
    }
    assert_eq!(first.fragment_transforms(), second.fragment_transforms());
}

#[test]
fn fragments_spawn_around_their_parents_impact_position() {
    let mut sim = default_sim(8);
    run_until_fragmented(&mut sim, 5_000);
    let cfg = sim.config().clone();

    for (parent, swarm) in sim.top_level().iter().zip(sim.swarms()) {
        let ranges = cfg.swarm(swarm.side);
        for body in &swarm.bodies {
            let offset = body.position() - parent.position();
            assert!(offset.cmpge(ranges.offset_min - 1e-4).all(), "{offset}");
            assert!(offset.cmple(ranges.offset_max + 1e-4).all(), "{offset}");
        }
    }
}
