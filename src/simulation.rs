//! The frame-driven simulation loop and its Bevy plugin.
//!
//! ## Phases
//!
//! | Phase         | Per-frame work                                             |
//! |---------------|------------------------------------------------------------|
//! | `Idle`        | nothing; bodies sit at their initial transforms            |
//! | `Approaching` | collide top-level bodies, else translate them by the deltas |
//! | `Fragmented`  | cross-swarm detect + resolve, integrate, clear flags       |
//!
//! `launch()` moves `Idle` to `Approaching`.  The first frame in which the two
//! top-level bodies collide generates both swarms and moves to `Fragmented`.
//! `reset()` returns to `Idle` from anywhere.
//!
//! ## Known simplifications
//!
//! Fragments of the same parent never collide with each other; only the two
//! swarms interact.  Multi-partner contacts keep whichever partner is visited
//! first (see [`crate::collision`]).

use crate::body::{Body, Side, Swarm};
use crate::collision::{collides_within, resolvable_mass, resolve};
use crate::config::SimConfig;
use crate::error::SimResult;
use crate::fragment::{generate_fragments, MassModel};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use rand::rngs::StdRng;
use std::sync::Arc;

/// Where the simulation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Approaching,
    Fragmented,
}

/// Counters reported to the caller; purely informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Frames advanced since the last reset, in any phase but `Idle`.
    pub frames: u64,
    /// Frame on which the top-level bodies first collided.
    pub collision_frame: Option<u64>,
    /// Pairs resolved during the most recent fragmented frame.
    pub contacts_last_frame: usize,
    /// Pairs resolved since fragmentation.
    pub contacts_total: u64,
}

/// All simulation state: both top-level bodies, both swarms, flags and RNG.
///
/// Created once with [`Simulation::new`]; dropping it destroys everything.
#[derive(Resource, Debug)]
pub struct Simulation {
    config: SimConfig,
    model: MassModel,
    rng: StdRng,
    initial: [Body; 2],
    top_level: [Body; 2],
    swarms: [Swarm; 2],
    phase: Phase,
    fragments_generated: bool,
    stats: SimulationStats,
}

impl Simulation {
    /// Build the two top-level bodies from `config` and the shared mesh
    /// vertex set.  Fails if the config is unsafe or the mesh is empty.
    pub fn new(config: SimConfig, vertices: Arc<[Vec3]>, rng: StdRng) -> SimResult<Self> {
        config.validate()?;
        let model = MassModel {
            vertices,
            safety_factor: config.safety_factor,
            density: config.density,
        };
        let initial = [
            top_level_body(&config, &model, Side::Negative)?,
            top_level_body(&config, &model, Side::Positive)?,
        ];

        Ok(Self {
            top_level: initial.clone(),
            initial,
            swarms: [Swarm::new(Side::Negative), Swarm::new(Side::Positive)],
            phase: Phase::Idle,
            fragments_generated: false,
            stats: SimulationStats::default(),
            config,
            model,
            rng,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn top_level(&self) -> &[Body; 2] {
        &self.top_level
    }

    pub fn swarms(&self) -> &[Swarm; 2] {
        &self.swarms
    }

    /// Current top-level transforms.  Meaningful in `Idle` and `Approaching`;
    /// once fragmented they stay frozen at the moment of impact.
    pub fn top_level_transforms(&self) -> (Transform, Transform) {
        (self.top_level[0].transform, self.top_level[1].transform)
    }

    /// Fragment transforms for swarm A and swarm B.  Empty unless fragmented.
    pub fn fragment_transforms(&self) -> (Vec<Transform>, Vec<Transform>) {
        (self.swarms[0].transforms(), self.swarms[1].transforms())
    }

    /// Start the approach.  Ignored unless idle.
    pub fn launch(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Approaching;
            info!("Launch: top-level bodies approaching");
        }
    }

    /// Drop all fragments and put both top-level bodies back where they started.
    pub fn reset(&mut self) {
        self.top_level = self.initial.clone();
        for swarm in &mut self.swarms {
            swarm.bodies.clear();
        }
        self.phase = Phase::Idle;
        self.fragments_generated = false;
        self.stats = SimulationStats::default();
        info!("Simulation reset");
    }

    /// Run one frame.  On error nothing is changed: phase, bodies, flags and
    /// stats stay as they were before the call.
    pub fn advance(&mut self) -> SimResult<()> {
        match self.phase {
            Phase::Idle => return Ok(()),
            Phase::Approaching => self.advance_approach()?,
            Phase::Fragmented => self.advance_fragments()?,
        }
        self.stats.frames += 1;
        Ok(())
    }

    fn advance_approach(&mut self) -> SimResult<()> {
        let [a, b] = &self.top_level;
        if collides_within(a, b, self.config.collision_tolerance) {
            return self.fragment();
        }

        for (body, side) in self.top_level.iter_mut().zip(Side::BOTH) {
            body.translate(self.config.approach_velocity(side));
        }
        Ok(())
    }

    /// Generate both swarms once and commit them together.
    fn fragment(&mut self) -> SimResult<()> {
        if self.fragments_generated {
            return Ok(());
        }

        let swarm_a = generate_fragments(
            self.top_level[0].position(),
            Side::Negative,
            &self.config.swarm(Side::Negative),
            &self.model,
            &mut self.rng,
        )?;
        let swarm_b = generate_fragments(
            self.top_level[1].position(),
            Side::Positive,
            &self.config.swarm(Side::Positive),
            &self.model,
            &mut self.rng,
        )?;
        self.swarms = [swarm_a, swarm_b];

        self.fragments_generated = true;
        self.phase = Phase::Fragmented;
        self.stats.collision_frame = Some(self.stats.frames);
        info!(
            "Collision on frame {}: {} + {} fragments",
            self.stats.frames,
            self.swarms[0].len(),
            self.swarms[1].len()
        );
        Ok(())
    }

    fn advance_fragments(&mut self) -> SimResult<()> {
        let tolerance = self.config.collision_tolerance;
        let [swarm_a, swarm_b] = &mut self.swarms;

        // Detect and vet every pair first so a bad pair leaves the frame untouched.
        let mut pairs = Vec::new();
        for (i, f) in swarm_a.bodies.iter().enumerate() {
            for (j, g) in swarm_b.bodies.iter().enumerate() {
                if collides_within(f, g, tolerance) {
                    resolvable_mass(f, g)?;
                    pairs.push((i, j));
                }
            }
        }

        for &(i, j) in &pairs {
            resolve(&mut swarm_a.bodies[i], &mut swarm_b.bodies[j])?;
        }
        let contacts = pairs.len();

        for swarm in &mut self.swarms {
            swarm.integrate(1.0);
            swarm.clear_resolved();
        }

        self.stats.contacts_last_frame = contacts;
        self.stats.contacts_total += contacts as u64;
        if contacts > 0 {
            debug!("Frame {}: {} contacts resolved", self.stats.frames, contacts);
        }
        Ok(())
    }
}

fn top_level_body(config: &SimConfig, model: &MassModel, side: Side) -> SimResult<Body> {
    model.body(config.body_position(side), config.body_scale(side), Vec3::ZERO)
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Set when `advance` fails; the loop stops instead of running on with a
/// broken body.
#[derive(Resource, Debug, Default)]
pub struct SimulationHalted(pub bool);

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationHalted>()
            .add_systems(Update, exit_on_escape_system)
            .add_systems(
                Update,
                (control_input_system, advance_simulation_system)
                    .chain()
                    .in_set(SimulationSet::Advance)
                    .run_if(resource_exists::<Simulation>),
            );
    }
}

/// Ordering label: render sync must run after [`SimulationSet::Advance`].
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Advance,
}

/// Space launches, R resets.
pub fn control_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<Simulation>,
    mut halted: ResMut<SimulationHalted>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        sim.reset();
        halted.0 = false;
    }
    if keys.just_pressed(KeyCode::Space) {
        sim.launch();
    }
}

/// Escape quits, whether or not the simulation was built.
pub fn exit_on_escape_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: MessageWriter<bevy::app::AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        info!("Escape pressed; exiting");
        exit.write(bevy::app::AppExit::Success);
    }
}

/// One physics step per rendered frame.
pub fn advance_simulation_system(
    mut sim: ResMut<Simulation>,
    mut halted: ResMut<SimulationHalted>,
) {
    if halted.0 {
        return;
    }
    if let Err(e) = sim.advance() {
        error!("Simulation halted: {e}");
        halted.0 = true;
    }
}
