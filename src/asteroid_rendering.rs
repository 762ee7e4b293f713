//! Mesh3d rendering for the two asteroids and their fragments.
//!
//! Rendering is a read-only consumer of [`Simulation`] state.  Nothing here
//! feeds back into the physics; every system copies transforms out of the
//! simulation after [`SimulationSet::Advance`] has run for the frame.
//!
//! | System                           | Schedule | Purpose                                   |
//! |----------------------------------|----------|-------------------------------------------|
//! | `setup_simulation`               | Startup  | Build mesh, simulation, top-level entities |
//! | `sync_top_level_system`          | Update   | Mirror + hide/show the two asteroids       |
//! | `sync_fragment_entities_system`  | Update   | Spawn/despawn fragment entities            |
//! | `sync_fragment_transforms_system`| Update   | Mirror fragment transforms                 |
//!
//! All bodies share one procedural asteroid mesh.  Its local-space vertices
//! also feed the radius estimator, so what you see is what collides (times the
//! safety factor).

use crate::body::{Side, Swarm};
use crate::config::{load_sim_config, SimConfig};
use crate::estimate::mesh_positions;
use crate::simulation::{Phase, Simulation, SimulationSet};
use bevy::prelude::*;
use bevy_mesh::VertexAttributeValues;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Environment variable that overrides `rng_seed` from the config.
pub const SEED_ENV_VAR: &str = "FRACTURE_SEED";

// ── Resources & components ────────────────────────────────────────────────────

/// Shared render assets created once at startup.
#[derive(Resource)]
pub struct AsteroidAssets {
    pub mesh: Handle<Mesh>,
    /// One material per top-level asteroid, indexed by [`Side::index`].
    pub parent_materials: [Handle<StandardMaterial>; 2],
    /// Small palette of rock tones per side; fragments pick one by index.
    pub fragment_materials: [Vec<Handle<StandardMaterial>>; 2],
}

/// One of the two top-level asteroids.
#[derive(Component, Debug, Clone, Copy)]
pub struct TopLevelAsteroid(pub Side);

/// A fragment entity mirroring `swarms[side].bodies[index]`.
#[derive(Component, Debug, Clone, Copy)]
pub struct FragmentVisual {
    pub side: Side,
    pub index: usize,
}

/// Fragment entities currently alive, in spawn order.
#[derive(Resource, Debug, Default)]
pub struct FragmentEntities(pub Vec<Entity>);

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct AsteroidRenderingPlugin;

impl Plugin for AsteroidRenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FragmentEntities>()
            .add_systems(Startup, setup_simulation.after(load_sim_config))
            .add_systems(
                Update,
                (
                    sync_top_level_system,
                    sync_fragment_entities_system,
                    sync_fragment_transforms_system,
                )
                    .chain()
                    .after(SimulationSet::Advance)
                    .run_if(resource_exists::<Simulation>)
                    .run_if(resource_exists::<AsteroidAssets>),
            );
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Build the asteroid mesh, derive the simulation from its vertices, and spawn
/// the two top-level asteroid entities.
///
/// On failure the error is logged and no `Simulation` resource is inserted, so
/// every dependent system stays idle.
pub fn setup_simulation(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = asteroid_mesh(config.mesh_radius);
    let vertices: Arc<[Vec3]> = match mesh_positions(&mesh) {
        Ok(vertices) => vertices.into(),
        Err(e) => {
            error!("Asteroid mesh unusable: {e}");
            return;
        }
    };

    let seed = fragment_seed(&config);
    let rng = StdRng::seed_from_u64(seed);
    let sim = match Simulation::new(SimConfig::clone(&config), vertices, rng) {
        Ok(sim) => sim,
        Err(e) => {
            error!("Failed to build simulation: {e}");
            return;
        }
    };
    info!(
        "Simulation ready (seed {seed}); radii {:.3} / {:.3}. Space to launch, R to reset",
        sim.top_level()[0].radius(),
        sim.top_level()[1].radius()
    );

    let assets = AsteroidAssets {
        mesh: meshes.add(mesh),
        parent_materials: [
            materials.add(rock_material(Color::srgb(0.45, 0.38, 0.31))),
            materials.add(rock_material(Color::srgb(0.36, 0.36, 0.40))),
        ],
        fragment_materials: Side::BOTH.map(|side| {
            (0..PALETTE_SIZE)
                .map(|i| materials.add(rock_material(rock_color(side, i))))
                .collect()
        }),
    };

    for (side, body) in Side::BOTH.into_iter().zip(sim.top_level()) {
        commands.spawn((
            TopLevelAsteroid(side),
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.parent_materials[side.index()].clone()),
            body.transform,
            Visibility::Inherited,
        ));
    }

    commands.insert_resource(assets);
    commands.insert_resource(sim);
}

/// `FRACTURE_SEED` if set and numeric, else the config seed, else random.
fn fragment_seed(config: &SimConfig) -> u64 {
    std::env::var(SEED_ENV_VAR)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .or(config.rng_seed)
        .unwrap_or_else(rand::random)
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Mirror the top-level transforms; hide both asteroids once they have
/// shattered.
pub fn sync_top_level_system(
    sim: Res<Simulation>,
    mut query: Query<(&TopLevelAsteroid, &mut Transform, &mut Visibility)>,
) {
    let (a, b) = sim.top_level_transforms();
    let visibility = if sim.phase() == Phase::Fragmented {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    };

    for (asteroid, mut transform, mut vis) in query.iter_mut() {
        *transform = match asteroid.0 {
            Side::Negative => a,
            Side::Positive => b,
        };
        *vis = visibility;
    }
}

/// Keep one entity per fragment: spawn the lot when the swarms appear,
/// despawn them when a reset empties the swarms.
pub fn sync_fragment_entities_system(
    mut commands: Commands,
    sim: Res<Simulation>,
    assets: Res<AsteroidAssets>,
    mut entities: ResMut<FragmentEntities>,
) {
    let expected: usize = sim.swarms().iter().map(Swarm::len).sum();
    if entities.0.len() == expected {
        return;
    }

    for entity in entities.0.drain(..) {
        commands.entity(entity).despawn();
    }

    for swarm in sim.swarms() {
        let palette = &assets.fragment_materials[swarm.side.index()];
        for (index, body) in swarm.bodies.iter().enumerate() {
            let material = palette[index % palette.len()].clone();
            let entity = commands
                .spawn((
                    FragmentVisual {
                        side: swarm.side,
                        index,
                    },
                    Mesh3d(assets.mesh.clone()),
                    MeshMaterial3d(material),
                    body.transform,
                ))
                .id();
            entities.0.push(entity);
        }
    }
}

pub fn sync_fragment_transforms_system(
    sim: Res<Simulation>,
    mut query: Query<(&FragmentVisual, &mut Transform)>,
) {
    let swarms = sim.swarms();
    for (fragment, mut transform) in query.iter_mut() {
        if let Some(body) = swarms[fragment.side.index()].bodies.get(fragment.index) {
            *transform = body.transform;
        }
    }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Number of distinct fragment tones per side.
const PALETTE_SIZE: u32 = 6;

/// A rocky sphere of roughly `radius`: a Bevy UV sphere with each vertex pushed
/// in or out by a smooth, deterministic ridge pattern (±12 %).
///
/// Seam vertices share a position, so they receive identical displacement and
/// the surface stays closed.
pub fn asteroid_mesh(radius: f32) -> Mesh {
    let mut mesh = Sphere::new(radius).mesh().uv(32, 18);
    if let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    {
        for p in positions.iter_mut() {
            let v = Vec3::from_array(*p);
            *p = (v * lumpiness(v.normalize_or_zero())).to_array();
        }
    }
    mesh.compute_normals();
    mesh
}

/// Radial displacement factor in `[0.88, 1.12]` for a unit direction.
fn lumpiness(dir: Vec3) -> f32 {
    let ridges = (dir.x * 5.0 + 1.3).sin() * (dir.y * 4.0 - 0.7).cos() + 0.5 * (dir.z * 7.0).sin();
    1.0 + 0.08 * ridges
}

fn rock_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        perceptual_roughness: 0.95,
        ..default()
    }
}

/// Deterministic grey-brown tone per palette slot, warmer for side A and
/// cooler for side B.
fn rock_color(side: Side, slot: u32) -> Color {
    // Knuth multiplicative hash → 0.0–1.0
    let h = slot.wrapping_mul(2_654_435_761).wrapping_add(0xDEAD_BEEF);
    let t = (h & 0xFFFF) as f32 / 65_535.0;

    let lum = 0.22 + t * 0.2;
    match side {
        Side::Negative => Color::srgb((lum + 0.08).min(1.0), lum + 0.03, lum - 0.02),
        Side::Positive => Color::srgb(lum - 0.02, lum + 0.01, (lum + 0.07).min(1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lumpiness_stays_within_twelve_percent() {
        for i in 0..200 {
            let theta = i as f32 * 0.37;
            let phi = i as f32 * 0.11;
            let dir = Vec3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos());
            let f = lumpiness(dir);
            assert!((0.88..=1.12).contains(&f), "{f}");
        }
    }

    #[test]
    fn asteroid_mesh_vertices_hug_the_requested_radius() {
        let verts = mesh_positions(&asteroid_mesh(50.0)).unwrap();
        assert!(!verts.is_empty());
        for v in verts {
            let len = v.length();
            assert!(len >= 50.0 * 0.879 && len <= 50.0 * 1.121, "{len}");
        }
    }

    #[test]
    fn palettes_differ_between_sides() {
        assert_ne!(rock_color(Side::Negative, 0), rock_color(Side::Positive, 0));
    }
}
