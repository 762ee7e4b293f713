use bevy::prelude::*;
use bevy::window::WindowResolution;

use fracture::asteroid_rendering::AsteroidRenderingPlugin;
use fracture::config::{self, SimConfig};
use fracture::graphics;
use fracture::simulation::SimulationPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Asteroid Simulation".into(),
                resolution: WindowResolution::new(1024, 800),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Compiled defaults; load_sim_config overwrites them from
        // assets/fracture.toml (if present) before the simulation is built.
        .insert_resource(SimConfig::default())
        .add_plugins((SimulationPlugin, AsteroidRenderingPlugin))
        .add_systems(Startup, (config::load_sim_config, graphics::setup_scene))
        .run();
}
