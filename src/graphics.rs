use bevy::prelude::*;

/// Spawn the 3D camera and a key light looking at the origin.
///
/// Bevy's default 45° vertical field of view keeps both start positions
/// (±4 on x) in frame from this distance.
pub fn setup_scene(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            ..default()
        },
        Transform::from_xyz(6.0, 8.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    info!("[SETUP] Camera and light spawned");
}
