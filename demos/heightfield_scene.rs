//! Heightfield Scene Example
//!
//! A capsule player on displaced hilly ground with a loose ball to stand on:
//! - Third-person camera driven by mouse look (click to capture, Esc to release)
//! - Velocity is only steered while the ground probe finds walkable ground
//! - Rapier debug rendering shows the colliders
//!
//! ## Controls
//! - **W/A/S/D**: Move relative to the view
//! - **Space**: Jump
//! - **Shift**: Run
//! - **Mouse** (captured): Look around
//! - **Gamepad**: Left stick moves, right stick looks, South jumps, left stick click runs
//! - **Tab**: Toggle panels
//!
//! Tuning is read from `demos/locomotion.toml` when it exists.

mod helpers;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_rapier3d::prelude::*;
use msg_locomotion::prelude::*;

use helpers::{LocomotionUiDefaults, LocomotionUiPlugin, Terrain};

// ==================== Constants ====================

const CONFIG_PATH: &str = "demos/locomotion.toml";

const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 20.0, 0.0);
const PLAYER_HALF_HEIGHT: f32 = 0.5;
const PLAYER_RADIUS: f32 = 0.5;

const BALL_POSITION: Vec3 = Vec3::new(6.0, 8.0, 0.0);
const BALL_RADIUS: f32 = 2.0;

const CAMERA_START: Vec3 = Vec3::new(0.0, 40.0, 40.0);

const TERRAIN: Terrain = Terrain {
    size: 100.0,
    resolution: 65,
    displacement_scale: 80.0,
    displacement_offset: -20.0,
};

/// Below this height the player is put back at the spawn point.
const FALL_LIMIT: f32 = -60.0;

// ==================== Components ====================

/// Marker for the player entity.
#[derive(Component)]
struct Player;

// ==================== Main ====================

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Heightfield Scene".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(RapierDebugRenderPlugin::default())
        .add_plugins(EguiPlugin::default())
        // Locomotion
        .add_plugins(LocomotionPlugin::<Rapier3dBackend>::default())
        .add_plugins(LocomotionInputPlugin)
        .add_plugins(LocomotionUiPlugin::<Player>::default())
        // Resources
        .insert_resource(AmbientLight {
            brightness: 500.0,
            ..default()
        })
        // Systems
        .add_systems(Startup, (load_config, setup).chain())
        .add_systems(Update, respawn_fallen_player.before(LocomotionSet::Sensors))
        .run();
}

/// Read the tuning file, falling back to the player defaults.
///
/// The result also becomes what the settings panel resets to.
fn load_config(mut commands: Commands) {
    let config = if !std::path::Path::new(CONFIG_PATH).exists() {
        info!("{CONFIG_PATH} not found, using default player tuning");
        LocomotionConfig::player()
    } else {
        match LocomotionConfig::load(CONFIG_PATH) {
            Ok(config) => {
                info!("loaded player tuning from {CONFIG_PATH}");
                config
            }
            Err(err) => {
                warn!("ignoring {CONFIG_PATH}: {err}");
                LocomotionConfig::player()
            }
        }
    };

    commands.insert_resource(LocomotionUiDefaults(config));
}

// ==================== Setup ====================

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<LocomotionUiDefaults>,
) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 30.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    spawn_ground(&mut commands, &mut meshes, &mut materials);
    spawn_ball(&mut commands, &mut meshes, &mut materials);
    let player = spawn_player(&mut commands, &mut meshes, &mut materials, config.0);

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_START).looking_at(PLAYER_SPAWN, Vec3::Y),
        LocomotionCamera::following(player),
    ));
}

fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(TERRAIN.mesh())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.55, 0.3),
            perceptual_roughness: 0.9,
            ..default()
        })),
        TERRAIN.transform(),
        RigidBody::Fixed,
        TERRAIN.collider(),
        Walkable,
        Name::new("Ground"),
    ));
}

fn spawn_ball(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(BALL_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial::default())),
        Transform::from_translation(BALL_POSITION),
        RigidBody::Dynamic,
        Collider::ball(BALL_RADIUS),
        Walkable,
        Name::new("Ball"),
    ));
}

fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: LocomotionConfig,
) -> Entity {
    commands
        .spawn((
            Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_HALF_HEIGHT * 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.9, 0.5, 0.2),
                ..default()
            })),
            Transform::from_translation(PLAYER_SPAWN),
            Player,
            PlayerControlled,
            LocomotionController::new(),
            config,
            InputState::default(),
            Rapier3dPlayerBundle::default(),
            Collider::capsule_y(PLAYER_HALF_HEIGHT, PLAYER_RADIUS),
            Name::new("Player"),
        ))
        .id()
}

// ==================== Systems ====================

fn respawn_fallen_player(mut query: Query<(&mut Transform, &mut Velocity), With<Player>>) {
    for (mut transform, mut velocity) in &mut query {
        if transform.translation.y < FALL_LIMIT {
            transform.translation = PLAYER_SPAWN;
            *velocity = Velocity::zero();
            info!("player fell off the world, respawning");
        }
    }
}
