//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::{LocomotionBackend, RaycastRequest};
use crate::collision::GroundContact;
use crate::config::LocomotionConfig;
use crate::controller::LocomotionController;
use crate::walkable::WalkableSurfaces;
use crate::LocomotionSet;

/// Rapier3D physics backend for the locomotion controller.
///
/// Velocity is read from and written to the [`Velocity`] component. A body is
/// ready once Rapier has attached its [`RapierRigidBodyHandle`]. Ground
/// probing is handled by a dedicated Rapier system that receives
/// `RapierContext` as a system parameter.
pub struct Rapier3dBackend;

impl LocomotionBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn is_ready(world: &World, entity: Entity) -> bool {
        world.get::<RapierRigidBodyHandle>(entity).is_some()
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .or_else(|| world.get::<GlobalTransform>(entity).map(|t| t.translation()))
            .unwrap_or(Vec3::ZERO)
    }
}

/// Plugin that sets up Rapier3D-specific systems for the locomotion controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            rapier_ground_detection.in_set(LocomotionSet::Sensors),
        );
    }
}

/// Perform a raycast using RapierContext, accepting only walkable surfaces.
///
/// The returned contact stores the hit normal in the hit body's local frame.
fn rapier_ground_raycast(
    context: &RapierContext,
    request: RaycastRequest,
    surfaces: &WalkableSurfaces,
    transforms: &Query<&GlobalTransform>,
) -> Option<GroundContact> {
    let exclude = request.exclude;
    let predicate = |hit: Entity| Some(hit) != exclude && surfaces.contains(hit);

    let mut filter = QueryFilter::default().exclude_sensors().predicate(&predicate);
    if let Some(entity) = exclude {
        filter = filter.exclude_rigid_body(entity);
    }

    context
        .cast_ray_and_get_normal(
            request.origin,
            request.direction,
            request.max_distance,
            true, // solid = true so a probe starting inside ground still hits
            filter,
        )
        .map(|(hit_entity, hit)| {
            let rotation = transforms
                .get(hit_entity)
                .map(|t| t.compute_transform().rotation)
                .unwrap_or(Quat::IDENTITY);
            GroundContact::from_world_normal(
                hit.time_of_impact,
                hit.normal,
                rotation,
                hit.point,
                Some(hit_entity),
            )
        })
}

/// Rapier-specific ground detection system.
///
/// Casts straight down from each ready body's center, up to
/// `ground_probe_length`, against [`WalkableSurfaces`] only.
fn rapier_ground_detection(
    rapier_context: ReadRapierContext,
    surfaces: Res<WalkableSurfaces>,
    transforms: Query<&GlobalTransform>,
    mut q_controllers: Query<
        (Entity, &LocomotionConfig, &mut LocomotionController),
        With<RapierRigidBodyHandle>,
    >,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, config, mut controller) in &mut q_controllers {
        controller.reset_detection_state();

        let Ok(transform) = transforms.get(entity) else {
            continue;
        };

        let request = RaycastRequest::downward(transform.translation(), config.ground_probe_length)
            .excluding(entity);
        controller.ground = rapier_ground_raycast(&context, request, &surfaces, &transforms);
    }
}

/// Bundle for creating a controlled character with Rapier3D physics.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use msg_locomotion::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 20.0, 0.0),
///         LocomotionController::new(),
///         LocomotionConfig::player(),
///         InputState::default(),
///         PlayerControlled,
///         Rapier3dPlayerBundle::default(),
///         Collider::capsule_y(0.5, 1.0),
///     ));
/// }
/// ```
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::Dynamic`]
/// - `velocity`: Zero velocity (rewritten by the controller while grounded)
/// - `locked_axes`: [`LockedAxes::ROTATION_LOCKED`], the capsule never tips over
/// - `friction`: 1.5
/// - `restitution`: 0.0, no bouncing on landing
#[derive(Bundle)]
pub struct Rapier3dPlayerBundle {
    /// The rigid body type. Should typically be [`RigidBody::Dynamic`].
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity. Written by the controller.
    pub velocity: Velocity,
    /// Which axes are locked.
    pub locked_axes: LockedAxes,
    /// Contact friction of the body's colliders.
    pub friction: Friction,
    /// Contact restitution of the body's colliders.
    pub restitution: Restitution,
}

impl Default for Rapier3dPlayerBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            friction: Friction::coefficient(1.5),
            restitution: Restitution::coefficient(0.0),
        }
    }
}

impl Rapier3dPlayerBundle {
    /// Set the rigid body type for the character.
    ///
    /// ```ignore
    /// let bundle = Rapier3dPlayerBundle::default()
    ///     .with_body(RigidBody::KinematicVelocityBased);
    /// ```
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }

    /// Set the friction coefficient.
    pub fn with_friction(mut self, coefficient: f32) -> Self {
        self.friction = Friction::coefficient(coefficient);
        self
    }

    /// Set the restitution coefficient.
    pub fn with_restitution(mut self, coefficient: f32) -> Self {
        self.restitution = Restitution::coefficient(coefficient);
        self
    }

    /// Set which axes should be locked for the rigid body.
    pub fn with_locked_axes(mut self, axes: LockedAxes) -> Self {
        self.locked_axes = axes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(TransformPlugin);
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn rapier_backend_get_position() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((Transform::from_xyz(1.0, 2.0, 3.0), RigidBody::Fixed))
            .id();

        app.update();

        let pos = Rapier3dBackend::get_position(app.world(), entity);
        assert!((pos - Vec3::new(1.0, 2.0, 3.0)).length() < 0.01);
    }

    #[test]
    fn rapier_backend_velocity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                RigidBody::Dynamic,
                Velocity::linear(Vec3::new(5.0, 3.0, -1.0)),
            ))
            .id();

        let vel = Rapier3dBackend::get_velocity(app.world(), entity);
        assert_eq!(vel, Vec3::new(5.0, 3.0, -1.0));

        Rapier3dBackend::set_velocity(app.world_mut(), entity, Vec3::new(10.0, 0.0, 0.0));

        let vel = Rapier3dBackend::get_velocity(app.world(), entity);
        assert_eq!(vel, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn missing_velocity_reads_as_zero() {
        let mut app = create_test_app();
        let entity = app.world_mut().spawn(Transform::default()).id();

        assert_eq!(Rapier3dBackend::get_velocity(app.world(), entity), Vec3::ZERO);
        Rapier3dBackend::set_velocity(app.world_mut(), entity, Vec3::ONE);
        assert!(app.world().get::<Velocity>(entity).is_none());
    }

    #[test]
    fn body_is_ready_after_registration() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                Rapier3dPlayerBundle::default(),
                Collider::capsule_y(0.5, 0.5),
            ))
            .id();
        assert!(!Rapier3dBackend::is_ready(app.world(), entity));

        app.update();
        assert!(Rapier3dBackend::is_ready(app.world(), entity));
    }

    #[test]
    fn player_bundle_creates_valid_entity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                Rapier3dPlayerBundle::default().with_friction(0.5),
                Collider::capsule_y(0.5, 0.5),
            ))
            .id();

        app.update();

        assert!(app.world().get::<RigidBody>(entity).is_some());
        assert!(app.world().get::<Velocity>(entity).is_some());
        assert_eq!(
            app.world().get::<LockedAxes>(entity).copied(),
            Some(LockedAxes::ROTATION_LOCKED)
        );
        assert_eq!(app.world().get::<Friction>(entity).map(|f| f.coefficient), Some(0.5));
    }
}
