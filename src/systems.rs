//! Core controller systems.
//!
//! These systems run the per-frame locomotion update. They are generic over
//! the physics backend so that different physics engines can be used, and
//! skip any entity whose body the backend does not report as ready.

use bevy::prelude::*;

use crate::backend::LocomotionBackend;
use crate::camera::LocomotionCamera;
use crate::config::LocomotionConfig;
use crate::controller::LocomotionController;
use crate::input::InputState;
use crate::state::{Airborne, Grounded};

/// Smooth every controller's look angles toward its input.
///
/// Runs whether or not the body is grounded.
pub fn update_orientation<B: LocomotionBackend>(world: &mut World) {
    let entities: Vec<(Entity, LocomotionConfig, InputState)> = world
        .query_filtered::<(Entity, &LocomotionConfig, &InputState), With<LocomotionController>>()
        .iter(world)
        .map(|(e, config, input)| (e, *config, *input))
        .collect();

    for (entity, config, input) in entities {
        if !B::is_ready(world, entity) {
            continue;
        }

        if let Some(mut controller) = world.get_mut::<LocomotionController>(entity) {
            controller.update_orientation(input.look, &config);
        }
    }
}

/// Apply movement input to grounded bodies.
///
/// New velocity is `velocity * drag + offset`, where the offset is the input
/// turned into the yaw frame and tilted onto the ground slope. Airborne
/// bodies are left to the physics engine.
pub fn apply_locomotion<B: LocomotionBackend>(world: &mut World) {
    let entities: Vec<(Entity, LocomotionConfig, InputState)> = world
        .query_filtered::<(Entity, &LocomotionConfig, &InputState), With<LocomotionController>>()
        .iter(world)
        .map(|(e, config, input)| (e, *config, *input))
        .collect();

    for (entity, config, input) in entities {
        if !B::is_ready(world, entity) {
            continue;
        }

        let velocity = B::get_velocity(world, entity);
        let new_velocity = match world.get_mut::<LocomotionController>(entity) {
            Some(mut controller) => controller.integrate_velocity(velocity, &input, &config),
            None => None,
        };

        if let Some(new_velocity) = new_velocity {
            trace!(?entity, ?velocity, ?new_velocity, "locomotion velocity");
            B::set_velocity(world, entity, new_velocity);
        }
    }
}

/// Move each [`LocomotionCamera`] toward its target's framing and copy its gaze.
pub fn follow_camera<B: LocomotionBackend>(world: &mut World) {
    let cameras: Vec<(Entity, Entity, Vec3)> = world
        .query::<(Entity, &LocomotionCamera, &Transform)>()
        .iter(world)
        .map(|(e, link, transform)| (e, link.target, transform.translation))
        .collect();

    for (camera, target, camera_position) in cameras {
        if !B::is_ready(world, target) {
            continue;
        }

        let (Some(controller), Some(config)) = (
            world.get::<LocomotionController>(target),
            world.get::<LocomotionConfig>(target),
        ) else {
            continue;
        };

        let body_position = B::get_position(world, target);
        let pose = controller.camera_pose(camera_position, body_position, config);

        if let Some(mut transform) = world.get_mut::<Transform>(camera) {
            pose.apply_to(&mut transform);
        }
    }
}

/// Keep [`Grounded`] / [`Airborne`] in line with the last ground probe.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &LocomotionController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q_controllers {
        let grounded = controller.is_grounded();

        if grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
            debug!(?entity, "landed");
        } else if !grounded && has_grounded {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
            debug!(?entity, "left the ground");
        } else if !grounded && !has_airborne {
            commands.entity(entity).insert(Airborne);
        }
    }
}

/// Report configs the controller cannot work with.
///
/// The controller keeps running with them; this only makes the mistake visible.
pub fn warn_invalid_configs(
    q_configs: Query<(Entity, &LocomotionConfig), Changed<LocomotionConfig>>,
) {
    for (entity, config) in &q_configs {
        if let Err(err) = config.validate() {
            warn!(?entity, "invalid locomotion config: {err}");
        }
    }
}
