//! Third-person camera that follows a locomotion controller.

use bevy::prelude::*;

/// Camera placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// World-space camera position.
    pub position: Vec3,
    /// World-space camera rotation.
    pub orientation: Quat,
}

impl CameraPose {
    /// Write the pose into a transform, leaving scale untouched.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.translation = self.position;
        transform.rotation = self.orientation;
    }
}

/// Marks a camera that follows the given controlled entity.
///
/// The camera's transform is fully driven by the target's
/// [`LocomotionController`](crate::controller::LocomotionController): position
/// is smoothed toward an offset behind the body and rotation copies the gaze.
///
/// ```rust,ignore
/// let player = commands.spawn(player_bundle).id();
/// commands.spawn((Camera3d::default(), LocomotionCamera::following(player)));
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct LocomotionCamera {
    /// Entity whose controller drives this camera.
    pub target: Entity,
}

impl LocomotionCamera {
    /// Camera link that follows `target`.
    pub fn following(target: Entity) -> Self {
        Self { target }
    }
}
