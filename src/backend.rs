//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! drive the locomotion controller. The controller only reads positions and
//! velocities and writes velocities; ground probing is provided by the
//! backend's own plugin, which fills
//! [`LocomotionController::ground`](crate::controller::LocomotionController::ground)
//! during [`LocomotionSet::Sensors`](crate::LocomotionSet::Sensors).

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// For an example implementation, see the `rapier` module's `Rapier3dBackend`.
pub trait LocomotionBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend (ground probe systems etc).
    fn plugin() -> impl Plugin;

    /// Whether the entity's body has been registered with the physics engine.
    ///
    /// Entities that are not ready are skipped for the whole frame.
    fn is_ready(world: &World, entity: Entity) -> bool;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Get the current world position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec3;
}

/// Helper struct for building raycasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastRequest {
    /// Origin point of the ray.
    pub origin: Vec3,
    /// Direction of the ray (normalized).
    pub direction: Vec3,
    /// Maximum distance to cast.
    pub max_distance: f32,
    /// Entity to exclude from results.
    pub exclude: Option<Entity>,
}

impl RaycastRequest {
    /// Create a new raycast request.
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            max_distance,
            exclude: None,
        }
    }

    /// Straight down along world -Y.
    pub fn downward(origin: Vec3, max_distance: f32) -> Self {
        Self::new(origin, Vec3::NEG_Y, max_distance)
    }

    /// Exclude an entity from the raycast.
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    /// Point at `distance` along the ray.
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_normalizes_direction() {
        let request = RaycastRequest::new(Vec3::ZERO, Vec3::new(0.0, -5.0, 0.0), 2.0);
        assert_eq!(request.direction, Vec3::NEG_Y);
        assert_eq!(request.exclude, None);
    }

    #[test]
    fn downward_request_excluding_self() {
        let entity = Entity::from_raw(3);
        let request = RaycastRequest::downward(Vec3::new(1.0, 10.0, 2.0), 2.0).excluding(entity);

        assert_eq!(request.exclude, Some(entity));
        assert_eq!(request.point_at(2.0), Vec3::new(1.0, 8.0, 2.0));
    }
}
