//! Ground query result structures.
//!
//! [`GroundContact`] holds the result of the downward ground probe that
//! decides whether locomotion input is applied this frame.

use bevy::prelude::*;

/// Information about the surface found below a character.
///
/// The surface normal is stored in the **local frame of the hit body**, next
/// to that body's world rotation. Consumers rotate the normal back into world
/// space themselves (see [`GroundContact::world_normal`]), which keeps mesh
/// normals and physics normals interchangeable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Surface normal in the hit body's local frame, if the query exposed one.
    pub normal: Option<Vec3>,
    /// World rotation of the supporting body.
    pub surface_rotation: Quat,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if any).
    pub entity: Option<Entity>,
}

impl Default for GroundContact {
    fn default() -> Self {
        Self {
            distance: 0.0,
            normal: None,
            surface_rotation: Quat::IDENTITY,
            point: Vec3::ZERO,
            entity: None,
        }
    }
}

impl GroundContact {
    /// Create a contact from a normal already expressed in the hit body's local frame.
    pub fn new(
        distance: f32,
        normal: Option<Vec3>,
        surface_rotation: Quat,
        point: Vec3,
        entity: Option<Entity>,
    ) -> Self {
        Self {
            distance,
            normal,
            surface_rotation,
            point,
            entity,
        }
    }

    /// Create a contact from a world-space normal, as physics queries report it.
    ///
    /// The normal is moved into the hit body's local frame so that
    /// [`world_normal`](Self::world_normal) recovers it exactly.
    pub fn from_world_normal(
        distance: f32,
        world_normal: Vec3,
        surface_rotation: Quat,
        point: Vec3,
        entity: Option<Entity>,
    ) -> Self {
        let rotation = surface_rotation.normalize();
        Self::new(
            distance,
            Some(rotation.inverse() * world_normal),
            rotation,
            point,
            entity,
        )
    }

    /// World-space unit normal of the supporting surface.
    ///
    /// Returns `None` when the query exposed no normal or it was degenerate.
    pub fn world_normal(&self) -> Option<Vec3> {
        let local = self.normal?.try_normalize()?;
        (self.surface_rotation * local).try_normalize()
    }
}
