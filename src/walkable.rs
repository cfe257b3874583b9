//! Walkable surface registry.
//!
//! Ground probes only accept surfaces listed in [`WalkableSurfaces`]. The list
//! is kept up to date from [`Walkable`] markers as they are added and removed,
//! so probes never have to scan the scene.

use std::collections::HashSet;

use bevy::prelude::*;

/// Marks a collider entity as ground the character may stand on.
///
/// The controlled body itself should never carry this marker; probes also
/// exclude the casting body explicitly.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Walkable;

/// The set of entities ground probes may hit.
#[derive(Resource, Debug, Clone, Default)]
pub struct WalkableSurfaces {
    entities: HashSet<Entity>,
}

impl WalkableSurfaces {
    /// Check if an entity is registered as walkable.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Register an entity. Returns `false` if it was already registered.
    pub fn insert(&mut self, entity: Entity) -> bool {
        self.entities.insert(entity)
    }

    /// Unregister an entity. Returns `false` if it was not registered.
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.entities.remove(&entity)
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no surface is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Registered surface entities, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }
}

/// Keep [`WalkableSurfaces`] in sync with [`Walkable`] markers.
pub fn sync_walkable_surfaces(
    added: Query<Entity, Added<Walkable>>,
    mut removed: RemovedComponents<Walkable>,
    mut surfaces: ResMut<WalkableSurfaces>,
) {
    for entity in removed.read() {
        if surfaces.remove(entity) {
            debug!(?entity, "walkable surface unregistered");
        }
    }

    for entity in &added {
        if surfaces.insert(entity) {
            debug!(?entity, "walkable surface registered");
        }
    }
}
