//! State marker components.
//!
//! These components indicate whether a controlled body stood on walkable
//! ground during the last locomotion pass. They are added and removed by
//! [`sync_state_markers`](crate::systems::sync_state_markers).

use bevy::prelude::*;

/// Marker component indicating the character is grounded.
///
/// Added when the ground probe hits a walkable surface. Only grounded
/// characters have their velocity driven by input.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_locomotion::prelude::*;
///
/// // Grounded is a marker component - just use it in queries
/// fn check_grounded(grounded: Option<&Grounded>) -> bool {
///     grounded.is_some()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
