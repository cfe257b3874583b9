//! # `msg_locomotion`
//!
//! A third-person, mouse-look locomotion controller for rigid-body characters
//! in 3D, with physics backend abstraction.
//!
//! This crate provides a small controller that:
//! - Smooths yaw/pitch toward a look target and drives a follow camera
//! - Probes for walkable ground with a short downward raycast
//! - Steers the body's velocity from input only while grounded
//! - Tilts movement onto sloped ground so the body hugs the surface
//! - Accepts input from any number of independent device producers
//! - Abstracts the physics backend (Rapier3D included)
//!
//! ## Architecture
//!
//! Each frame, in [`Update`]:
//! 1. [`LocomotionSet::Input`]: producers fill [`InputState`](input::InputState)
//! 2. [`LocomotionSet::Preparation`]: the walkable registry is synced
//! 3. [`LocomotionSet::Sensors`]: the backend probes for ground
//! 4. [`LocomotionSet::Orientation`]: look angles are smoothed
//! 5. [`LocomotionSet::Movement`]: grounded bodies get a new velocity
//! 6. [`LocomotionSet::Camera`]: follow cameras are placed
//!
//! Gravity, collisions and integration stay with the physics engine.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_locomotion::prelude::*;
//!
//! // Components for a controlled character
//! let controller = LocomotionController::new();
//! let config = LocomotionConfig::player();
//! let input = InputState::default();
//!
//! // These can be spawned with physics components and `PlayerControlled`
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod camera;
pub mod collision;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod state;
pub mod systems;
pub mod walkable;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::LocomotionBackend;
    pub use crate::camera::{CameraPose, LocomotionCamera};
    pub use crate::collision::GroundContact;
    pub use crate::config::LocomotionConfig;
    pub use crate::controller::{LocomotionController, OrientationState};
    pub use crate::error::ConfigError;
    pub use crate::input::{
        CursorCaptureSet, InputState, LocomotionInputPlugin, MouseLook, PlayerControlled,
    };
    pub use crate::state::{Airborne, Grounded};
    pub use crate::walkable::{Walkable, WalkableSurfaces};
    pub use crate::{LocomotionPlugin, LocomotionSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dPlayerBundle};
}

/// Ordered phases of the per-frame update.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Device producers write [`InputState`](input::InputState).
    Input,
    /// Registry and config bookkeeping.
    Preparation,
    /// Backend ground probes.
    Sensors,
    /// Look smoothing.
    Orientation,
    /// Velocity update of grounded bodies.
    Movement,
    /// Follow cameras.
    Camera,
}

/// Main plugin for the locomotion controller.
///
/// This plugin is generic over a physics backend `B` which provides the actual
/// physics operations (ground probing, velocity access, etc.).
///
/// Device input is not read by this plugin; add [`input::LocomotionInputPlugin`]
/// for keyboard, mouse and gamepad, or write
/// [`InputState`](input::InputState) from your own systems in
/// [`LocomotionSet::Input`].
///
/// # Examples
///
/// With Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use msg_locomotion::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(LocomotionPlugin::<Rapier3dBackend>::default())
///     .add_plugins(LocomotionInputPlugin)
///     .run();
/// ```
pub struct LocomotionPlugin<B: backend::LocomotionBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::LocomotionBackend> Default for LocomotionPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::LocomotionBackend> Plugin for LocomotionPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<controller::LocomotionController>();
        app.register_type::<config::LocomotionConfig>();
        app.register_type::<input::InputState>();
        app.register_type::<camera::LocomotionCamera>();
        app.register_type::<walkable::Walkable>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.init_resource::<walkable::WalkableSurfaces>();

        app.configure_sets(
            Update,
            (
                LocomotionSet::Input,
                LocomotionSet::Preparation,
                LocomotionSet::Sensors,
                LocomotionSet::Orientation,
                LocomotionSet::Movement,
                LocomotionSet::Camera,
            )
                .chain(),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.add_systems(
            Update,
            (walkable::sync_walkable_surfaces, systems::warn_invalid_configs)
                .in_set(LocomotionSet::Preparation),
        );
        app.add_systems(
            Update,
            systems::update_orientation::<B>.in_set(LocomotionSet::Orientation),
        );
        app.add_systems(
            Update,
            (systems::apply_locomotion::<B>, systems::sync_state_markers)
                .chain()
                .in_set(LocomotionSet::Movement),
        );
        app.add_systems(
            Update,
            systems::follow_camera::<B>.in_set(LocomotionSet::Camera),
        );

        debug!("locomotion plugin built");
    }
}
