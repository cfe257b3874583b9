//! Controller configuration component.
//!
//! [`LocomotionConfig`] holds the two gameplay speeds (`walk`, `jump`) and the
//! tuning constants of the orientation, movement and camera steps.

use std::f32::consts::FRAC_PI_3;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration parameters for the locomotion controller.
///
/// Construction-time data: the controller systems only read it.
///
/// # Example
///
/// ```rust
/// use msg_locomotion::prelude::*;
///
/// let config = LocomotionConfig::new(5.0, 5.0).unwrap();
/// assert_eq!(config.walk, 5.0);
///
/// assert!(LocomotionConfig::new(0.0, 5.0).is_err());
/// ```
#[derive(Component, Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[serde(default, deny_unknown_fields)]
pub struct LocomotionConfig {
    // === Speeds ===
    /// Base horizontal speed. Forward/back uses the full value, strafing half of it.
    pub walk: f32,
    /// Vertical launch speed applied while the jump axis is held on the ground.
    pub jump: f32,
    /// Multiplier applied to all speeds while running.
    pub run_multiplier: f32,

    // === Orientation ===
    /// Radians of yaw/pitch per unit of look offset.
    pub camera_speed: f32,
    /// Exponential smoothing factor toward the look target, per frame.
    pub look_smoothing: f32,
    /// Pitch is clamped to `[-max_pitch, max_pitch]`.
    pub max_pitch: f32,

    // === Ground ===
    /// Length of the downward ground probe.
    pub ground_probe_length: f32,
    /// Per-axis velocity retention applied every grounded frame.
    pub drag: Vec3,

    // === Camera ===
    /// Camera offset from the body, in the yaw frame.
    pub camera_offset: Vec3,
    /// Fraction of the remaining distance the camera covers per frame.
    pub camera_smoothing: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk: 3.0,
            jump: 4.0,
            run_multiplier: 2.5,

            camera_speed: 3.0,
            look_smoothing: 0.3,
            max_pitch: FRAC_PI_3,

            ground_probe_length: 2.0,
            drag: Vec3::new(0.85, 1.0, 0.85),

            camera_offset: Vec3::new(0.0, 3.0, 5.0),
            camera_smoothing: 0.25,
        }
    }
}

impl LocomotionConfig {
    /// Create a validated config with the given walk and jump speeds.
    pub fn new(walk: f32, jump: f32) -> Result<Self, ConfigError> {
        Self::default().with_speeds(walk, jump).validated()
    }

    /// Config used by the demo scene's player.
    pub fn player() -> Self {
        Self {
            walk: 5.0,
            jump: 5.0,
            ..default()
        }
    }

    /// Per-axis speed scale: `(walk / 2, jump, walk)`.
    #[inline]
    pub fn speed(&self) -> Vec3 {
        Vec3::new(self.walk / 2.0, self.jump, self.walk)
    }

    /// Per-axis speed scale, including the run multiplier when `running`.
    #[inline]
    pub fn effective_speed(&self, running: bool) -> Vec3 {
        if running {
            self.speed() * self.run_multiplier
        } else {
            self.speed()
        }
    }

    /// Check every field that the controller relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.walk.is_finite() && self.walk > 0.0) {
            return Err(ConfigError::NonPositiveWalk(self.walk));
        }
        if !(self.jump.is_finite() && self.jump > 0.0) {
            return Err(ConfigError::NonPositiveJump(self.jump));
        }
        for (name, value) in [
            ("look_smoothing", self.look_smoothing),
            ("camera_smoothing", self.camera_smoothing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidSmoothing { name, value });
            }
        }
        if !(self.max_pitch > 0.0 && self.max_pitch < std::f32::consts::FRAC_PI_2) {
            return Err(ConfigError::InvalidPitchLimit(self.max_pitch));
        }
        Ok(())
    }

    /// Consume the config, returning it only if it validates.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Parse a config from TOML. Missing fields take their defaults.
    ///
    /// ```rust
    /// use msg_locomotion::prelude::*;
    ///
    /// let config = LocomotionConfig::from_toml_str("walk = 6.0\njump = 2.0").unwrap();
    /// assert_eq!(config.walk, 6.0);
    /// assert_eq!(config.camera_speed, 3.0);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validated()
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Builder: set walk and jump speeds.
    pub fn with_speeds(mut self, walk: f32, jump: f32) -> Self {
        self.walk = walk;
        self.jump = jump;
        self
    }

    /// Builder: set the run multiplier.
    pub fn with_run_multiplier(mut self, multiplier: f32) -> Self {
        self.run_multiplier = multiplier;
        self
    }

    /// Builder: set look sensitivity and smoothing.
    pub fn with_look(mut self, camera_speed: f32, smoothing: f32) -> Self {
        self.camera_speed = camera_speed;
        self.look_smoothing = smoothing;
        self
    }

    /// Builder: set the pitch limit.
    pub fn with_max_pitch(mut self, max_pitch: f32) -> Self {
        self.max_pitch = max_pitch;
        self
    }

    /// Builder: set the ground probe length.
    pub fn with_ground_probe_length(mut self, length: f32) -> Self {
        self.ground_probe_length = length;
        self
    }

    /// Builder: set the per-axis drag.
    pub fn with_drag(mut self, drag: Vec3) -> Self {
        self.drag = drag;
        self
    }

    /// Builder: set the camera offset and smoothing.
    pub fn with_camera(mut self, offset: Vec3, smoothing: f32) -> Self {
        self.camera_offset = offset;
        self.camera_smoothing = smoothing;
        self
    }
}
