//! Locomotion controller component.
//!
//! [`LocomotionController`] owns the smoothed look angles and the per-frame
//! scratch values. All math of the per-frame update lives here as plain
//! methods, so the systems in [`crate::systems`] only move data between the
//! physics backend and this component.
//!
//! One frame runs, in order:
//! 1. [`update_orientation`](LocomotionController::update_orientation), always
//! 2. ground sensing (backend specific, stored in [`LocomotionController::ground`])
//! 3. [`slope`](LocomotionController::slope), grounded only
//! 4. [`integrate_velocity`](LocomotionController::integrate_velocity), grounded only
//! 5. [`camera_pose`](LocomotionController::camera_pose), always

use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::camera::CameraPose;
use crate::collision::GroundContact;
use crate::config::LocomotionConfig;
use crate::input::InputState;

/// Smoothed look angles, the only state the controller carries across frames.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationState {
    /// Yaw about world up, radians. Unbounded.
    pub phi: f32,
    /// Pitch about the yaw frame's right axis, radians. Clamped to the pitch limit.
    pub theta: f32,
}

/// Core locomotion controller component.
///
/// Holds [`OrientationState`], the ground contact of the current frame, and
/// scratch rotations that are overwritten in place every frame.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_locomotion::prelude::*;
///
/// let config = LocomotionConfig::default();
/// let mut controller = LocomotionController::new();
///
/// controller.update_orientation(Vec2::new(0.1, 0.0), &config);
/// assert!(controller.orientation().phi < 0.0);
/// assert!(controller.gaze().is_normalized());
/// ```
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct LocomotionController {
    orientation: OrientationState,

    /// Ground found by this frame's probe. `None` means airborne.
    #[reflect(ignore)]
    pub ground: Option<GroundContact>,

    // Scratch, rewritten every frame.
    yaw: Quat,
    pitch: Quat,
    gaze: Quat,
    offset: Vec3,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self {
            orientation: OrientationState::default(),
            ground: None,
            yaw: Quat::IDENTITY,
            pitch: Quat::IDENTITY,
            gaze: Quat::IDENTITY,
            offset: Vec3::ZERO,
        }
    }
}

impl LocomotionController {
    /// Create a controller looking down world -Z.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller with initial look angles. Pitch is clamped to `max_pitch`.
    pub fn with_orientation(phi: f32, theta: f32, config: &LocomotionConfig) -> Self {
        let mut controller = Self {
            orientation: OrientationState {
                phi,
                theta: theta.clamp(-config.max_pitch, config.max_pitch),
            },
            ..default()
        };
        controller.rebuild_rotations();
        controller
    }

    /// Current smoothed look angles.
    #[inline]
    pub fn orientation(&self) -> OrientationState {
        self.orientation
    }

    /// Yaw rotation of the last orientation update.
    #[inline]
    pub fn yaw(&self) -> Quat {
        self.yaw
    }

    /// Camera orientation of the last orientation update (yaw then pitch).
    #[inline]
    pub fn gaze(&self) -> Quat {
        self.gaze
    }

    /// Offset added to the velocity by the last grounded update.
    #[inline]
    pub fn last_offset(&self) -> Vec3 {
        self.offset
    }

    /// Whether the last ground probe found a walkable surface.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.ground.is_some()
    }

    /// Smooth the look angles toward the target given by `look`.
    ///
    /// `look` is an absolute offset, not a per-frame delta: the angles converge
    /// to `-look * camera_speed` and return to zero when `look` does.
    pub fn update_orientation(&mut self, look: Vec2, config: &LocomotionConfig) {
        let target_phi = -look.x * config.camera_speed;
        let target_theta = -look.y * config.camera_speed;

        let phi = self.orientation.phi.lerp(target_phi, config.look_smoothing);
        let theta = self
            .orientation
            .theta
            .lerp(target_theta, config.look_smoothing)
            .clamp(-config.max_pitch, config.max_pitch);

        // Non-finite look input would poison the state for good.
        if phi.is_finite() && theta.is_finite() {
            self.orientation = OrientationState { phi, theta };
        }

        self.rebuild_rotations();
    }

    fn rebuild_rotations(&mut self) {
        self.yaw = Quat::from_axis_angle(Vec3::Y, self.orientation.phi);
        self.pitch = Quat::from_axis_angle(Vec3::X, self.orientation.theta);
        self.gaze = (self.yaw * self.pitch).normalize();
    }

    /// Rotation taking world up onto the supporting surface's world normal.
    ///
    /// Without a contact, or with a contact that has no usable normal, the
    /// surface is treated as flat and the identity is returned.
    pub fn slope(contact: Option<&GroundContact>) -> Quat {
        let normal = contact
            .and_then(GroundContact::world_normal)
            .unwrap_or(Vec3::Y);
        Quat::from_rotation_arc(Vec3::Y, normal)
    }

    /// Velocity offset produced by `input` on the given ground.
    ///
    /// The move direction is normalized (zero stays zero), scaled per axis by
    /// `(walk / 2, jump, walk)` (times the run multiplier when running), turned
    /// into the yaw frame, then tilted onto the slope.
    pub fn locomotion_offset(
        &self,
        input: &InputState,
        contact: Option<&GroundContact>,
        config: &LocomotionConfig,
    ) -> Vec3 {
        let direction = input.move_dir.normalize_or_zero();
        let local = direction * config.effective_speed(input.running);
        Self::slope(contact) * (self.yaw * local)
    }

    /// Compute the new body velocity for this frame.
    ///
    /// Returns `None` while airborne: the body keeps whatever velocity the
    /// physics engine gives it. When grounded, returns
    /// `velocity * drag + offset`.
    pub fn integrate_velocity(
        &mut self,
        velocity: Vec3,
        input: &InputState,
        config: &LocomotionConfig,
    ) -> Option<Vec3> {
        let contact = self.ground?;
        self.offset = self.locomotion_offset(input, Some(&contact), config);
        Some(velocity * config.drag + self.offset)
    }

    /// Where the camera should be this frame, given where it is now.
    pub fn camera_pose(
        &self,
        camera_position: Vec3,
        body_position: Vec3,
        config: &LocomotionConfig,
    ) -> CameraPose {
        let target = body_position + self.yaw * config.camera_offset;
        CameraPose {
            position: camera_position.lerp(target, config.camera_smoothing),
            orientation: self.gaze,
        }
    }

    /// Forget the previous ground contact (called before each probe).
    pub(crate) fn reset_detection_state(&mut self) {
        self.ground = None;
        self.offset = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

    fn flat_ground() -> GroundContact {
        GroundContact::new(1.0, Some(Vec3::Y), Quat::IDENTITY, Vec3::ZERO, None)
    }

    fn grounded() -> LocomotionController {
        LocomotionController {
            ground: Some(flat_ground()),
            ..default()
        }
    }

    fn walking(move_dir: Vec3) -> InputState {
        InputState {
            move_dir,
            ..default()
        }
    }

    #[test]
    fn new_controller_looks_straight_ahead() {
        let controller = LocomotionController::new();
        assert_eq!(controller.orientation(), OrientationState::default());
        assert_eq!(controller.gaze(), Quat::IDENTITY);
        assert!(!controller.is_grounded());
    }

    #[test]
    fn pitch_stays_within_limit_for_any_look() {
        let config = LocomotionConfig::default();
        let looks = [
            Vec2::new(0.0, 100.0),
            Vec2::new(0.0, -100.0),
            Vec2::new(3.0, 1e6),
            Vec2::new(-0.5, -1e9),
            Vec2::new(0.2, 0.4),
        ];

        for look in looks {
            let mut controller = LocomotionController::new();
            controller.update_orientation(look, &config);
            let theta = controller.orientation().theta;
            assert!(
                (-FRAC_PI_3..=FRAC_PI_3).contains(&theta),
                "theta {theta} out of range for look {look:?}"
            );
        }
    }

    #[test]
    fn pitch_saturates_at_limit() {
        let config = LocomotionConfig::default();
        let mut controller = LocomotionController::new();
        for _ in 0..50 {
            controller.update_orientation(Vec2::new(0.0, -10.0), &config);
        }
        assert_eq!(controller.orientation().theta, FRAC_PI_3);
    }

    #[test]
    fn gaze_is_unit_after_updates() {
        let config = LocomotionConfig::default();
        let mut controller = LocomotionController::new();
        for i in 0..100 {
            let t = i as f32 * 0.37;
            controller.update_orientation(Vec2::new(t.sin() * 4.0, t.cos() * 2.0), &config);
            assert!(controller.gaze().is_normalized());
        }
    }

    #[test]
    fn orientation_is_smoothed_not_snapped() {
        let config = LocomotionConfig::default();
        let mut controller = LocomotionController::new();
        controller.update_orientation(Vec2::new(0.1, 0.0), &config);

        // One step covers 30% of the way to -0.1 * 3.
        let expected = -0.3 * 0.3;
        assert!((controller.orientation().phi - expected).abs() < 1e-6);
    }

    #[test]
    fn look_is_an_absolute_target() {
        // Documented behavior: a constant look converges to a fixed angle rather
        // than spinning, and releasing look returns the view to center.
        let config = LocomotionConfig::default();
        let mut controller = LocomotionController::new();

        for _ in 0..100 {
            controller.update_orientation(Vec2::new(0.25, 0.0), &config);
        }
        assert!((controller.orientation().phi - (-0.75)).abs() < 1e-4);

        for _ in 0..100 {
            controller.update_orientation(Vec2::ZERO, &config);
        }
        assert!(controller.orientation().phi.abs() < 1e-4);
    }

    #[test]
    fn non_finite_look_keeps_previous_angles() {
        let config = LocomotionConfig::default();
        let mut controller = LocomotionController::new();
        controller.update_orientation(Vec2::new(0.1, 0.1), &config);
        let before = controller.orientation();

        controller.update_orientation(Vec2::new(f32::NAN, 0.0), &config);
        assert_eq!(controller.orientation(), before);
        assert!(controller.gaze().is_normalized());
    }

    #[test]
    fn with_orientation_clamps_pitch() {
        let config = LocomotionConfig::default();
        let controller = LocomotionController::with_orientation(1.0, FRAC_PI_2, &config);
        assert_eq!(controller.orientation().phi, 1.0);
        assert_eq!(controller.orientation().theta, FRAC_PI_3);
    }

    #[test]
    fn slope_defaults_to_identity() {
        assert_eq!(LocomotionController::slope(None), Quat::IDENTITY);

        let no_normal = GroundContact::new(1.0, None, Quat::IDENTITY, Vec3::ZERO, None);
        assert_eq!(LocomotionController::slope(Some(&no_normal)), Quat::IDENTITY);
    }

    #[test]
    fn slope_maps_up_onto_surface_normal() {
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let contact = GroundContact::new(1.0, Some(normal), Quat::IDENTITY, Vec3::ZERO, None);
        let slope = LocomotionController::slope(Some(&contact));
        assert!((slope * Vec3::Y - normal).length() < 1e-5);
    }

    #[test]
    fn slope_uses_supporting_body_rotation() {
        // Local +Y on a body rolled 45 degrees about Z.
        let rotation = Quat::from_rotation_z(FRAC_PI_4);
        let contact = GroundContact::new(1.0, Some(Vec3::Y), rotation, Vec3::ZERO, None);
        let slope = LocomotionController::slope(Some(&contact));
        assert!((slope * Vec3::Y - rotation * Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn zero_move_only_applies_drag() {
        let config = LocomotionConfig::default();
        let velocity = Vec3::new(2.0, -3.0, 4.0);

        for running in [false, true] {
            let mut controller = grounded();
            let input = InputState {
                running,
                ..default()
            };
            let new_velocity = controller.integrate_velocity(velocity, &input, &config).unwrap();

            assert_eq!(controller.last_offset(), Vec3::ZERO);
            assert_eq!(new_velocity, velocity * config.drag);
            assert!(new_velocity.is_finite());
        }
    }

    #[test]
    fn airborne_leaves_velocity_alone() {
        let config = LocomotionConfig::default();
        let mut controller = LocomotionController::new();
        let input = walking(Vec3::NEG_Z);

        assert_eq!(controller.integrate_velocity(Vec3::new(1.0, -5.0, 0.0), &input, &config), None);
    }

    #[test]
    fn forward_walk_on_flat_ground() {
        let config = LocomotionConfig::default().with_speeds(4.0, 4.0);
        let controller = grounded();
        let offset = controller.locomotion_offset(&walking(Vec3::NEG_Z), controller.ground.as_ref(), &config);

        assert!((offset.xz().length() - 4.0).abs() < 1e-5);
        assert!((offset - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
        assert_eq!(offset.y, 0.0);
    }

    #[test]
    fn running_is_two_and_a_half_times_walking() {
        let config = LocomotionConfig::default().with_speeds(4.0, 4.0);
        let controller = grounded();

        for dir in [Vec3::NEG_Z, Vec3::X, Vec3::new(1.0, 0.0, -1.0)] {
            let walk = controller.locomotion_offset(&walking(dir), controller.ground.as_ref(), &config);
            let run = controller.locomotion_offset(
                &InputState {
                    move_dir: dir,
                    running: true,
                    ..default()
                },
                controller.ground.as_ref(),
                &config,
            );
            let ratio = run.xz().length() / walk.xz().length();
            assert!((ratio - 2.5).abs() < 1e-5, "ratio {ratio} for {dir:?}");
        }
    }

    #[test]
    fn strafe_is_half_speed() {
        let config = LocomotionConfig::default().with_speeds(4.0, 4.0);
        let controller = grounded();
        let offset = controller.locomotion_offset(&walking(Vec3::X), controller.ground.as_ref(), &config);
        assert!((offset - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn jump_axis_uses_jump_speed() {
        let config = LocomotionConfig::default().with_speeds(3.0, 7.0);
        let controller = grounded();
        let offset = controller.locomotion_offset(&walking(Vec3::Y), controller.ground.as_ref(), &config);
        assert!((offset - Vec3::new(0.0, 7.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn movement_follows_yaw() {
        let config = LocomotionConfig::default().with_speeds(4.0, 4.0);
        let mut controller = LocomotionController::with_orientation(FRAC_PI_2, 0.0, &config);
        controller.ground = Some(flat_ground());

        // Facing rotated a quarter turn left: forward (-Z) becomes -X.
        let offset = controller.locomotion_offset(&walking(Vec3::NEG_Z), controller.ground.as_ref(), &config);
        assert!((offset - Vec3::new(-4.0, 0.0, 0.0)).length() < 1e-4, "got {offset:?}");
    }

    #[test]
    fn movement_hugs_slope() {
        let config = LocomotionConfig::default().with_speeds(4.0, 4.0);
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let contact = GroundContact::new(1.0, Some(normal), Quat::IDENTITY, Vec3::ZERO, None);
        let controller = LocomotionController::new();

        let offset = controller.locomotion_offset(&walking(Vec3::NEG_Z), Some(&contact), &config);
        assert!(offset.dot(normal).abs() < 1e-5, "offset {offset:?} leaves the surface");
        assert!((offset.length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn velocity_is_drag_plus_offset() {
        let config = LocomotionConfig::default().with_speeds(4.0, 4.0);
        let mut controller = grounded();
        let velocity = Vec3::new(1.0, 2.0, 3.0);

        let new_velocity = controller
            .integrate_velocity(velocity, &walking(Vec3::NEG_Z), &config)
            .unwrap();
        let expected = Vec3::new(0.85, 2.0, 3.0 * 0.85 - 4.0);
        assert!((new_velocity - expected).length() < 1e-5);
    }

    #[test]
    fn camera_moves_part_way_to_target() {
        let config = LocomotionConfig::default();
        let controller = LocomotionController::new();
        let camera = Vec3::new(0.0, 40.0, 40.0);
        let body = Vec3::new(0.0, 20.0, 0.0);
        let target = body + config.camera_offset;

        let pose = controller.camera_pose(camera, body, &config);
        let before = camera.distance(target);
        let after = pose.position.distance(target);
        let travelled = camera.distance(pose.position);

        assert!(after < before);
        assert!(travelled > 0.0);
        assert!((travelled + after - before).abs() < 1e-4, "camera left the segment");
        assert!((after - 0.75 * before).abs() < 1e-4);
        assert_eq!(pose.orientation, controller.gaze());
    }

    #[test]
    fn camera_offset_follows_yaw() {
        let config = LocomotionConfig::default().with_camera(Vec3::new(0.0, 3.0, 5.0), 1.0);
        let controller = LocomotionController::with_orientation(FRAC_PI_2, 0.0, &config);

        let pose = controller.camera_pose(Vec3::ZERO, Vec3::ZERO, &config);
        assert!((pose.position - Vec3::new(5.0, 3.0, 0.0)).length() < 1e-4, "got {:?}", pose.position);
    }

    #[test]
    fn reset_clears_ground_but_keeps_orientation() {
        let config = LocomotionConfig::default();
        let mut controller = grounded();
        controller.update_orientation(Vec2::new(0.3, 0.1), &config);
        let orientation = controller.orientation();

        controller.reset_detection_state();
        assert!(!controller.is_grounded());
        assert_eq!(controller.orientation(), orientation);
    }
}
