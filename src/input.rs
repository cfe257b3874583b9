//! Player input.
//!
//! [`InputState`] is the one contract the controller reads. Any number of
//! independent producers (keyboard and mouse, gamepad, touch, AI) fill it each
//! frame; they never know about each other and the controller never knows
//! which device was used.
//!
//! The producers shipped here are plain functions ([`keyboard_mouse_input`],
//! [`gamepad_input`]) wrapped by systems in [`LocomotionInputPlugin`].

use bevy::input::gamepad::{Gamepad, GamepadButton};
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::LocomotionSet;

/// Normalized input for one frame.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_locomotion::prelude::*;
///
/// let keyboard = InputState::new(Vec3::NEG_Z, Vec2::ZERO, false);
/// let gamepad = InputState::new(Vec3::X, Vec2::new(0.2, 0.0), true);
///
/// let combined = keyboard.combine(gamepad);
/// assert_eq!(combined.move_dir, Vec3::new(1.0, 0.0, -1.0));
/// assert!(combined.running);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct InputState {
    /// Desired movement in the yaw frame: +X right, +Y jump, -Z forward.
    /// Components are expected in `[-1, 1]`; the controller normalizes.
    pub move_dir: Vec3,
    /// Desired look offset in screen units, roughly `[-1, 1]` per axis.
    /// An absolute target, not a per-frame delta.
    pub look: Vec2,
    /// Whether the run multiplier applies.
    pub running: bool,
}

impl InputState {
    /// Input with the given movement, look target and run flag.
    pub fn new(move_dir: Vec3, look: Vec2, running: bool) -> Self {
        Self {
            move_dir,
            look,
            running,
        }
    }

    /// Merge two producers' output.
    ///
    /// Moves add and are clamped per axis to `[-1, 1]`, looks add, and running
    /// is set if either producer asks for it.
    pub fn combine(self, other: Self) -> Self {
        Self {
            move_dir: (self.move_dir + other.move_dir).clamp(Vec3::NEG_ONE, Vec3::ONE),
            look: self.look + other.look,
            running: self.running || other.running,
        }
    }

    /// Reset to no input.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check if there is any movement input.
    pub fn is_moving(&self) -> bool {
        self.move_dir.length_squared() > 1e-6
    }
}

/// Marker for entities whose [`InputState`] is written by the local devices.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct PlayerControlled;

/// Mouse offset accumulated while the cursor is captured.
///
/// The offset grows with raw mouse motion and is never decayed: the look
/// target stays where the mouse left it.
#[derive(Resource, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Resource)]
pub struct MouseLook {
    /// Accumulated motion in logical pixels.
    pub offset: Vec2,
    /// Whether the cursor is currently captured.
    pub captured: bool,
}

impl MouseLook {
    /// Add a motion delta. Ignored unless captured.
    pub fn accumulate(&mut self, delta: Vec2) {
        if self.captured && delta.is_finite() {
            self.offset += delta;
        }
    }

    /// Look offset normalized by the window size.
    pub fn look(&self, window_size: Vec2) -> Vec2 {
        if window_size.x <= 0.0 || window_size.y <= 0.0 {
            return Vec2::ZERO;
        }
        self.offset / window_size
    }
}

/// Keyboard and mouse producer.
///
/// `W`/`S` move forward/back, `A`/`D` strafe, `Space` jumps, either `Shift` runs.
pub fn keyboard_mouse_input(
    keyboard: &ButtonInput<KeyCode>,
    mouse: &MouseLook,
    window_size: Vec2,
) -> InputState {
    let mut move_dir = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyS) {
        move_dir.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) {
        move_dir.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        move_dir.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        move_dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::Space) {
        move_dir.y += 1.0;
    }

    InputState {
        move_dir,
        look: mouse.look(window_size),
        running: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
    }
}

/// Stick deflection below this is treated as zero.
pub const GAMEPAD_DEADZONE: f32 = 0.15;

fn apply_deadzone(stick: Vec2) -> Vec2 {
    Vec2::new(
        if stick.x.abs() < GAMEPAD_DEADZONE { 0.0 } else { stick.x },
        if stick.y.abs() < GAMEPAD_DEADZONE { 0.0 } else { stick.y },
    )
}

/// Gamepad producer.
///
/// Left stick moves, right stick looks (a stick is already an absolute
/// offset), `South` jumps, `LeftThumb` or the left trigger runs.
pub fn gamepad_input(gamepad: &Gamepad) -> InputState {
    let stick = apply_deadzone(gamepad.left_stick());
    let look = apply_deadzone(gamepad.right_stick());

    let mut move_dir = Vec3::new(stick.x, 0.0, -stick.y);
    if gamepad.pressed(GamepadButton::South) {
        move_dir.y = 1.0;
    }

    InputState {
        move_dir,
        // Stick up means look up; screen space grows downward.
        look: Vec2::new(look.x, -look.y),
        running: gamepad.pressed(GamepadButton::LeftThumb)
            || gamepad.pressed(GamepadButton::LeftTrigger2),
    }
}

/// Set holding [`capture_cursor`].
///
/// Add a run condition to it to keep clicks that land on game UI from
/// capturing the cursor.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorCaptureSet;

/// Plugin wiring the device producers into [`LocomotionSet::Input`].
///
/// Requires Bevy's input and window plugins (part of `DefaultPlugins`).
/// Only entities marked [`PlayerControlled`] receive device input.
pub struct LocomotionInputPlugin;

impl Plugin for LocomotionInputPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerControlled>();
        app.register_type::<MouseLook>();
        app.init_resource::<MouseLook>();

        app.add_systems(
            Update,
            (
                capture_cursor.in_set(CursorCaptureSet),
                accumulate_mouse_look,
                clear_player_input,
                (read_keyboard_mouse, read_gamepads),
            )
                .chain()
                .in_set(LocomotionSet::Input),
        );
    }
}

/// Left click captures the cursor, `Escape` releases it.
pub fn capture_cursor(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_look: ResMut<MouseLook>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    if mouse_buttons.just_pressed(MouseButton::Left) && !mouse_look.captured {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
        mouse_look.captured = true;
        info!("cursor captured");
    } else if keyboard.just_pressed(KeyCode::Escape) && mouse_look.captured {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
        mouse_look.captured = false;
        info!("cursor released");
    }
}

/// Fold this frame's raw mouse motion into [`MouseLook`].
pub fn accumulate_mouse_look(motion: Res<AccumulatedMouseMotion>, mut mouse_look: ResMut<MouseLook>) {
    mouse_look.accumulate(motion.delta);
}

/// Start every frame from no input, so producers only add.
pub fn clear_player_input(mut query: Query<&mut InputState, With<PlayerControlled>>) {
    for mut input in &mut query {
        input.clear();
    }
}

/// Keyboard and mouse producer system.
pub fn read_keyboard_mouse(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_look: Res<MouseLook>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut query: Query<&mut InputState, With<PlayerControlled>>,
) {
    let window_size = windows
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(Vec2::ZERO);
    let produced = keyboard_mouse_input(&keyboard, &mouse_look, window_size);

    for mut input in &mut query {
        *input = input.combine(produced);
    }
}

/// Gamepad producer system. Every connected gamepad contributes.
pub fn read_gamepads(
    gamepads: Query<&Gamepad>,
    mut query: Query<&mut InputState, With<PlayerControlled>>,
) {
    let produced = gamepads
        .iter()
        .map(gamepad_input)
        .fold(InputState::default(), InputState::combine);

    for mut input in &mut query {
        *input = input.combine(produced);
    }
}
