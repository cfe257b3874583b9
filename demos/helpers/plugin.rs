//! Plugin for locomotion debug UI panels.
//!
//! Provides a Bevy plugin that adds configuration and diagnostics panels for
//! the controlled player using egui.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use bevy_rapier3d::prelude::Velocity;
use msg_locomotion::prelude::*;
use std::marker::PhantomData;

use super::{config_panel_ui, diagnostics_panel_ui, DiagnosticsData};

/// Resource containing the UI panel state.
#[derive(Resource)]
pub struct LocomotionUiState {
    /// Number of frames since startup (used to skip initial frames).
    pub frame_count: u32,
    /// Whether the panels are currently visible.
    pub show_panels: bool,
    /// Key to toggle panel visibility.
    pub toggle_key: KeyCode,
    /// Whether egui had the pointer last pass.
    pub pointer_over_ui: bool,
}

/// Config the "Reset" button restores. Overwrite it to change what reset means.
#[derive(Resource, Clone, Copy)]
pub struct LocomotionUiDefaults(pub LocomotionConfig);

impl Default for LocomotionUiDefaults {
    fn default() -> Self {
        Self(LocomotionConfig::player())
    }
}

/// Plugin that adds locomotion configuration and diagnostics UI panels.
///
/// The marker component `M` selects the entity shown, typically `Player`.
pub struct LocomotionUiPlugin<M: Component> {
    toggle_key: KeyCode,
    _marker: PhantomData<M>,
}

impl<M: Component> Default for LocomotionUiPlugin<M> {
    fn default() -> Self {
        Self {
            toggle_key: KeyCode::Tab,
            _marker: PhantomData,
        }
    }
}

impl<M: Component> Plugin for LocomotionUiPlugin<M> {
    fn build(&self, app: &mut App) {
        app.insert_resource(LocomotionUiState {
            frame_count: 0,
            show_panels: true,
            toggle_key: self.toggle_key,
            pointer_over_ui: false,
        });
        app.init_resource::<LocomotionUiDefaults>();

        app.add_systems(
            EguiPrimaryContextPass,
            (locomotion_config_ui_system::<M>, locomotion_diagnostics_ui_system::<M>).chain(),
        );

        // A click on a panel must not lock the cursor.
        app.configure_sets(Update, CursorCaptureSet.run_if(cursor_capture_allowed));
    }
}

/// Run condition for [`CursorCaptureSet`].
///
/// Releasing always goes through; capturing waits until the pointer is off
/// the panels.
pub fn cursor_capture_allowed(ui_state: Res<LocomotionUiState>, mouse_look: Res<MouseLook>) -> bool {
    mouse_look.captured || !ui_state.pointer_over_ui
}

/// System that renders the config panel and help text.
fn locomotion_config_ui_system<M: Component>(
    mut contexts: EguiContexts,
    mut config_query: Query<&mut LocomotionConfig, With<M>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    defaults: Res<LocomotionUiDefaults>,
    mut ui_state: ResMut<LocomotionUiState>,
) {
    ui_state.frame_count += 1;

    // Skip the first few frames to ensure egui is fully initialized
    if ui_state.frame_count <= 2 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    ui_state.pointer_over_ui = ctx.wants_pointer_input() || ctx.is_pointer_over_area();

    if keyboard.just_pressed(ui_state.toggle_key) {
        ui_state.show_panels = !ui_state.show_panels;
    }

    egui::Area::new(egui::Id::new("locomotion_help_area"))
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            ui.colored_label(
                egui::Color32::from_rgb(200, 200, 200),
                format!(
                    "WASD move, Space jump, Shift run, click to capture mouse, Esc to release, {:?} toggles panels",
                    ui_state.toggle_key
                ),
            );
        });

    if !ui_state.show_panels {
        return;
    }

    if let Ok(mut config) = config_query.single_mut() {
        egui::Window::new("Locomotion Settings")
            .default_pos([10.0, 40.0])
            .default_width(280.0)
            .collapsible(true)
            .resizable(true)
            .show(ctx, |ui| {
                // Only mark the component changed when a value actually moved.
                let mut edited = *config;
                config_panel_ui(ui, &mut edited, &defaults.0);
                if edited != *config {
                    *config = edited;
                }
            });
    }
}

/// System that renders the diagnostics panel.
fn locomotion_diagnostics_ui_system<M: Component>(
    mut contexts: EguiContexts,
    diagnostics_query: Query<
        (&LocomotionController, &Transform, &Velocity, &InputState),
        With<M>,
    >,
    mouse_look: Res<MouseLook>,
    ui_state: Res<LocomotionUiState>,
) {
    if ui_state.frame_count <= 2 || !ui_state.show_panels {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if let Ok((controller, transform, velocity, input)) = diagnostics_query.single() {
        egui::Window::new("Diagnostics")
            .default_pos([300.0, 40.0])
            .default_width(280.0)
            .collapsible(true)
            .resizable(true)
            .show(ctx, |ui| {
                let data = DiagnosticsData {
                    controller,
                    transform,
                    velocity,
                    input,
                    captured: mouse_look.captured,
                };
                diagnostics_panel_ui(ui, &data);
            });
    }
}
