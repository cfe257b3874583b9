//! Configuration panel for LocomotionConfig.
//!
//! Edits the live config. Drag widgets are bounded to values that pass
//! `LocomotionConfig::validate`.

use bevy::prelude::*;
use bevy_egui::egui;
use msg_locomotion::prelude::*;

fn drag_row(ui: &mut egui::Ui, label: &str, value: &mut f32, speed: f64, range: std::ops::RangeInclusive<f32>) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).speed(speed).range(range));
    });
}

/// Renders the speed settings section.
pub fn speed_settings_ui(ui: &mut egui::Ui, config: &mut LocomotionConfig) {
    ui.collapsing("Speed", |ui| {
        drag_row(ui, "Walk:", &mut config.walk, 0.1, 0.1..=50.0);
        drag_row(ui, "Jump:", &mut config.jump, 0.1, 0.1..=50.0);
        drag_row(ui, "Run Multiplier:", &mut config.run_multiplier, 0.05, 1.0..=10.0);
        drag_row(ui, "Ground Probe:", &mut config.ground_probe_length, 0.05, 0.1..=10.0);
    });
}

/// Renders the drag settings section.
pub fn drag_settings_ui(ui: &mut egui::Ui, config: &mut LocomotionConfig) {
    ui.collapsing("Drag", |ui| {
        drag_row(ui, "Horizontal:", &mut config.drag.x, 0.01, 0.0..=1.0);
        config.drag.z = config.drag.x;
        drag_row(ui, "Vertical:", &mut config.drag.y, 0.01, 0.0..=1.0);
    });
}

/// Renders the look and camera settings section.
pub fn camera_settings_ui(ui: &mut egui::Ui, config: &mut LocomotionConfig) {
    ui.collapsing("Look & Camera", |ui| {
        drag_row(ui, "Camera Speed:", &mut config.camera_speed, 0.05, 0.1..=10.0);
        drag_row(ui, "Look Smoothing:", &mut config.look_smoothing, 0.01, 0.01..=1.0);

        let mut max_pitch_deg = config.max_pitch.to_degrees();
        drag_row(ui, "Max Pitch (deg):", &mut max_pitch_deg, 0.5, 1.0..=89.0);
        config.max_pitch = max_pitch_deg.to_radians();

        drag_row(ui, "Offset Y:", &mut config.camera_offset.y, 0.1, -20.0..=50.0);
        drag_row(ui, "Offset Z:", &mut config.camera_offset.z, 0.1, -50.0..=50.0);
        drag_row(ui, "Camera Smoothing:", &mut config.camera_smoothing, 0.01, 0.01..=1.0);
    });
}

/// Renders the complete config panel, with a reset button.
pub fn config_panel_ui(ui: &mut egui::Ui, config: &mut LocomotionConfig, defaults: &LocomotionConfig) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        speed_settings_ui(ui, config);
        drag_settings_ui(ui, config);
        camera_settings_ui(ui, config);

        ui.separator();
        if ui.button("Reset").clicked() {
            *config = *defaults;
            info!("locomotion config reset");
        }
    });
}
