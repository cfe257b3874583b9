//! Diagnostics panel for locomotion state.
//!
//! Provides a read-only egui panel displaying the current state of
//! a locomotion controller for debugging and visualization.

use bevy::prelude::*;
use bevy_egui::egui;
use bevy_rapier3d::prelude::Velocity;
use msg_locomotion::prelude::*;

const ON: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);
const OFF: egui::Color32 = egui::Color32::from_rgb(200, 100, 100);
const IDLE: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);

/// Data needed for the diagnostics panel.
pub struct DiagnosticsData<'a> {
    pub controller: &'a LocomotionController,
    pub transform: &'a Transform,
    pub velocity: &'a Velocity,
    pub input: &'a InputState,
    pub captured: bool,
}

fn vec3_label(v: Vec3) -> String {
    format!("({:.1}, {:.1}, {:.1})", v.x, v.y, v.z)
}

/// Renders the position and velocity section.
pub fn position_velocity_ui(ui: &mut egui::Ui, transform: &Transform, velocity: &Velocity) {
    ui.collapsing("Position & Velocity", |ui| {
        ui.horizontal(|ui| {
            ui.label("Position:");
            ui.label(vec3_label(transform.translation));
        });
        ui.horizontal(|ui| {
            ui.label("Velocity:");
            ui.label(vec3_label(velocity.linvel));
        });
        ui.horizontal(|ui| {
            ui.label("Horizontal Speed:");
            ui.label(format!("{:.1}", velocity.linvel.xz().length()));
        });
    });
}

/// Renders the ground probe section.
pub fn ground_ui(ui: &mut egui::Ui, controller: &LocomotionController) {
    let grounded = controller.is_grounded();
    ui.collapsing("Ground", |ui| {
        ui.horizontal(|ui| {
            ui.label("State:");
            ui.colored_label(
                if grounded { ON } else { OFF },
                if grounded { "GROUNDED" } else { "AIRBORNE" },
            );
        });

        if let Some(ref contact) = controller.ground {
            ui.horizontal(|ui| {
                ui.label("Distance:");
                ui.label(format!("{:.2}", contact.distance));
            });
            ui.horizontal(|ui| {
                ui.label("Normal:");
                match contact.world_normal() {
                    Some(normal) => ui.label(vec3_label(normal)),
                    None => ui.label("none (flat)"),
                };
            });
            ui.horizontal(|ui| {
                ui.label("Contact Point:");
                ui.label(vec3_label(contact.point));
            });
        }

        ui.horizontal(|ui| {
            ui.label("Last Offset:");
            ui.label(vec3_label(controller.last_offset()));
        });
    });
}

/// Renders the look section.
pub fn look_ui(ui: &mut egui::Ui, controller: &LocomotionController, captured: bool) {
    ui.collapsing("Look", |ui| {
        let orientation = controller.orientation();
        ui.horizontal(|ui| {
            ui.label("Yaw (phi):");
            ui.label(format!("{:.1} deg", orientation.phi.to_degrees()));
        });
        ui.horizontal(|ui| {
            ui.label("Pitch (theta):");
            ui.label(format!("{:.1} deg", orientation.theta.to_degrees()));
        });
        ui.horizontal(|ui| {
            ui.label("Mouse:");
            ui.colored_label(
                if captured { ON } else { IDLE },
                if captured { "captured (Esc to release)" } else { "free (click to capture)" },
            );
        });
    });
}

/// Renders the input section.
pub fn input_ui(ui: &mut egui::Ui, input: &InputState) {
    ui.collapsing("Input", |ui| {
        ui.horizontal(|ui| {
            ui.label("Move:");
            ui.label(vec3_label(input.move_dir));
        });
        ui.horizontal(|ui| {
            ui.label("Look:");
            ui.label(format!("({:.2}, {:.2})", input.look.x, input.look.y));
        });
        ui.horizontal(|ui| {
            ui.label("Running:");
            ui.colored_label(
                if input.running { ON } else { IDLE },
                if input.running { "Yes" } else { "No" },
            );
        });
    });
}

/// Renders the complete diagnostics panel with all sections.
pub fn diagnostics_panel_ui(ui: &mut egui::Ui, data: &DiagnosticsData) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        position_velocity_ui(ui, data.transform, data.velocity);
        ground_ui(ui, data.controller);
        look_ui(ui, data.controller, data.captured);
        input_ui(ui, data.input);
    });
}
