//! Helper modules for the demo scene.
//!
//! This module provides the ground generator and reusable egui panels.

mod config_panel;
mod diagnostics_panel;
mod plugin;
mod terrain;

pub use config_panel::*;
pub use diagnostics_panel::*;
pub use plugin::*;
pub use terrain::*;
