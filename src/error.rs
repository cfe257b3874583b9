//! Error types.
//!
//! The per-frame path has no error states; only configuration can fail.

use std::path::PathBuf;

/// Errors produced while building or loading a [`LocomotionConfig`](crate::config::LocomotionConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Walk speed must be a positive, finite number.
    #[error("walk speed must be positive and finite, got {0}")]
    NonPositiveWalk(f32),

    /// Jump speed must be a positive, finite number.
    #[error("jump speed must be positive and finite, got {0}")]
    NonPositiveJump(f32),

    /// A smoothing factor was outside `(0, 1]`.
    #[error("{name} must be in (0, 1], got {value}")]
    InvalidSmoothing { name: &'static str, value: f32 },

    /// The pitch limit must lie in `(0, π/2)`.
    #[error("max pitch must be in (0, pi/2), got {0}")]
    InvalidPitchLimit(f32),

    /// The config file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for a locomotion config.
    #[error("failed to parse locomotion config: {0}")]
    Parse(#[from] toml::de::Error),
}
