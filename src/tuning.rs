//! Data-driven gameplay tuning
//!
//! Every magic number the simulation depends on lives here so hosts can
//! override them from a JSON file without recompiling.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How far below the camera platforms are kept before being culled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Retention {
    /// Never cull (unbounded growth)
    Unbounded,
    /// Cull platforms more than this many viewport heights below the camera
    ViewportHeights(f32),
}

impl Default for Retention {
    fn default() -> Self {
        Retention::ViewportHeights(1.0)
    }
}

impl Retention {
    /// Distance below the camera beyond which platforms are dropped
    pub fn window(&self, viewport_height: f32) -> Option<f32> {
        match self {
            Retention::Unbounded => None,
            Retention::ViewportHeights(n) => Some(n * viewport_height),
        }
    }
}

/// Errors raised while loading or validating tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Input ===
    /// Horizontal velocity per unit of tilt
    pub x_tilt_sensitivity: f32,

    // === Physics ===
    /// Gravity in m/s² (negative is down)
    pub gravity: f32,
    /// World units per meter, scales gravity into world space
    pub pixels_per_meter: f32,
    /// Player mass, converts impulses into velocity changes
    pub player_mass: f32,
    /// Upward impulse applied on a jump
    pub jump_impulse: f32,
    /// Platform collisions stay disabled while vertical velocity is above this
    pub fall_threshold: f32,

    // === Geometry ===
    pub player_half_extents: Vec2,
    pub platform_half_extents: Vec2,

    // === Streaming ===
    /// Vertical distance between consecutive platforms
    pub platform_spacing: f32,
    pub retention: Retention,

    // === Title screen ===
    /// World position of the title platform
    pub title_platform: Vec2,
    /// Camera height above the title platform while on the title screen
    pub title_camera_offset: f32,

    // === Run ===
    /// Jump off the title platform when a run starts
    pub launch_on_start: bool,
    /// Viewport heights below the camera before the player counts as fallen
    pub fall_out_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            x_tilt_sensitivity: 500.0,

            gravity: -9.81,
            pixels_per_meter: 150.0,
            player_mass: 0.1,
            jump_impulse: 100.0,
            fall_threshold: -400.0,

            player_half_extents: Vec2::new(24.0, 24.0),
            platform_half_extents: Vec2::new(40.0, 8.0),

            platform_spacing: 65.0,
            retention: Retention::default(),

            title_platform: Vec2::new(0.0, 0.0),
            title_camera_offset: 200.0,

            launch_on_start: true,
            fall_out_margin: 0.5,
        }
    }
}

impl Tuning {
    /// Gravity acceleration in world units per second²
    pub fn gravity_accel(&self) -> f32 {
        self.gravity * self.pixels_per_meter
    }

    /// Velocity change produced by one jump impulse
    pub fn jump_velocity(&self) -> f32 {
        self.jump_impulse / self.player_mass
    }

    /// Parse tuning from JSON (missing fields fall back to defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.platform_spacing > 0.0) {
            return Err(TuningError::Invalid {
                field: "platform_spacing",
                reason: "must be positive",
            });
        }
        if !(self.player_mass > 0.0) {
            return Err(TuningError::Invalid {
                field: "player_mass",
                reason: "must be positive",
            });
        }
        if !(self.pixels_per_meter > 0.0) {
            return Err(TuningError::Invalid {
                field: "pixels_per_meter",
                reason: "must be positive",
            });
        }
        if let Retention::ViewportHeights(n) = self.retention {
            if !(n >= 0.0) {
                return Err(TuningError::Invalid {
                    field: "retention",
                    reason: "viewport heights must be non-negative",
                });
            }
        }
        if self.player_half_extents.min_element() <= 0.0
            || self.platform_half_extents.min_element() <= 0.0
        {
            return Err(TuningError::Invalid {
                field: "half_extents",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "platform_spacing": 80.0 }"#).unwrap();
        assert_eq!(tuning.platform_spacing, 80.0);
        assert_eq!(tuning.x_tilt_sensitivity, 500.0);
        assert_eq!(tuning.retention, Retention::ViewportHeights(1.0));
    }

    #[test]
    fn test_unbounded_retention_from_json() {
        let tuning = Tuning::from_json(r#"{ "retention": "Unbounded" }"#).unwrap();
        assert_eq!(tuning.retention, Retention::Unbounded);
        assert_eq!(tuning.retention.window(800.0), None);
    }

    #[test]
    fn test_rejects_zero_spacing() {
        let err = Tuning::from_json(r#"{ "platform_spacing": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "platform_spacing",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_jump_velocity_uses_mass() {
        let tuning = Tuning {
            jump_impulse: 100.0,
            player_mass: 0.5,
            ..Default::default()
        };
        assert_eq!(tuning.jump_velocity(), 200.0);
    }
}
