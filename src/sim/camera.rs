//! Camera follow policy

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Camera position in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec2,
}

impl CameraState {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Rise to `target_y` if it is above the camera; never descend
    pub fn follow(&mut self, target_y: f32) {
        // f32::max ignores a NaN target
        self.position.y = self.position.y.max(target_y);
    }

    /// Hold the camera at a fixed position
    pub fn pin(&mut self, position: Vec2) {
        self.position = position;
    }
}
