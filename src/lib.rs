//! Tilt Bounce - an endless vertical platformer driven by device tilt
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, streaming, game state)
//! - `tuning`: Data-driven game balance
//! - `presentation`: Seam to the renderer and sound player

pub mod presentation;
pub mod sim;
pub mod tuning;

pub use tuning::{Retention, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Rate the motion sensor delivers samples at
    pub const TILT_SAMPLE_HZ: f32 = 50.0;
}
