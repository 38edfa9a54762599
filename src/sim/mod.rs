//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (platforms by creation)
//! - No rendering, audio or sensor dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod input;
pub mod platforms;
pub mod state;
pub mod tick;
pub mod world;

pub use body::{Body, BodyCategory, Entity, EntityId, EntityKind, Facing};
pub use camera::CameraState;
pub use collision::{Contact, detect_contacts, jump, resolve_contact, should_jump, update_phase_through};
pub use input::{InputSampler, SharedTilt};
pub use platforms::{PlatformRegistry, cull_platforms, generate_platforms, stream_platforms};
pub use state::{GameEvent, GamePhase, GameStateMachine, StateFlags, TransitionError};
pub use tick::tick;
pub use world::{FrameSnapshot, Transform, Viewport, World};
