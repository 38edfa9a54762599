//! The simulation world
//!
//! Owns every entity, the platform registry, the camera and the state
//! machine. Constructed once and passed explicitly to every subsystem.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Entity, EntityId, EntityKind, Facing};
use super::camera::CameraState;
use super::platforms::PlatformRegistry;
use super::state::{self, GameEvent, GamePhase, GameStateMachine, StateFlags, TransitionError};
use crate::tuning::Tuning;

/// Visible area supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A surface with no area is not ready to drive the simulation
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub player: Entity,
    pub platforms: PlatformRegistry,
    pub camera: CameraState,
    pub(crate) machine: GameStateMachine,
    viewport: Option<Viewport>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Highest player Y reached this run
    pub max_altitude: f32,
    pub(crate) events: Vec<GameEvent>,
    /// Platforms the player overlapped last step
    pub(crate) touching: Vec<EntityId>,
    /// `PlayerFell` already reported this run
    pub(crate) fell: bool,
    next_id: EntityId,
}

impl World {
    /// Create a world in the Title phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player_body = Body::player(Vec2::ZERO, tuning.player_half_extents, tuning.player_mass);
        let mut world = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            platforms: PlatformRegistry::new(tuning.title_platform.y),
            tuning,
            player: Entity::new(1, EntityKind::Player, Some(player_body)),
            camera: CameraState::default(),
            machine: GameStateMachine::new(),
            viewport: None,
            time_ticks: 0,
            max_altitude: 0.0,
            events: Vec::new(),
            touching: Vec::new(),
            fell: false,
            next_id: 2,
        };
        state::on_enter(&mut world, GamePhase::Title, GamePhase::Title);
        log::info!("World created with seed {}", seed);
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a static platform centered at `position`
    pub fn spawn_platform(&mut self, position: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let body = Body::platform(position, self.tuning.platform_half_extents);
        self.platforms
            .push(Entity::new(id, EntityKind::Platform, Some(body)));
        id
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn flags(&self) -> StateFlags {
        self.machine.flags()
    }

    /// Request a phase change
    ///
    /// Returns the phase that was left on success. An invalid request leaves
    /// the world untouched.
    pub fn request_transition(&mut self, to: GamePhase) -> Result<GamePhase, TransitionError> {
        state::transition(self, to)
    }

    /// Current viewport, if the host has provided a usable one
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport.filter(Viewport::is_ready)
    }

    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn reset_contacts(&mut self) {
        self.touching.clear();
        self.fell = false;
    }

    /// Transforms for presentation
    pub fn snapshot(&self) -> FrameSnapshot {
        let transform = |e: &Entity| {
            e.position().map(|position| Transform {
                id: e.id,
                position,
                facing: e.facing,
            })
        };
        FrameSnapshot {
            tick: self.time_ticks,
            phase: self.phase(),
            camera: self.camera.position,
            player: transform(&self.player),
            platforms: self.platforms.platforms().iter().filter_map(transform).collect(),
            max_altitude: self.max_altitude,
        }
    }
}

/// Position and mirror state of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub id: EntityId,
    pub position: Vec2,
    pub facing: Facing,
}

/// Everything a presenter needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub camera: Vec2,
    pub player: Option<Transform>,
    pub platforms: Vec<Transform>,
    pub max_altitude: f32,
}
