//! Game state machine
//!
//! Three phases gate which subsystems run each tick. Transitions are only
//! made through [`World::request_transition`], which validates the request
//! against the transition table before any entry handler runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::{EntityId, Facing};
use super::collision::jump;
use super::platforms::PlatformRegistry;
use super::world::World;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, player resting on the title platform
    #[default]
    Title,
    /// Active run
    InGame,
    /// Run ended, simulation frozen
    GameOver,
}

impl GamePhase {
    pub const ALL: [GamePhase; 3] = [GamePhase::Title, GamePhase::InGame, GamePhase::GameOver];

    /// Whether `next` is a legal successor of this phase
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        matches!(
            (self, next),
            (GamePhase::Title, GamePhase::InGame)
                | (GamePhase::InGame, GamePhase::GameOver)
                | (GamePhase::InGame, GamePhase::Title)
                | (GamePhase::GameOver, GamePhase::Title)
        )
    }

    /// Subsystem flags active in this phase
    pub fn flags(self) -> StateFlags {
        match self {
            GamePhase::InGame => StateFlags::all_enabled(),
            GamePhase::Title | GamePhase::GameOver => StateFlags::frozen(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Title => "Title",
            GamePhase::InGame => "InGame",
            GamePhase::GameOver => "GameOver",
        }
    }
}

/// Which subsystems run while a phase is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFlags {
    pub autogenerate_platforms: bool,
    pub camera_tracks_player: bool,
    pub player_responds_to_tilt: bool,
    pub player_physics_enabled: bool,
}

impl StateFlags {
    pub const fn all_enabled() -> Self {
        Self {
            autogenerate_platforms: true,
            camera_tracks_player: true,
            player_responds_to_tilt: true,
            player_physics_enabled: true,
        }
    }

    pub const fn frozen() -> Self {
        Self {
            autogenerate_platforms: false,
            camera_tracks_player: false,
            player_responds_to_tilt: false,
            player_physics_enabled: false,
        }
    }
}

/// A rejected transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: GamePhase,
    pub to: GamePhase,
}

/// Phase plus the flags its entry handler configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateMachine {
    phase: GamePhase,
    flags: StateFlags,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStateMachine {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Title,
            flags: GamePhase::Title.flags(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    /// Validate a request without changing anything
    pub fn check(&self, to: GamePhase) -> Result<(), TransitionError> {
        if self.phase.can_transition_to(to) {
            Ok(())
        } else {
            Err(TransitionError {
                from: self.phase,
                to,
            })
        }
    }

    /// Commit a validated transition, returning the previous phase
    fn commit(&mut self, to: GamePhase) -> GamePhase {
        let from = self.phase;
        self.phase = to;
        self.flags = to.flags();
        from
    }
}

/// Discrete notifications produced by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player touched a platform
    Land { platform: EntityId },
    /// Jump impulse applied
    Jump,
    /// Player dropped out of view below the camera
    PlayerFell { altitude: f32 },
    /// New band of platforms generated
    PlatformsSpawned { count: usize, frontier: f32 },
    /// Platforms dropped below the retention window
    PlatformsCulled { count: usize },
    /// Phase transition committed
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Validate, commit, then run exit and entry handlers
pub(crate) fn transition(world: &mut World, to: GamePhase) -> Result<GamePhase, TransitionError> {
    if let Err(err) = world.machine.check(to) {
        log::warn!("Rejected {}", err);
        return Err(err);
    }

    let from = world.machine.commit(to);
    on_exit(world, from);
    on_enter(world, to, from);
    world.events.push(GameEvent::PhaseChanged { from, to });
    log::info!("Phase {} -> {}", from.as_str(), to.as_str());
    Ok(from)
}

fn on_exit(world: &mut World, from: GamePhase) {
    if from == GamePhase::InGame {
        log::info!(
            "Run ended at tick {} with max altitude {:.0}",
            world.time_ticks,
            world.max_altitude
        );
    }
}

/// Entry handler table, keyed by the phase being entered
pub(crate) fn on_enter(world: &mut World, to: GamePhase, from: GamePhase) {
    match to {
        GamePhase::Title => enter_title(world),
        GamePhase::InGame => enter_in_game(world, from),
        GamePhase::GameOver => enter_game_over(world),
    }
}

/// Rebuild the run around a fresh title platform and park the player on it
fn enter_title(world: &mut World) {
    let title = world.tuning.title_platform;
    world.platforms = PlatformRegistry::new(title.y);
    world.spawn_platform(title);

    let platform_top = title.y + world.tuning.platform_half_extents.y;
    let start = Vec2::new(title.x, platform_top + world.tuning.player_half_extents.y);
    world.player.facing = Facing::default();
    if let Some(body) = world.player.body.as_mut() {
        body.position = start;
        body.velocity = Vec2::ZERO;
        body.is_dynamic = false;
    }

    world
        .camera
        .pin(Vec2::new(title.x, title.y + world.tuning.title_camera_offset));
    world.max_altitude = start.y;
    world.reset_contacts();
}

fn enter_in_game(world: &mut World, from: GamePhase) {
    world.reset_contacts();
    let launch = from == GamePhase::Title && world.tuning.launch_on_start;
    let impulse = world.tuning.jump_impulse;
    let Some(body) = world.player.body.as_mut() else {
        return;
    };
    body.is_dynamic = true;
    if launch {
        jump(body, impulse);
        world.events.push(GameEvent::Jump);
    }
}

fn enter_game_over(world: &mut World) {
    if let Some(body) = world.player.body.as_mut() {
        body.is_dynamic = false;
    }
}
