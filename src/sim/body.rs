//! Rigid-body and entity types

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable entity identifier
pub type EntityId = u32;

/// Collision category carried by every body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyCategory {
    Player,
    Platform,
}

/// Minimal 2D rigid body with an axis-aligned box shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Affected by gravity and integration
    pub is_dynamic: bool,
    /// Participates in contact detection
    pub collision_enabled: bool,
    pub category: BodyCategory,
    pub half_extents: Vec2,
    pub mass: f32,
}

impl Body {
    /// Dynamic player body
    pub fn player(position: Vec2, half_extents: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            is_dynamic: true,
            collision_enabled: true,
            category: BodyCategory::Player,
            half_extents,
            mass,
        }
    }

    /// Static platform body
    pub fn platform(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            is_dynamic: false,
            collision_enabled: true,
            category: BodyCategory::Platform,
            half_extents,
            mass: 0.0,
        }
    }

    /// Apply an instantaneous impulse
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }

    /// Advance position by velocity, applying constant acceleration first
    pub fn integrate(&mut self, accel: Vec2, dt: f32) {
        if !self.is_dynamic {
            return;
        }
        self.velocity += accel * dt;
        self.position += self.velocity * dt;
    }

    /// Axis-aligned box overlap test
    pub fn overlaps(&self, other: &Body) -> bool {
        let delta = (self.position - other.position).abs();
        let reach = self.half_extents + other.half_extents;
        delta.x < reach.x && delta.y < reach.y
    }

    /// Top edge of the box
    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y + self.half_extents.y
    }
}

/// What an entity represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Platform,
    /// Visual-only (background, title art)
    Decoration,
}

/// Horizontal mirror state for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing implied by a horizontal velocity, `None` when standing still
    pub fn from_velocity(vx: f32) -> Option<Self> {
        if vx > 0.0 {
            Some(Facing::Right)
        } else if vx < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// A simulated entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Decorations have no body; any entity may lose its body
    pub body: Option<Body>,
    pub facing: Facing,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, body: Option<Body>) -> Self {
        Self {
            id,
            kind,
            body,
            facing: Facing::default(),
        }
    }

    /// Position of the body, if it has one
    pub fn position(&self) -> Option<Vec2> {
        self.body.as_ref().map(|b| b.position)
    }
}
