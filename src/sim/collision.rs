//! Contact detection and jump response
//!
//! Only contacts involving the player matter. A player–platform contact
//! launches the player when it happens while falling or at rest.

use glam::Vec2;

use super::body::{Body, BodyCategory, Entity, EntityId};
use super::state::GameEvent;
use super::world::World;

/// Two bodies began overlapping this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: EntityId,
    pub a_category: BodyCategory,
    pub b: EntityId,
    pub b_category: BodyCategory,
}

impl Contact {
    /// The non-player side of a contact that involves the player
    ///
    /// Returns `None` when neither body is the player.
    pub fn other_than_player(&self) -> Option<(EntityId, BodyCategory)> {
        match (self.a_category, self.b_category) {
            (BodyCategory::Player, _) => Some((self.b, self.b_category)),
            (_, BodyCategory::Player) => Some((self.a, self.a_category)),
            _ => None,
        }
    }
}

/// Contacts fire while falling or at rest, never while ascending
#[inline]
pub fn should_jump(vertical_velocity: f32) -> bool {
    vertical_velocity <= 0.0
}

/// Zero the velocity, then apply an upward impulse
pub fn jump(body: &mut Body, impulse: f32) {
    body.velocity = Vec2::ZERO;
    body.apply_impulse(Vec2::new(0.0, impulse));
}

/// Disable platform collisions unless the body is falling past the threshold
pub fn update_phase_through(body: &mut Body, fall_threshold: f32) {
    body.collision_enabled = body.velocity.y <= fall_threshold;
}

/// Find platforms the player started overlapping this step
///
/// `touching` carries the platforms overlapped last step and is updated in
/// place, so a platform only produces a contact when the overlap begins.
pub fn detect_contacts(
    player: &Entity,
    platforms: &[Entity],
    touching: &mut Vec<EntityId>,
) -> Vec<Contact> {
    let Some(player_body) = player.body.as_ref().filter(|b| b.collision_enabled) else {
        touching.clear();
        return Vec::new();
    };

    let mut now_touching = Vec::new();
    let mut contacts = Vec::new();
    for platform in platforms {
        let Some(body) = platform.body.as_ref() else {
            continue;
        };
        if !body.collision_enabled || !player_body.overlaps(body) {
            continue;
        }
        now_touching.push(platform.id);
        if !touching.contains(&platform.id) {
            contacts.push(Contact {
                a: player.id,
                a_category: player_body.category,
                b: platform.id,
                b_category: body.category,
            });
        }
    }
    *touching = now_touching;
    contacts
}

/// Apply the response to a contact, returning whether a jump fired
pub fn resolve_contact(world: &mut World, contact: &Contact) -> bool {
    let Some((other, category)) = contact.other_than_player() else {
        return false;
    };
    if category != BodyCategory::Platform {
        return false;
    }
    if world.platforms.get(other).and_then(|p| p.body.as_ref()).is_none() {
        return false;
    }

    let impulse = world.tuning.jump_impulse;
    let Some(body) = world.player.body.as_mut() else {
        return false;
    };
    world.events.push(GameEvent::Land { platform: other });
    if !should_jump(body.velocity.y) {
        return false;
    }
    jump(body, impulse);
    world.events.push(GameEvent::Jump);
    true
}
