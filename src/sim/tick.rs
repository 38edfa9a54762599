//! Per-frame simulation step
//!
//! Fixed order: input, physics, collision, camera, streaming. The state
//! machine's flags decide which stages run.

use glam::Vec2;

use super::body::Facing;
use super::collision::{detect_contacts, resolve_contact, update_phase_through};
use super::input::InputSampler;
use super::platforms::{cull_platforms, stream_platforms};
use super::state::GameEvent;
use super::world::World;

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &impl InputSampler, dt: f32) {
    let flags = world.flags();
    world.time_ticks += 1;

    if flags.player_responds_to_tilt {
        apply_tilt(world, input);
    }

    if flags.player_physics_enabled {
        step_physics(world, dt);
        step_collisions(world);
    }

    if flags.camera_tracks_player && world.viewport().is_some() {
        if let Some(pos) = world.player.position() {
            world.camera.follow(pos.y);
        }
    }

    if let Some(pos) = world.player.position() {
        world.max_altitude = world.max_altitude.max(pos.y);
    }

    if flags.camera_tracks_player {
        check_fall(world);
    }

    if flags.autogenerate_platforms {
        stream_platforms(world);
        cull_platforms(world);
    }
}

/// Overwrite horizontal velocity from the latest tilt and update facing
fn apply_tilt(world: &mut World, input: &impl InputSampler) {
    let Some(tilt) = input.latest_tilt() else {
        return;
    };
    let sensitivity = world.tuning.x_tilt_sensitivity;
    let Some(body) = world.player.body.as_mut() else {
        return;
    };
    body.velocity.x = tilt.x * sensitivity;
    if let Some(facing) = Facing::from_velocity(body.velocity.x) {
        world.player.facing = facing;
    }
}

/// Gravity, integration and the phase-through rule
fn step_physics(world: &mut World, dt: f32) {
    let gravity = Vec2::new(0.0, world.tuning.gravity_accel());
    let threshold = world.tuning.fall_threshold;
    let Some(body) = world.player.body.as_mut() else {
        return;
    };
    body.integrate(gravity, dt);
    update_phase_through(body, threshold);
}

fn step_collisions(world: &mut World) {
    let contacts = detect_contacts(&world.player, world.platforms.platforms(), &mut world.touching);
    for contact in &contacts {
        resolve_contact(world, contact);
    }
}

/// Report once per run when the player drops out of view
fn check_fall(world: &mut World) {
    if world.fell {
        return;
    }
    let Some(viewport) = world.viewport() else {
        return;
    };
    let Some(pos) = world.player.position() else {
        return;
    };
    let limit = world.camera.position.y - viewport.height * (0.5 + world.tuning.fall_out_margin);
    if pos.y < limit {
        world.fell = true;
        log::info!("Player fell at altitude {:.0}", world.max_altitude);
        world.events.push(GameEvent::PlayerFell {
            altitude: world.max_altitude,
        });
    }
}
