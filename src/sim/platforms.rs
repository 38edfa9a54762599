//! Procedural platform streaming
//!
//! Platforms are generated one viewport-height band at a time ahead of the
//! player and dropped once they fall out of the retention window below the
//! camera. Density is the same at every altitude.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Entity, EntityId};
use super::state::GameEvent;
use super::world::World;

/// Live platforms plus the altitude generated so far
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRegistry {
    /// Ordered by creation (and therefore by altitude)
    platforms: Vec<Entity>,
    /// World Y up to which platforms have been generated, never decreases
    spawn_frontier: f32,
}

impl PlatformRegistry {
    pub fn new(spawn_frontier: f32) -> Self {
        Self {
            platforms: Vec::new(),
            spawn_frontier,
        }
    }

    pub fn spawn_frontier(&self) -> f32 {
        self.spawn_frontier
    }

    pub fn platforms(&self) -> &[Entity] {
        &self.platforms
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.platforms.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn push(&mut self, platform: Entity) {
        self.platforms.push(platform);
    }

    /// Move the frontier up to `to`; lower values are ignored
    pub fn advance_frontier(&mut self, to: f32) {
        if to > self.spawn_frontier {
            self.spawn_frontier = to;
        }
    }

    /// Drop platforms whose Y is below `cutoff`, returning how many went
    pub fn cull_below(&mut self, cutoff: f32) -> usize {
        let before = self.platforms.len();
        self.platforms
            .retain(|p| p.position().is_none_or(|pos| pos.y >= cutoff));
        before - self.platforms.len()
    }
}

/// Range of platform center X that keeps a platform inside the view
pub fn horizontal_bounds(center_x: f32, viewport_width: f32, platform_half_width: f32) -> (f32, f32) {
    let half = (viewport_width / 2.0 - platform_half_width).max(0.0);
    (center_x - half, center_x + half)
}

/// Create one platform at each `y_min + k * spacing` strictly below `y_max`
///
/// X is uniform across the current view. Returns the number created; nothing
/// is created without a viewport.
pub fn generate_platforms(world: &mut World, y_min: f32, y_max: f32) -> usize {
    let Some(viewport) = world.viewport() else {
        return 0;
    };
    let spacing = world.tuning.platform_spacing;
    if !(spacing > 0.0) || !(y_min < y_max) {
        return 0;
    }

    let (x_min, x_max) = horizontal_bounds(
        world.camera.position.x,
        viewport.width,
        world.tuning.platform_half_extents.x,
    );

    let mut count = 0;
    let mut step = 1u32;
    loop {
        let y = y_min + step as f32 * spacing;
        if y >= y_max {
            break;
        }
        let x = if x_min < x_max {
            world.rng.random_range(x_min..x_max)
        } else {
            x_min
        };
        world.spawn_platform(glam::Vec2::new(x, y));
        count += 1;
        step += 1;
    }
    count
}

/// Generate the next band once the player comes within a viewport of the frontier
pub fn stream_platforms(world: &mut World) -> usize {
    let Some(viewport) = world.viewport() else {
        return 0;
    };
    let Some(player_y) = world.player.position().map(|p| p.y) else {
        return 0;
    };

    let frontier = world.platforms.spawn_frontier();
    if player_y + viewport.height < frontier {
        return 0;
    }

    let next = frontier + viewport.height;
    let count = generate_platforms(world, frontier, next);
    world.platforms.advance_frontier(next);
    log::debug!(
        "Spawned {} platforms in band ({:.0}, {:.0}), {} live",
        count,
        frontier,
        next,
        world.platforms.len()
    );
    world.events.push(GameEvent::PlatformsSpawned {
        count,
        frontier: next,
    });
    count
}

/// Drop platforms more than the retention window below the camera
pub fn cull_platforms(world: &mut World) -> usize {
    let Some(viewport) = world.viewport() else {
        return 0;
    };
    let Some(window) = world.tuning.retention.window(viewport.height) else {
        return 0;
    };

    let culled = world.platforms.cull_below(world.camera.position.y - window);
    if culled > 0 {
        log::debug!("Culled {} platforms, {} live", culled, world.platforms.len());
        world.events.push(GameEvent::PlatformsCulled { count: culled });
    }
    culled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use crate::sim::world::Viewport;
    use crate::tuning::{Retention, Tuning};
    use proptest::prelude::*;

    fn world_with(tuning: Tuning, height: f32) -> World {
        let mut world = World::new(42, tuning);
        world.set_viewport(Some(Viewport::new(400.0, height)));
        world
    }

    /// Platforms created after the title platform
    fn generated(world: &World) -> Vec<f32> {
        world.platforms.platforms()[1..]
            .iter()
            .filter_map(|p| p.position())
            .map(|p| p.y)
            .collect()
    }

    #[test]
    fn test_generate_band_from_title() {
        let mut world = world_with(Tuning::default(), 800.0);
        assert_eq!(world.request_transition(GamePhase::InGame), Ok(GamePhase::Title));
        assert!(world.flags().autogenerate_platforms);

        let count = generate_platforms(&mut world, 0.0, 800.0);
        assert_eq!(count, 12);
        let ys = generated(&world);
        let expected: Vec<f32> = (1..=12).map(|k| k as f32 * 65.0).collect();
        assert_eq!(ys, expected);
    }

    #[test]
    fn test_exact_multiple_excludes_upper_bound() {
        let mut world = world_with(Tuning::default(), 650.0);
        assert_eq!(generate_platforms(&mut world, 0.0, 650.0), 9);
        assert!(generated(&world).iter().all(|&y| y < 650.0));
    }

    #[test]
    fn test_x_within_view() {
        let mut world = world_with(Tuning::default(), 800.0);
        generate_platforms(&mut world, 0.0, 5000.0);
        let (x_min, x_max) = horizontal_bounds(world.camera.position.x, 400.0, 40.0);
        for p in &world.platforms.platforms()[1..] {
            let x = p.position().unwrap().x;
            assert!(x >= x_min && x < x_max, "x = {}", x);
        }
    }

    #[test]
    fn test_narrow_view_centers_platforms() {
        let mut world = World::new(1, Tuning::default());
        world.set_viewport(Some(Viewport::new(50.0, 800.0)));
        generate_platforms(&mut world, 0.0, 200.0);
        let cx = world.camera.position.x;
        assert!(
            world.platforms.platforms()[1..]
                .iter()
                .all(|p| p.position().unwrap().x == cx)
        );
    }

    #[test]
    fn test_no_viewport_generates_nothing() {
        let mut world = World::new(1, Tuning::default());
        assert_eq!(generate_platforms(&mut world, 0.0, 800.0), 0);
        assert_eq!(stream_platforms(&mut world), 0);
        assert_eq!(world.platforms.len(), 1);
    }

    #[test]
    fn test_inverted_range_generates_nothing() {
        let mut world = world_with(Tuning::default(), 800.0);
        assert_eq!(generate_platforms(&mut world, 100.0, 100.0), 0);
        assert_eq!(generate_platforms(&mut world, 500.0, 100.0), 0);
    }

    #[test]
    fn test_stream_advances_frontier_by_viewport() {
        let mut world = world_with(Tuning::default(), 800.0);
        assert_eq!(world.platforms.spawn_frontier(), 0.0);

        assert_eq!(stream_platforms(&mut world), 12);
        assert_eq!(world.platforms.spawn_frontier(), 800.0);

        // Player resting above the title platform is still within a viewport of 800
        assert_eq!(stream_platforms(&mut world), 12);
        assert_eq!(world.platforms.spawn_frontier(), 1600.0);

        assert_eq!(stream_platforms(&mut world), 0);
        assert_eq!(world.platforms.spawn_frontier(), 1600.0);
    }

    #[test]
    fn test_frontier_never_moves_back() {
        let mut registry = PlatformRegistry::new(100.0);
        registry.advance_frontier(50.0);
        assert_eq!(registry.spawn_frontier(), 100.0);
        registry.advance_frontier(300.0);
        assert_eq!(registry.spawn_frontier(), 300.0);
    }

    #[test]
    fn test_cull_keeps_retention_window() {
        let mut world = world_with(Tuning::default(), 800.0);
        generate_platforms(&mut world, 0.0, 4000.0);
        world.camera.position.y = 3000.0;

        let culled = cull_platforms(&mut world);
        assert!(culled > 0);
        assert!(
            world
                .platforms
                .platforms()
                .iter()
                .all(|p| p.position().unwrap().y >= 2200.0)
        );
        assert!(world.drain_events().contains(&GameEvent::PlatformsCulled { count: culled }));
    }

    #[test]
    fn test_unbounded_retention_never_culls() {
        let tuning = Tuning {
            retention: Retention::Unbounded,
            ..Default::default()
        };
        let mut world = world_with(tuning, 800.0);
        generate_platforms(&mut world, 0.0, 4000.0);
        let live = world.platforms.len();
        world.camera.position.y = 100_000.0;
        assert_eq!(cull_platforms(&mut world), 0);
        assert_eq!(world.platforms.len(), live);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = world_with(Tuning::default(), 800.0);
        let mut b = world_with(Tuning::default(), 800.0);
        generate_platforms(&mut a, 0.0, 2000.0);
        generate_platforms(&mut b, 0.0, 2000.0);
        let xs = |w: &World| -> Vec<f32> {
            w.platforms.platforms().iter().map(|p| p.position().unwrap().x).collect()
        };
        assert_eq!(xs(&a), xs(&b));
    }

    proptest! {
        #[test]
        fn prop_band_count_and_spacing(
            y_min in -10_000.0f32..10_000.0,
            span in 1.0f32..3000.0,
            spacing in 10.0f32..200.0,
        ) {
            let tuning = Tuning { platform_spacing: spacing, ..Default::default() };
            let mut world = world_with(tuning, 800.0);
            let y_max = y_min + span;
            let count = generate_platforms(&mut world, y_min, y_max);

            let ys = generated(&world);
            prop_assert_eq!(ys.len(), count);
            for &y in &ys {
                prop_assert!(y > y_min && y < y_max);
            }
            for pair in ys.windows(2) {
                prop_assert!((pair[1] - pair[0] - spacing).abs() < 0.01);
            }

            // Away from exact multiples the count is the floor of span / spacing
            let ratio = (y_max - y_min) / spacing;
            let whole = ratio.floor();
            if ratio - whole > 1e-2 && whole + 1.0 - ratio > 1e-2 {
                prop_assert_eq!(count, whole as usize);
            }
        }
    }
}
