//! Per-frame simulation tick
//!
//! Fixed phase order, once per external frame:
//! 1. flow field re-sample
//! 2. force summation + integration (one `apply_force` per entity)
//! 3. pairwise collision resolution (orbit-linked pairs excluded)
//! 4. border containment
//! 5. orbit constraints
//! 6. lifetime decay, then compaction of expired entities

use glam::Vec2;

use super::entity::{EntityId, LifeState};
use super::world::World;
use crate::config::BorderMode;

/// External input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Uniform force applied to every entity (wind, gravity)
    pub force: Vec2,
    /// Entity whose pull is added to every other entity's force
    pub attractor: Option<EntityId>,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Pairs found in contact
    pub contacts: usize,
    /// Entities removed at the end of the tick
    pub expired: usize,
}

/// Advance the world by one frame. A stopped world is left untouched.
pub fn tick(world: &mut World, input: &TickInput) -> TickStats {
    if !world.running {
        return TickStats::default();
    }
    world.time_ticks += 1;
    let mut stats = TickStats::default();

    // Flow field drifts before anything reads it
    if let Some(field) = world.flowfield.as_mut() {
        field.update(&*world.noise);
    }

    // Attraction is computed against the attractor's pre-integration state
    let attractor = input.attractor.and_then(|id| world.get(id).cloned());
    let speed_limit = world.config.speed_limit;
    for entity in world.entities.iter_mut() {
        let mut force = input.force;
        if let Some(field) = &world.flowfield {
            force += field.force_at(entity.position);
        }
        if let Some(source) = &attractor {
            if source.id() != entity.id() {
                force += source.attraction_force(entity);
            }
        }
        entity.apply_force(force, speed_limit);
        entity.rotate();
    }

    if world.config.collisions {
        stats.contacts = world.bounce_of_objects();
    }

    match world.config.border {
        BorderMode::Bounce => world.bounce_of_border(),
        BorderMode::Wrap => world.wrap_edges(),
        BorderMode::None => {}
    }

    // Orbits go last so children end the tick exactly on their circle
    world.rotate_orbits();

    for entity in world.entities.iter_mut() {
        if let LifeState::Expiring = entity.decay() {
            log::trace!("Entity {} expiring", entity.id().0);
        }
    }
    stats.expired = world.prune();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FlowFieldConfig, SimConfig};
    use crate::sim::entity::Entity;
    use crate::sim::orbit::Orbit;

    fn disc(x: f32, y: f32, size: f32) -> Entity {
        Entity::new(Vec2::new(x, y), Vec2::splat(size)).unwrap()
    }

    fn still_config() -> SimConfig {
        SimConfig {
            speed_limit: 0.0,
            border: BorderMode::None,
            ..Default::default()
        }
    }

    #[test]
    fn test_resting_world_is_idempotent() {
        let mut world = World::new(still_config()).unwrap();
        let id = world.spawn(disc(120.0, 80.0, 10.0));
        for _ in 0..50 {
            tick(&mut world, &TickInput::default());
        }
        let e = world.get(id).unwrap();
        assert_eq!(e.position, Vec2::new(120.0, 80.0));
        assert_eq!(e.velocity, Vec2::ZERO);
        assert_eq!(world.time_ticks(), 50);
    }

    #[test]
    fn test_timed_entity_removed_after_last_tick() {
        let mut world = World::new(SimConfig::default()).unwrap();
        let id = world.spawn(disc(400.0, 300.0, 20.0).with_life(10).unwrap());
        let keeper = world.spawn(disc(100.0, 100.0, 20.0));

        let mut previous = 20.0;
        for t in 1..10 {
            let stats = tick(&mut world, &TickInput::default());
            assert_eq!(stats.expired, 0, "expired early at tick {t}");
            let e = world.get(id).unwrap();
            assert!(e.extents.x < previous);
            previous = e.extents.x;
        }

        let stats = tick(&mut world, &TickInput::default());
        assert_eq!(stats.expired, 1);
        assert!(world.get(id).is_none());
        assert!(world.get(keeper).is_some());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_stopped_world_does_not_tick() {
        let mut world = World::new(SimConfig::default()).unwrap();
        let id = world.spawn(disc(100.0, 100.0, 10.0).with_velocity(Vec2::new(1.0, 0.0)));
        world.stop();
        tick(&mut world, &TickInput::default());
        assert_eq!(world.time_ticks(), 0);
        assert_eq!(world.get(id).unwrap().position, Vec2::new(100.0, 100.0));

        world.start();
        tick(&mut world, &TickInput::default());
        assert_eq!(world.time_ticks(), 1);
        assert!(world.get(id).unwrap().position.x > 100.0);
    }

    #[test]
    fn test_collisions_resolved_in_tick() {
        let config = SimConfig {
            border: BorderMode::None,
            speed_limit: 10.0,
            ..Default::default()
        };
        let mut world = World::new(config).unwrap();
        let a = world.spawn(disc(100.0, 100.0, 10.0).with_velocity(Vec2::new(1.0, 0.0)));
        let b = world.spawn(disc(106.0, 100.0, 10.0));

        let stats = tick(&mut world, &TickInput::default());
        assert_eq!(stats.contacts, 1);
        assert!(world.get(a).unwrap().velocity.length() < 1e-5);
        assert!((world.get(b).unwrap().velocity - Vec2::new(1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_collisions_can_be_disabled() {
        let config = SimConfig {
            collisions: false,
            ..still_config()
        };
        let mut world = World::new(config).unwrap();
        world.spawn(disc(100.0, 100.0, 10.0));
        world.spawn(disc(102.0, 100.0, 10.0));
        assert_eq!(tick(&mut world, &TickInput::default()).contacts, 0);
    }

    #[test]
    fn test_uniform_force_moves_everything() {
        let config = SimConfig {
            border: BorderMode::None,
            speed_limit: 100.0,
            ..Default::default()
        };
        let mut world = World::new(config).unwrap();
        let id = world.spawn(disc(100.0, 100.0, 10.0));
        let input = TickInput {
            force: Vec2::new(0.0, 20.0),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert!((world.get(id).unwrap().position - Vec2::new(100.0, 102.0)).length() < 1e-5);
    }

    #[test]
    fn test_flowfield_pushes_entities() {
        let config = SimConfig {
            border: BorderMode::None,
            speed_limit: 100.0,
            flowfield: Some(FlowFieldConfig {
                cell_size: 50.0,
                strength: 10.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        // Zero noise -> every cell points along +x
        let mut world = World::new(config)
            .unwrap()
            .with_noise(|_x: f64, _y: f64, _z: f64| 0.0);
        let id = world.spawn(disc(400.0, 300.0, 10.0));
        tick(&mut world, &TickInput::default());
        assert!((world.get(id).unwrap().position - Vec2::new(401.0, 300.0)).length() < 1e-5);
        assert!(world.flowfield().unwrap().time_offset() > 0.0);
    }

    #[test]
    fn test_attractor_pulls_others() {
        let config = SimConfig {
            border: BorderMode::None,
            collisions: false,
            ..Default::default()
        };
        let mut world = World::new(config).unwrap();
        let sun = world.spawn(disc(400.0, 300.0, 30.0));
        let planet = world.spawn(disc(300.0, 300.0, 10.0));
        let input = TickInput {
            attractor: Some(sun),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert_eq!(world.get(sun).unwrap().position, Vec2::new(400.0, 300.0));
        assert!(world.get(planet).unwrap().position.x > 300.0);
    }

    #[test]
    fn test_orbit_runs_each_tick() {
        let config = SimConfig {
            collisions: false,
            ..still_config()
        };
        let mut world = World::new(config).unwrap();
        let parent = world.spawn(disc(200.0, 200.0, 40.0));
        let child = world.spawn(disc(0.0, 0.0, 2.0).with_spin(0.0, 0.1));
        let mut orbit = Orbit::new(parent);
        orbit.add_child(child);
        world.add_orbit(orbit);

        tick(&mut world, &TickInput::default());
        let c = world.get(child).unwrap();
        assert!((c.position.distance(Vec2::new(200.0, 200.0)) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_holds_under_default_config() {
        let mut world = World::new(SimConfig::default()).unwrap();
        let centre = Vec2::new(400.0, 300.0);
        let parent = world.spawn(disc(centre.x, centre.y, 60.0));
        let moons = [
            world.spawn(disc(0.0, 0.0, 6.0).with_spin(0.0, 0.02)),
            world.spawn(disc(0.0, 0.0, 6.0).with_spin(0.1, 0.02)),
        ];
        let mut orbit = Orbit::new(parent);
        for moon in moons {
            orbit.add_child(moon);
        }
        world.add_orbit(orbit);

        for t in 1..=20 {
            let stats = tick(&mut world, &TickInput::default());
            assert_eq!(stats.contacts, 0, "orbit pair collided at tick {t}");
            assert_eq!(world.get(parent).unwrap().position, centre);
            for moon in moons {
                let dist = world.get(moon).unwrap().position.distance(centre);
                assert!((dist - 30.0).abs() < 1e-3, "tick {t}: moon at {dist}");
            }
        }
    }

    #[test]
    fn test_wrap_mode_teleports() {
        let config = SimConfig {
            border: BorderMode::Wrap,
            speed_limit: 10.0,
            ..Default::default()
        };
        let mut world = World::new(config).unwrap();
        let id = world.spawn(disc(793.0, 300.0, 10.0).with_velocity(Vec2::new(5.0, 0.0)));
        tick(&mut world, &TickInput::default());
        assert_eq!(world.get(id).unwrap().position.x, 5.0);
    }

    #[test]
    fn test_determinism() {
        let config = SimConfig {
            flowfield: Some(FlowFieldConfig {
                seed: 11,
                ..Default::default()
            }),
            ..Default::default()
        };
        let build = || {
            let mut world = World::new(config.clone()).unwrap();
            for i in 0..6 {
                let x = 100.0 + i as f32 * 90.0;
                world.spawn(disc(x, 300.0, 24.0).with_velocity(Vec2::new(1.5, -0.5)));
            }
            world
        };
        let mut w1 = build();
        let mut w2 = build();
        for _ in 0..30 {
            tick(&mut w1, &TickInput::default());
            tick(&mut w2, &TickInput::default());
        }
        for (a, b) in w1.entities().iter().zip(w2.entities()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.velocity, b.velocity);
        }
    }
}
