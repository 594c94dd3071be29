//! Shape Sim entry point
//!
//! Headless demo: builds a world from an optional JSON config, spawns a
//! mixed population and runs a fixed number of frames, logging as it goes.
//!
//! Usage: `shape-sim [config.json] [frames]`

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use shape_sim::renderer::{self, Drawable};
use shape_sim::sim::{Entity, Orbit, Rgba, ShapeKind, TickInput, Trail, World, tick};
use shape_sim::{FlowFieldConfig, Result, SimConfig};

const DEFAULT_FRAMES: u64 = 600;
const REPORT_EVERY: u64 = 120;
const POPULATION: usize = 24;

fn random_color(rng: &mut Pcg32) -> Rgba {
    Rgba::new(rng.random(), rng.random(), rng.random(), 255)
}

fn random_shape(rng: &mut Pcg32) -> ShapeKind {
    match rng.random_range(0..4) {
        0 => ShapeKind::Ellipse,
        1 => ShapeKind::Rect {
            corner_radius: rng.random_range(0.0..4.0),
        },
        2 => ShapeKind::Triangle,
        _ => ShapeKind::Polygon {
            sides: rng.random_range(3..9),
        },
    }
}

/// Spawn shapes at free random positions; every third one is timed
fn populate(world: &mut World, rng: &mut Pcg32) -> Result<()> {
    let mut attempts = 0;
    let mut spawned = 0;
    while spawned < POPULATION && attempts < POPULATION * 20 {
        attempts += 1;
        let size = rng.random_range(8.0..32.0);
        let position = world.random_position(rng, size);
        let velocity = Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0));
        let mut entity = Entity::new(position, Vec2::splat(size))?
            .with_velocity(velocity)
            .with_color(random_color(rng))
            .with_spin(0.0, rng.random_range(-0.05..0.05))
            .with_shape(random_shape(rng))?;
        if world.overlaps(&entity) {
            continue;
        }
        if spawned % 3 == 0 {
            entity = entity.with_life(rng.random_range(120..480))?;
        }
        world.spawn(entity);
        spawned += 1;
    }
    log::info!("Spawned {} shapes in {} attempts", spawned, attempts);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Shape Sim (native) starting...");

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => SimConfig::load(&path)?,
        None => SimConfig::default(),
    };
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    if config.flowfield.is_none() {
        config.flowfield = Some(FlowFieldConfig {
            seed: config.seed as u32,
            ..Default::default()
        });
    }

    let mut rng = Pcg32::seed_from_u64(config.seed);
    let mut world = World::new(config)?;
    log::info!("World initialized with seed: {}", world.config().seed);

    populate(&mut world, &mut rng)?;

    // A heavy attractor with two satellites
    let centre = world.area() / 2.0;
    let sun = world.spawn(
        Entity::new(centre, Vec2::splat(60.0))?.with_color(Rgba::new(255, 200, 40, 255)),
    );
    let mut orbit = Orbit::new(sun);
    for angle in [0.0, std::f32::consts::PI] {
        let moon = Entity::new(centre, Vec2::splat(6.0))?.with_spin(angle, 0.02);
        orbit.add_child(world.spawn(moon));
    }
    world.add_orbit(orbit);

    let mut trail = Trail::new(centre, centre).with_color(Rgba::new(120, 220, 255, 200));
    let input = TickInput {
        attractor: Some(sun),
        ..Default::default()
    };

    let mut contacts = 0;
    let mut expired = 0;
    for frame in 1..=frames {
        let stats = tick(&mut world, &input);
        contacts += stats.contacts;
        expired += stats.expired;

        if let Some(first) = world.entities().first() {
            trail.add(first.position);
            trail.edges(world.area());
        }

        if frame % REPORT_EVERY == 0 {
            let geometry = renderer::draw_world(&world).len()
                + renderer::trail_segment(&trail, 2.0).len()
                + world
                    .flowfield()
                    .map(|f| renderer::flowfield_lines(f, renderer::vertex::colors::FLOW_LINE).len())
                    .unwrap_or(0);
            log::info!(
                "frame {}: {} entities, {} contacts, {} expired, {} vertices",
                frame,
                world.len(),
                contacts,
                expired,
                geometry
            );
        }
    }

    if let Some(sun_entity) = world.get(sun) {
        log::debug!("Attractor spans {} vertices", sun_entity.draw(sun_entity.position).len());
    }
    log::info!(
        "Finished {} frames: {} entities remain, {} expired in total",
        world.time_ticks(),
        world.len(),
        expired
    );
    Ok(())
}
