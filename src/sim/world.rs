//! World state: the owning entity collection plus field and orbits
//!
//! Entities are kept sorted by id. Ids are issued from a monotonic counter
//! and only ever appended, and removal preserves order, so lookups can
//! binary-search.

use glam::Vec2;
use rand::Rng;

use super::collision::{self, PairSet};
use super::entity::{Entity, EntityId};
use super::flowfield::{Cell, FlowField};
use super::noise_source::{NoiseSource, PerlinNoise};
use super::orbit::Orbit;
use crate::config::{FlowFieldConfig, SimConfig};
use crate::error::Result;

/// Position of `id` in an id-sorted entity slice
pub(crate) fn index_of(entities: &[Entity], id: EntityId) -> Option<usize> {
    entities.binary_search_by_key(&id, |e| e.id()).ok()
}

fn random_axis<R: Rng + ?Sized>(rng: &mut R, margin: f32, extent: f32) -> f32 {
    let lo = margin;
    let hi = extent - margin;
    if lo < hi {
        rng.random_range(lo..hi)
    } else {
        extent / 2.0
    }
}

/// The simulation world
pub struct World {
    pub(crate) config: SimConfig,
    pub(crate) entities: Vec<Entity>,
    pub(crate) flowfield: Option<FlowField>,
    pub(crate) noise: Box<dyn NoiseSource>,
    custom_noise: bool,
    pub(crate) orbits: Vec<Orbit>,
    pub(crate) running: bool,
    pub(crate) time_ticks: u64,
    next_id: u32,
}

impl World {
    /// Create an empty, running world
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.flowfield.as_ref().map(|f| f.seed).unwrap_or(0);
        let flowfield = match &config.flowfield {
            Some(field) => Some(FlowField::new(config.width, config.height, field)?),
            None => None,
        };

        log::info!(
            "World created: {}x{}, border={}, collisions={}",
            config.width,
            config.height,
            config.border.as_str(),
            config.collisions
        );

        Ok(Self {
            config,
            entities: Vec::new(),
            flowfield,
            noise: Box::new(PerlinNoise::new(seed)),
            custom_noise: false,
            orbits: Vec::new(),
            running: true,
            time_ticks: 0,
            next_id: 1,
        })
    }

    /// Replace the noise collaborator driving the flow field
    pub fn with_noise(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.noise = Box::new(noise);
        self.custom_noise = true;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Area size as a vector
    pub fn area(&self) -> Vec2 {
        Vec2::new(self.config.width, self.config.height)
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Take ownership of `entity` and issue its id
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_entity_id();
        entity.assign_id(id);
        log::debug!("Spawned entity {} at {:?}", id.0, entity.position);
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        index_of(&self.entities, id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        index_of(&self.entities, id).map(|i| &mut self.entities[i])
    }

    /// Drop an entity immediately and detach it from every orbit
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(idx) = index_of(&self.entities, id) else {
            return false;
        };
        self.entities.remove(idx);
        for orbit in &mut self.orbits {
            orbit.remove_child(id);
        }
        true
    }

    /// Entities in id order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// True if `probe` touches any live entity
    pub fn overlaps(&self, probe: &Entity) -> bool {
        collision::any_contact(&self.entities, probe)
    }

    /// Reflect every entity off the area edges
    pub fn bounce_of_border(&mut self) {
        let area = self.area();
        for entity in &mut self.entities {
            entity.bounce_of_border(area);
        }
    }

    /// Screen-wrap every entity
    pub fn wrap_edges(&mut self) {
        let area = self.area();
        for entity in &mut self.entities {
            entity.edges(area);
        }
    }

    /// Pairs held together by orbits; these never collide with each other
    pub fn orbit_links(&self) -> PairSet {
        let mut pairs = PairSet::new();
        for orbit in &self.orbits {
            orbit.collect_links(&mut pairs);
        }
        pairs
    }

    /// Resolve all pairwise collisions once; returns pairs in contact
    pub fn bounce_of_objects(&mut self) -> usize {
        let exempt = self.orbit_links();
        collision::resolve_all(&mut self.entities, &exempt)
    }

    /// Advance every orbit constraint
    pub fn rotate_orbits(&mut self) {
        for orbit in &self.orbits {
            orbit.rotate(&mut self.entities);
        }
    }

    /// Compact out expired entities; returns how many were removed
    pub fn prune(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| {
            if e.is_expired() {
                log::debug!("Entity {} expired", e.id().0);
                false
            } else {
                true
            }
        });
        let removed = before - self.entities.len();
        if removed > 0 {
            for orbit in &mut self.orbits {
                orbit.retain_live(&self.entities);
            }
        }
        removed
    }

    /// Build (or replace) the flow field for the current area.
    /// Reseeds the default Perlin source unless a custom one was supplied.
    pub fn set_flowfield(&mut self, config: FlowFieldConfig) -> Result<()> {
        let field = FlowField::new(self.config.width, self.config.height, &config)?;
        log::info!(
            "Flow field set: {:?} cells of {}",
            field.dimensions(),
            config.cell_size
        );
        if !self.custom_noise {
            self.noise = Box::new(PerlinNoise::new(config.seed));
        }
        self.flowfield = Some(field);
        self.config.flowfield = Some(config);
        Ok(())
    }

    pub fn flowfield(&self) -> Option<&FlowField> {
        self.flowfield.as_ref()
    }

    /// Flow-field cell under `position`, clamped into the grid
    pub fn field_zone(&self, position: Vec2) -> Option<&Cell> {
        self.flowfield.as_ref().map(|f| f.zone(position))
    }

    /// Change the area size; the flow field is rebuilt from scratch
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        let mut config = self.config.clone();
        config.width = width;
        config.height = height;
        config.validate()?;

        if let Some(field) = &mut self.flowfield {
            field.rebuild(width, height)?;
        }
        log::info!(
            "World resized: {}x{} -> {}x{}",
            self.config.width,
            self.config.height,
            width,
            height
        );
        self.config = config;
        Ok(())
    }

    /// Uniform random position at least `size` from every edge.
    /// Axes too small for that margin collapse to the centre.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R, size: f32) -> Vec2 {
        let x = random_axis(rng, size, self.config.width);
        let y = random_axis(rng, size, self.config.height);
        Vec2::new(x, y)
    }

    /// Register an orbit; returns its index
    pub fn add_orbit(&mut self, orbit: Orbit) -> usize {
        self.orbits.push(orbit);
        self.orbits.len() - 1
    }

    pub fn orbits(&self) -> &[Orbit] {
        &self.orbits
    }

    pub fn orbit_mut(&mut self, index: usize) -> Option<&mut Orbit> {
        self.orbits.get_mut(index)
    }

    /// Resume ticking (the drawing surface became visible)
    pub fn start(&mut self) {
        if !self.running {
            log::debug!("World resumed at tick {}", self.time_ticks);
        }
        self.running = true;
    }

    /// Suspend ticking; `tick` becomes a no-op until `start`
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("World paused at tick {}", self.time_ticks);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
