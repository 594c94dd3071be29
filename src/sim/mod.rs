//! Deterministic simulation module
//!
//! All shape behaviour lives here. This module must be pure and deterministic:
//! - One tick per external frame, no wall-clock time
//! - Seeded noise and RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod flowfield;
pub mod noise_source;
pub mod orbit;
pub mod tick;
pub mod trail;
pub mod world;

pub use collision::{Contact, PairSet, collide, made_contact, made_contact_x, made_contact_y, pair_key};
pub use entity::{Entity, EntityId, Life, LifeState, Rgba, ShapeKind, Snapshot, Spin};
pub use flowfield::{Cell, FlowField};
pub use noise_source::{NoiseSource, PerlinNoise};
pub use orbit::Orbit;
pub use tick::{TickInput, TickStats, tick};
pub use trail::Trail;
pub use world::World;
