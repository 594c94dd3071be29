//! Geometry output for a drawing collaborator
//!
//! Read-only: builds triangle lists from simulation state, never mutates it.

pub mod shapes;
pub mod vertex;

pub use shapes::{Drawable, flowfield_lines, trail_segment};
pub use vertex::{Vertex, as_bytes};

use crate::sim::World;

/// Geometry for every entity at its current position, in id order
pub fn draw_world(world: &World) -> Vec<Vertex> {
    world
        .entities()
        .iter()
        .flat_map(|e| e.draw(e.position))
        .collect()
}
