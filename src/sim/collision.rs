//! Contact detection and elastic collision response
//!
//! Every entity is treated as a disc for contact purposes, whatever its
//! drawn shape. Two notions coexist:
//! - `made_contact*`: cheap overlap queries, no mutation
//! - `collide`: resolving contact that separates the pair and exchanges
//!   the normal component of their velocities (equal-mass elastic)

use std::collections::HashSet;

use glam::Vec2;

use super::entity::{Entity, EntityId};
use crate::set_magnitude;

/// Unordered entity pairs, stored smaller id first
pub type PairSet = HashSet<(EntityId, EntityId)>;

/// Canonical key for an unordered pair
pub fn pair_key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Result of a resolving collision check
#[derive(Debug, Clone)]
pub struct Contact {
    /// Whether the pair overlapped
    pub hit: bool,
    /// Unit vector from the first entity toward the second
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
    /// Normal velocity transferred from the first entity to the second
    pub impulse: Vec2,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
            impulse: Vec2::ZERO,
        }
    }
}

/// Separate and bounce `a` and `b` if their discs overlap.
///
/// Each entity is pushed half the penetration apart along the contact
/// normal, then the approach speed along that normal is moved from `a` to
/// `b`. Tangential velocity is untouched. Coincident centres separate by
/// nothing and exchange nothing.
pub fn collide(a: &mut Entity, b: &mut Entity) -> Contact {
    let relative = b.position - a.position;
    let dist = relative.length() - (a.radius() + b.radius());
    if dist >= 0.0 {
        return Contact::miss();
    }

    let movement = set_magnitude(relative, dist.abs() / 2.0);
    a.position -= movement;
    b.position += movement;

    let normal = relative.normalize_or_zero();
    let approach_speed = a.velocity.dot(normal) - b.velocity.dot(normal);
    let impulse = normal * approach_speed;
    a.velocity -= impulse;
    b.velocity += impulse;

    Contact {
        hit: true,
        normal,
        penetration: -dist,
        impulse,
    }
}

/// Centre distance within the summed half-widths or the summed half-heights
pub fn made_contact(a: &Entity, b: &Entity) -> bool {
    made_contact_x(a, b) || made_contact_y(a, b)
}

/// Centre distance within the summed half-widths
pub fn made_contact_x(a: &Entity, b: &Entity) -> bool {
    a.position.distance(b.position) <= (a.extents.x + b.extents.x) / 2.0
}

/// Centre distance within the summed half-heights
pub fn made_contact_y(a: &Entity, b: &Entity) -> bool {
    a.position.distance(b.position) <= (a.extents.y + b.extents.y) / 2.0
}

/// Resolve every unordered pair once, in index order, skipping pairs in
/// `exempt` (bodies held together by a constraint).
///
/// Single pass: under dense packing an entity can end the pass still
/// overlapping a neighbour it was pushed into. Returns the number of pairs
/// that were in contact.
pub fn resolve_all(entities: &mut [Entity], exempt: &PairSet) -> usize {
    let mut hits = 0;
    for i in 0..entities.len() {
        let (head, tail) = entities.split_at_mut(i + 1);
        let main = &mut head[i];
        for other in tail.iter_mut() {
            if exempt.contains(&pair_key(main.id(), other.id())) {
                continue;
            }
            if collide(main, other).hit {
                hits += 1;
            }
        }
    }
    hits
}

/// True if `probe` touches any entity in `entities`
pub fn any_contact(entities: &[Entity], probe: &Entity) -> bool {
    entities.iter().any(|e| made_contact(e, probe))
}

impl Entity {
    pub fn collide(&mut self, other: &mut Entity) -> Contact {
        collide(self, other)
    }

    pub fn made_contact(&self, other: &Entity) -> bool {
        made_contact(self, other)
    }

    pub fn made_contact_x(&self, other: &Entity) -> bool {
        made_contact_x(self, other)
    }

    pub fn made_contact_y(&self, other: &Entity) -> bool {
        made_contact_y(self, other)
    }
}
