//! Orbit constraint: children pinned to a circle around a parent
//!
//! The orbit holds ids, not entities. The world owns all of them; a child
//! or parent that has been removed is simply skipped.

use serde::{Deserialize, Serialize};

use super::collision::{PairSet, pair_key};
use super::entity::{Entity, EntityId};
use super::world::index_of;
use crate::polar_to_cartesian;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orbit {
    parent: EntityId,
    children: Vec<EntityId>,
}

impl Orbit {
    pub fn new(parent: EntityId) -> Self {
        Self {
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> EntityId {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Attach a child; the parent and duplicates are ignored
    pub fn add_child(&mut self, child: EntityId) -> bool {
        if child == self.parent || self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }

    pub fn remove_child(&mut self, child: EntityId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        self.children.len() != before
    }

    /// Place every child on the parent's circle at its spin angle, then
    /// advance the angle. Radius is the parent's half-width.
    ///
    /// Returns the number of children moved.
    pub fn rotate(&self, entities: &mut [Entity]) -> usize {
        let Some(parent) = index_of(entities, self.parent).map(|i| &entities[i]) else {
            return 0;
        };
        let center = parent.position;
        let radius = parent.radius();

        let mut moved = 0;
        for &child_id in &self.children {
            let Some(idx) = index_of(entities, child_id) else {
                continue;
            };
            let child = &mut entities[idx];
            let angle = child.spin.map(|s| s.value).unwrap_or(0.0);
            child.position = center + polar_to_cartesian(radius, angle);
            child.rotate();
            moved += 1;
        }
        moved
    }

    /// Add every pair this orbit holds rigidly (parent-child and
    /// child-child) to `pairs`
    pub fn collect_links(&self, pairs: &mut PairSet) {
        for (i, &child) in self.children.iter().enumerate() {
            pairs.insert(pair_key(self.parent, child));
            for &sibling in &self.children[i + 1..] {
                pairs.insert(pair_key(child, sibling));
            }
        }
    }

    /// Drop handles to children that no longer exist
    pub(crate) fn retain_live(&mut self, entities: &[Entity]) {
        self.children
            .retain(|&id| index_of(entities, id).is_some());
    }
}
