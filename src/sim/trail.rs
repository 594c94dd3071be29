//! Two-point trailing segment following a moving point

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Rgba;

/// A segment whose `start` lags one step behind `end`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    pub start: Vec2,
    pub end: Vec2,
    /// Per-axis scale for `displacement`
    pub velocity: Vec2,
    pub color: Rgba,
}

impl Trail {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            velocity: Vec2::ZERO,
            color: Rgba::WHITE,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Shift `start` to the old `end` and move `end` to `point`
    pub fn add(&mut self, point: Vec2) {
        self.start = self.end;
        self.end = point;
    }

    /// Inverse of `add`: pull `end` back to `start`, `start` back to `point`
    pub fn remove(&mut self, point: Vec2) {
        self.end = self.start;
        self.start = point;
    }

    /// Collapse the segment onto its head
    pub fn settle(&mut self) {
        self.start = self.end;
    }

    /// Wrap `end` to the opposite edge once it leaves `area`; `start` snaps
    /// along so no segment spans the wrap. Returns true if it wrapped.
    pub fn edges(&mut self, area: Vec2) -> bool {
        let mut wrapped = false;
        if self.end.x > area.x {
            self.end.x = 0.0;
            wrapped = true;
        }
        if self.end.x < 0.0 {
            self.end.x = area.x;
            wrapped = true;
        }
        if self.end.y > area.y {
            self.end.y = 0.0;
            wrapped = true;
        }
        if self.end.y < 0.0 {
            self.end.y = area.y;
            wrapped = true;
        }
        if wrapped {
            self.settle();
        }
        wrapped
    }

    /// Unit direction from `end` back to `start`, scaled per axis by `velocity`
    pub fn displacement(&self) -> Vec2 {
        (self.start - self.end).normalize_or_zero() * self.velocity
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}
