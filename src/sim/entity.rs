//! Entity kinematics and lifetime decay
//!
//! An entity is a bounded body whose `extents` double as its mass and its
//! collision diameter. Forces are instantaneous: `apply_force` performs one
//! semi-implicit Euler step and clears the acceleration again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ALPHA_OPAQUE, ATTRACT_MAX_DIST_SQ, ATTRACT_MIN_DIST_SQ, GRAVITY};
use crate::error::{Result, SimError};
use crate::{map_range, set_magnitude};

/// Stable identity issued by the world at insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Id carried by an entity that has not been spawned yet
    pub const UNASSIGNED: EntityId = EntityId(0);
}

/// 8-bit RGBA color binding read by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, ALPHA_OPAQUE);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Normalized float channels for vertex buffers
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

/// Shape tag used for drawing; physics ignores it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Ellipse,
    Rect {
        corner_radius: f32,
    },
    Triangle,
    Polygon {
        sides: u32,
    },
}

/// Angular state (radians, radians per tick)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spin {
    pub value: f32,
    pub velocity: f32,
}

/// Remaining-ticks decay state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Life {
    /// Ticks left before expiry
    pub remaining: u32,
    /// Lifetime the entity was created with
    pub total: u32,
    /// Subtracted from `extents` each live tick, per axis
    pub shrink: Vec2,
}

impl Life {
    fn new(ticks: u32, extents: Vec2) -> Self {
        let total = ticks as f32;
        // Each axis loses its own share so both reach zero together
        let unit = |extent: f32| extent - map_range(total - 1.0, 0.0, total, 0.0, extent);
        Self {
            remaining: ticks,
            total: ticks,
            shrink: Vec2::new(unit(extents.x), unit(extents.y)),
        }
    }
}

/// Where an entity sits in the decay state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    /// No lifetime, never decays
    Indefinite,
    /// Still counting down
    Timed { remaining: u32 },
    /// Counter hit zero; removed at the end of this tick
    Expiring,
}

/// Creation-time copy of an entity's state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub position: Vec2,
    pub extents: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub color: Rgba,
    pub spin: Option<Spin>,
    pub life: Option<Life>,
}

/// A simulated bounded body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Bounding size; `extents.x` is the mass and the collision diameter
    pub extents: Vec2,
    pub spin: Option<Spin>,
    pub life: Option<Life>,
    pub color: Rgba,
    pub shape: ShapeKind,
    snapshot: Snapshot,
    #[serde(skip)]
    expired: bool,
}

fn validate_extents(extents: Vec2) -> Result<()> {
    if !extents.is_finite() || extents.x <= 0.0 || extents.y <= 0.0 {
        return Err(SimError::InvalidExtents {
            x: extents.x,
            y: extents.y,
        });
    }
    Ok(())
}

impl Entity {
    /// Create a resting entity; extents must be positive on both axes
    pub fn new(position: Vec2, extents: Vec2) -> Result<Self> {
        validate_extents(extents)?;
        let mut entity = Self {
            id: EntityId::UNASSIGNED,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            extents,
            spin: None,
            life: None,
            color: Rgba::WHITE,
            shape: ShapeKind::Ellipse,
            snapshot: Snapshot {
                position,
                extents,
                velocity: Vec2::ZERO,
                acceleration: Vec2::ZERO,
                color: Rgba::WHITE,
                spin: None,
                life: None,
            },
            expired: false,
        };
        entity.capture();
        Ok(entity)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self.capture();
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self.capture();
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self.capture();
        self
    }

    pub fn with_spin(mut self, angle: f32, velocity: f32) -> Self {
        self.spin = Some(Spin {
            value: angle,
            velocity,
        });
        self.capture();
        self
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Result<Self> {
        if let ShapeKind::Polygon { sides } = shape {
            if sides < 3 {
                return Err(SimError::InvalidPolygon(sides));
            }
        }
        self.shape = shape;
        Ok(self)
    }

    /// Give the entity a lifetime of `ticks`; it shrinks linearly to zero
    pub fn with_life(mut self, ticks: u32) -> Result<Self> {
        if ticks == 0 {
            return Err(SimError::InvalidLifetime(ticks));
        }
        self.life = Some(Life::new(ticks, self.extents));
        self.capture();
        Ok(self)
    }

    fn capture(&mut self) {
        self.snapshot = Snapshot {
            position: self.position,
            extents: self.extents,
            velocity: self.velocity,
            acceleration: self.acceleration,
            color: self.color,
            spin: self.spin,
            life: self.life,
        };
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// State at creation
    pub fn original(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Mass scalar used by force integration
    #[inline]
    pub fn mass(&self) -> f32 {
        self.extents.x
    }

    /// Effective radius for the resolving collision
    #[inline]
    pub fn radius(&self) -> f32 {
        self.extents.x / 2.0
    }

    /// Convert `force` to acceleration and integrate one step.
    ///
    /// Call at most once per tick: sum all forces first, the speed clamp
    /// applies to the accumulated velocity.
    pub fn apply_force(&mut self, force: Vec2, speed_limit: f32) {
        let generated = force / self.mass();
        self.acceleration += generated;
        self.velocity += self.acceleration;
        self.velocity = self.velocity.clamp_length_max(speed_limit);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }

    /// Force with which `self` pulls `other` toward itself
    pub fn attraction_force(&self, other: &Entity) -> Vec2 {
        let force = self.position - other.position;
        let distance_sq = force
            .length_squared()
            .clamp(ATTRACT_MIN_DIST_SQ, ATTRACT_MAX_DIST_SQ);
        let strength = GRAVITY * (self.mass() * other.mass()) / distance_sq;
        set_magnitude(force, strength)
    }

    /// Pull `other` toward `self` and integrate it
    pub fn attract(&self, other: &mut Entity, speed_limit: f32) {
        let force = self.attraction_force(other);
        other.apply_force(force, speed_limit);
    }

    /// Reflect off the area edges, then advance by the velocity.
    ///
    /// All four edges are tested against the same predicted position, so a
    /// corner hit flips both axes in one call.
    pub fn bounce_of_border(&mut self, area: Vec2) {
        let half = self.extents / 2.0;
        let next = self.position + self.velocity;

        if next.y < half.y {
            self.velocity.y = -self.velocity.y; // top
        }
        if next.x > area.x - half.x {
            self.velocity.x = -self.velocity.x; // right
        }
        if next.y > area.y - half.y {
            self.velocity.y = -self.velocity.y; // bottom
        }
        if next.x < half.x {
            self.velocity.x = -self.velocity.x; // left
        }

        self.position += self.velocity;
    }

    /// Screen wrap: teleport to the opposite edge. Never combine with
    /// `bounce_of_border` in the same tick.
    pub fn edges(&mut self, area: Vec2) {
        let half = self.extents / 2.0;

        if self.position.x > area.x - half.x {
            self.position.x = half.x;
        }
        if self.position.x < half.x {
            self.position.x = area.x - half.x;
        }
        if self.position.y > area.y - half.y {
            self.position.y = half.y;
        }
        if self.position.y < half.y {
            self.position.y = area.y - half.y;
        }
    }

    /// Advance the spin angle by its angular velocity
    pub fn rotate(&mut self) {
        if let Some(spin) = self.spin.as_mut() {
            spin.value += spin.velocity;
        }
    }

    /// Restore the creation snapshot
    pub fn reset(&mut self) {
        let s = self.snapshot;
        self.position = s.position;
        self.extents = s.extents;
        self.velocity = s.velocity;
        self.acceleration = s.acceleration;
        self.color = s.color;
        self.spin = s.spin;
        self.life = s.life;
        self.expired = false;
    }

    /// Shrink extents by one tick's worth while life remains
    pub fn size_life(&mut self) {
        match self.life {
            Some(life) if life.remaining > 0 => {
                self.extents = (self.extents - life.shrink).max(Vec2::ZERO);
            }
            _ => {}
        }
    }

    /// Fade alpha over the second half of the lifetime
    pub fn color_life(&mut self) {
        let Some(life) = self.life else {
            return;
        };
        if life.remaining > 0 {
            let alpha = map_range(
                life.remaining as f32,
                0.0,
                life.total as f32 / 2.0,
                0.0,
                ALPHA_OPAQUE as f32,
            );
            self.color.a = alpha.clamp(0.0, ALPHA_OPAQUE as f32) as u8;
        }
    }

    /// Count down one tick; marks the entity expired once the counter is 0
    pub fn update_life(&mut self) -> LifeState {
        let Some(life) = self.life.as_mut() else {
            return LifeState::Indefinite;
        };
        if life.remaining > 0 {
            life.remaining -= 1;
        }
        if life.remaining == 0 {
            self.expired = true;
            LifeState::Expiring
        } else {
            LifeState::Timed {
                remaining: life.remaining,
            }
        }
    }

    /// One full decay step: shrink, fade, count down
    pub fn decay(&mut self) -> LifeState {
        self.size_life();
        self.color_life();
        self.update_life()
    }

    pub fn life_state(&self) -> LifeState {
        match self.life {
            None => LifeState::Indefinite,
            Some(life) if life.remaining == 0 => LifeState::Expiring,
            Some(life) => LifeState::Timed {
                remaining: life.remaining,
            },
        }
    }

    /// Marked for removal at the end of the current tick
    pub fn is_expired(&self) -> bool {
        self.expired
    }
}
