//! Shape Sim - a frame-driven 2D shape simulation layer
//!
//! Core modules:
//! - `sim`: Simulation core (kinematics, contacts, lifetime decay, flow field)
//! - `renderer`: Read-only geometry builders for a drawing collaborator
//! - `config`: Serializable simulation configuration
//! - `error`: Construction-time error types

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{BorderMode, FlowFieldConfig, SimConfig};
pub use error::{Result, SimError};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Gravitational constant used by `attract`
    pub const GRAVITY: f32 = 1.0;
    /// Squared-distance clamp for attraction (avoids the close-range singularity)
    pub const ATTRACT_MIN_DIST_SQ: f32 = 100.0;
    /// Squared-distance clamp for attraction (caps long-range falloff)
    pub const ATTRACT_MAX_DIST_SQ: f32 = 1000.0;

    /// Flow field time drift added after each grid column
    pub const FLOW_TIME_STEP: f64 = 0.0001;
    /// Full turns the noise range is spread across
    pub const FLOW_TURNS: f32 = 4.0;

    /// Default area
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
    /// Default velocity clamp for the world integration pass
    pub const DEFAULT_SPEED_LIMIT: f32 = 4.0;

    /// Maximum alpha channel value
    pub const ALPHA_OPAQUE: u8 = 255;
}

/// Linearly re-map `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Not clamped. A zero-width input range maps everything to `out_min`.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// Rescale `v` to length `magnitude`; negative magnitudes flip direction.
/// Zero vectors stay zero.
#[inline]
pub fn set_magnitude(v: Vec2, magnitude: f32) -> Vec2 {
    v.normalize_or_zero() * magnitude
}

/// Heading angle of a vector in radians
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
