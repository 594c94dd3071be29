//! Error types for shape-sim.
//!
//! Only construction and configuration can fail. Once a world is built the
//! per-tick path never returns an error: out-of-range queries are clamped and
//! degenerate vectors resolve to no-ops.

use std::fmt;

/// Errors raised while building entities, flow fields, worlds or configs.
#[derive(Debug)]
pub enum SimError {
    /// Entity extents must be finite and strictly positive on both axes.
    InvalidExtents { x: f32, y: f32 },
    /// Flow-field cell size must be finite and strictly positive.
    InvalidCellSize(f32),
    /// The area is smaller than a single flow-field cell.
    EmptyFlowField {
        width: f32,
        height: f32,
        cell_size: f32,
    },
    /// A timed entity needs at least one tick of life.
    InvalidLifetime(u32),
    /// Simulation area must be finite and strictly positive.
    InvalidArea { width: f32, height: f32 },
    /// Speed limit must be a non-negative number.
    InvalidSpeedLimit(f32),
    /// A polygon needs at least three sides.
    InvalidPolygon(u32),
    /// Inconsistent configuration value.
    Config(String),
    /// Failed to read a config file.
    Io(std::io::Error),
    /// Failed to parse a config file.
    Json(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidExtents { x, y } => {
                write!(f, "Entity extents must be positive, got ({}, {})", x, y)
            }
            SimError::InvalidCellSize(size) => {
                write!(f, "Flow field cell size must be positive, got {}", size)
            }
            SimError::EmptyFlowField {
                width,
                height,
                cell_size,
            } => write!(
                f,
                "Area {}x{} is smaller than one flow field cell of size {}",
                width, height, cell_size
            ),
            SimError::InvalidLifetime(ticks) => {
                write!(f, "Lifetime must be at least one tick, got {}", ticks)
            }
            SimError::InvalidArea { width, height } => {
                write!(f, "Simulation area must be positive, got {}x{}", width, height)
            }
            SimError::InvalidSpeedLimit(limit) => {
                write!(f, "Speed limit must be non-negative, got {}", limit)
            }
            SimError::InvalidPolygon(sides) => {
                write!(f, "Polygon needs at least 3 sides, got {}", sides)
            }
            SimError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            SimError::Io(e) => write!(f, "Failed to read configuration: {}", e),
            SimError::Json(e) => write!(f, "Failed to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            SimError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Json(e)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;
