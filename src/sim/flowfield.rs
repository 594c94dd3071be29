//! Noise-driven flow field
//!
//! A fixed grid laid over the area. Every update re-samples each cell's
//! direction from a coherent noise function, with a slowly advancing time
//! coordinate so the whole field drifts. Entities read the cell under them
//! as an ambient force.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::noise_source::NoiseSource;
use crate::config::FlowFieldConfig;
use crate::consts::{FLOW_TIME_STEP, FLOW_TURNS};
use crate::error::{Result, SimError};

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell centre
    pub position: Vec2,
    /// Unit direction
    pub velocity: Vec2,
}

/// Grid of unit vectors, stored column-major (`x` outer, `y` inner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowField {
    cell_size: f32,
    time_offset: f64,
    multiplier: f64,
    strength: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl FlowField {
    /// Build a `floor(width / cell) x floor(height / cell)` grid
    pub fn new(width: f32, height: f32, config: &FlowFieldConfig) -> Result<Self> {
        config.validate()?;
        let mut field = Self {
            cell_size: config.cell_size,
            time_offset: config.time_offset,
            multiplier: config.multiplier,
            strength: config.strength,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        field.rebuild(width, height)?;
        Ok(field)
    }

    /// Discard and reallocate the grid for a new area size
    pub fn rebuild(&mut self, width: f32, height: f32) -> Result<()> {
        let size = self.cell_size;
        if !size.is_finite() || size <= 0.0 {
            return Err(SimError::InvalidCellSize(size));
        }
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SimError::InvalidArea { width, height });
        }

        let cols = (width / size).floor() as usize;
        let rows = (height / size).floor() as usize;
        if cols == 0 || rows == 0 {
            return Err(SimError::EmptyFlowField {
                width,
                height,
                cell_size: size,
            });
        }

        let mut cells = Vec::with_capacity(cols * rows);
        for x in 0..cols {
            for y in 0..rows {
                let position = Vec2::new(
                    x as f32 * size + size / 2.0,
                    y as f32 * size + size / 2.0,
                );
                cells.push(Cell {
                    position,
                    velocity: Vec2::X,
                });
            }
        }

        self.cols = cols;
        self.rows = rows;
        self.cells = cells;
        log::debug!(
            "Flow field built: {}x{} cells of {} over {}x{}",
            cols,
            rows,
            size,
            width,
            height
        );
        Ok(())
    }

    /// Re-sample every cell direction from `noise`.
    ///
    /// The first noise coordinate steps by `multiplier` per row and the
    /// second per column; the time coordinate advances by a fixed amount
    /// after every column.
    pub fn update<N: NoiseSource + ?Sized>(&mut self, noise: &N) {
        for x in 0..self.cols {
            let x_off = x as f64 * self.multiplier;
            for y in 0..self.rows {
                let y_off = y as f64 * self.multiplier;
                let n = noise.sample(y_off, x_off, self.time_offset) as f32;
                let angle = n * TAU * FLOW_TURNS;
                self.cells[x * self.rows + y].velocity = Vec2::from_angle(angle);
            }
            self.time_offset += FLOW_TIME_STEP;
        }
    }

    /// Grid index for `position`, clamped into the grid
    pub fn cell_index(&self, position: Vec2) -> (usize, usize) {
        let raw = (position / self.cell_size).floor();
        // `as usize` saturates negatives and NaN to 0
        let x = (raw.x as usize).min(self.cols - 1);
        let y = (raw.y as usize).min(self.rows - 1);
        if x as f32 != raw.x || y as f32 != raw.y {
            log::trace!("Flow field query {:?} clamped to ({}, {})", position, x, y);
        }
        (x, y)
    }

    /// Cell under `position` (clamped)
    pub fn zone(&self, position: Vec2) -> &Cell {
        let (x, y) = self.cell_index(position);
        &self.cells[x * self.rows + y]
    }

    /// Ambient force for an entity at `position`
    pub fn force_at(&self, position: Vec2) -> Vec2 {
        self.zone(position).velocity * self.strength
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.cols && y < self.rows {
            self.cells.get(x * self.rows + y)
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// (columns, rows)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn time_offset(&self) -> f64 {
        self.time_offset
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }
}
