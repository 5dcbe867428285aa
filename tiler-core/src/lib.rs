//! tiler-core: the map canvas engine for the tile editor.
//!
//! Design rules:
//! - The engine never depends on a UI toolkit; glue code feeds it device coordinates.
//! - The placement grid never stores entries outside its current bounds.
//! - Tiles are owned by the registry; the grid only holds `TileId`s.
//! - Everything runs on the single interaction thread, no locking inside.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default grid height in cells.
pub const DEFAULT_GRID_ROWS: u32 = 16;
/// Default grid width in cells.
pub const DEFAULT_GRID_COLS: u32 = 16;
/// Default cell edge length in grid pixels.
pub const DEFAULT_CELL_SIZE: u32 = 16;

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;

/// Discrete zoom steps (menu and keyboard).
pub const ZOOM_IN_FACTOR: f32 = 1.1;
pub const ZOOM_OUT_FACTOR: f32 = 1.0 / 1.1;

/// Finer zoom steps for continuous wheel input.
pub const WHEEL_ZOOM_IN_FACTOR: f32 = 1.03;
pub const WHEEL_ZOOM_OUT_FACTOR: f32 = 0.97;

pub const MIN_BRUSH_AREA: u32 = 1;
pub const MAX_BRUSH_AREA: u32 = 32;

/// Coarse classification of every error the engine and its codecs can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Image bytes could not be read; the file is skipped.
    Decode,
    /// Persisted text or JSON does not follow the documented grammar.
    Format,
    /// Input rejected before any state was touched.
    Validation,
}

/// Numeric parameters needed to build a placement grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
    pub cell_size: u32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
            cell_size: DEFAULT_CELL_SIZE,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), GridError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::InvalidDimensions {
                rows: self.rows as i64,
                cols: self.cols as i64,
            });
        }
        if self.cell_size == 0 {
            return Err(GridError::InvalidCellSize { size: 0 });
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(GridError::InvalidScaleBounds {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        Ok(())
    }
}

/// Input rejected by the placement grid before mutating it.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid dimensions must be positive: rows={rows} cols={cols}")]
    InvalidDimensions { rows: i64, cols: i64 },

    #[error("cell size must be positive: {size}")]
    InvalidCellSize { size: i64 },

    #[error("invalid scale bounds: min={min} max={max}")]
    InvalidScaleBounds { min: f32, max: f32 },
}

impl GridError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

pub mod grid;
pub mod history;
pub mod render;
pub mod tile;
pub mod transform;

pub use grid::{GridCoord, PlacementEntry, PlacementGrid};
pub use history::History;
pub use render::{render, DrawCommand, Preview};
pub use tile::{LoadFailure, LoadReport, Tile, TileError, TileId, TileRegistry, TILE_IMAGE_EXT};
pub use transform::{Point, Size, Transform};
