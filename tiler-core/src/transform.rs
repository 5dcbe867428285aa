//! Grid <-> device coordinate mapping.
//!
//! The grid is centered in the viewport, then offset by the pan. Cell lookups
//! are unclamped: a result outside `[0, cols) x [0, rows)` means
//! "no cell" and callers drop it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Snapshot of everything needed to map between grid cells and device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rows: u32,
    pub cols: u32,
    pub cell_size: u32,
    pub scale: f32,
    pub pan: Point,
    pub viewport: Size,
}

impl Transform {
    /// Size of the whole grid on screen.
    pub fn grid_size_pixels(&self) -> Size {
        let cell = self.cell_size as f32 * self.scale;
        Size::new(self.cols as f32 * cell, self.rows as f32 * cell)
    }

    /// Device position of the grid's top-left corner.
    pub fn origin_offset(&self) -> Point {
        let grid = self.grid_size_pixels();
        Point::new(
            (self.viewport.width - grid.width) / 2.0 + self.pan.x,
            (self.viewport.height - grid.height) / 2.0 + self.pan.y,
        )
    }

    /// Map a device point to `(col, row)`. Not clamped.
    pub fn device_to_cell(&self, px: f32, py: f32) -> (i64, i64) {
        let origin = self.origin_offset();
        let cell = self.cell_size as f32;
        let adjusted_x = (px - origin.x) / self.scale;
        let adjusted_y = (py - origin.y) / self.scale;
        (
            (adjusted_x / cell).floor() as i64,
            (adjusted_y / cell).floor() as i64,
        )
    }

    /// Device position of a cell's center.
    pub fn cell_center_to_device(&self, col: i64, row: i64) -> Point {
        let origin = self.origin_offset();
        let cell = self.cell_size as f32;
        let center_x = col as f32 * cell + cell / 2.0;
        let center_y = row as f32 * cell + cell / 2.0;
        Point::new(
            center_x * self.scale + origin.x,
            center_y * self.scale + origin.y,
        )
    }

    /// Device position of a cell's top-left corner.
    pub fn cell_origin_to_device(&self, col: i64, row: i64) -> Point {
        let origin = self.origin_offset();
        let cell = self.cell_size as f32 * self.scale;
        Point::new(origin.x + col as f32 * cell, origin.y + row as f32 * cell)
    }

    pub fn contains(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i64 && row < self.rows as i64
    }

    /// Device-space cell under a point, only if it lies inside the grid.
    pub fn cell_at(&self, px: f32, py: f32) -> Option<(u32, u32)> {
        let (col, row) = self.device_to_cell(px, py);
        self.contains(col, row).then_some((col as u32, row as u32))
    }
}

/// `scale * factor`, clamped into `[min, max]`.
pub fn zoomed_scale(scale: f32, factor: f32, min: f32, max: f32) -> f32 {
    (scale * factor).clamp(min, max)
}
