//! Placement grid: the authoritative map of which tile sits in which cell.
//!
//! The grid also carries the view state (scale, pan, viewport) because tile
//! placement is driven by device coordinates. Every mutation happens on the
//! interaction thread; the grid is not shared.

use tracing::{debug, info, trace, warn};

use crate::history::History;
use crate::tile::TileId;
use crate::transform::{zoomed_scale, Point, Size, Transform};
use crate::{
    GridConfig, GridError, MAX_BRUSH_AREA, MIN_BRUSH_AREA, WHEEL_ZOOM_IN_FACTOR,
    WHEEL_ZOOM_OUT_FACTOR, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub col: u32,
    pub row: u32,
}

impl GridCoord {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementEntry {
    pub coord: GridCoord,
    pub tile: TileId,
}

#[derive(Debug, Clone)]
pub struct PlacementGrid {
    rows: u32,
    cols: u32,
    cell_size: u32,
    scale: f32,
    min_scale: f32,
    max_scale: f32,
    pan: Point,
    // None until the glue reports a real viewport; the grid then fills it exactly.
    viewport: Option<Size>,
    brush_area: u32,
    entries: Vec<PlacementEntry>,
    history: History,
}

impl Default for PlacementGrid {
    fn default() -> Self {
        Self::from_config(GridConfig::default())
    }
}

impl PlacementGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: GridConfig) -> Self {
        info!(
            rows = config.rows,
            cols = config.cols,
            cell_size = config.cell_size,
            "creating placement grid"
        );
        Self {
            rows: config.rows,
            cols: config.cols,
            cell_size: config.cell_size,
            scale: 1.0,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            pan: Point::default(),
            viewport: None,
            brush_area: MIN_BRUSH_AREA,
            entries: Vec::new(),
            history: History::new(),
        }
    }

    pub fn transform(&self) -> Transform {
        Transform {
            rows: self.rows,
            cols: self.cols,
            cell_size: self.cell_size,
            scale: self.scale,
            pan: self.pan,
            viewport: self.viewport(),
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport.unwrap_or_else(|| {
            let cell = self.cell_size as f32 * self.scale;
            Size::new(self.cols as f32 * cell, self.rows as f32 * cell)
        })
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        trace!(width = viewport.width, height = viewport.height, "viewport set");
        self.viewport = Some(viewport);
    }

    fn contains(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i64 && row < self.rows as i64
    }

    fn index_of(&self, coord: GridCoord) -> Option<usize> {
        self.entries.iter().position(|e| e.coord == coord)
    }

    /// Paint `tile` with the current brush at a device point.
    pub fn place(&mut self, x: f32, y: f32, tile: TileId, record_history: bool) -> usize {
        self.place_area(x, y, tile, self.brush_area, record_history)
    }

    /// Paint an `area x area` block anchored at the cell under a device point.
    /// Returns how many cells changed. A point outside the grid is ignored.
    pub fn place_area(
        &mut self,
        x: f32,
        y: f32,
        tile: TileId,
        area: u32,
        record_history: bool,
    ) -> usize {
        let (col, row) = self.transform().device_to_cell(x, y);
        if !self.contains(col, row) {
            trace!(x, y, col, row, "placement outside grid ignored");
            return 0;
        }
        self.place_cell(col as u32, row as u32, tile, area, record_history)
    }

    /// Cell-addressed placement, anchored at `(col, row)`.
    pub fn place_cell(
        &mut self,
        col: u32,
        row: u32,
        tile: TileId,
        area: u32,
        record_history: bool,
    ) -> usize {
        if !self.contains(col as i64, row as i64) {
            return 0;
        }
        let area = area.clamp(MIN_BRUSH_AREA, MAX_BRUSH_AREA);

        let mut changed = 0;
        for dy in 0..area {
            for dx in 0..area {
                let (c, r) = (col as i64 + dx as i64, row as i64 + dy as i64);
                if !self.contains(c, r) {
                    continue;
                }
                let coord = GridCoord::new(c as u32, r as u32);

                let existing = self.index_of(coord);
                if let Some(i) = existing {
                    if self.entries[i].tile == tile {
                        continue;
                    }
                    let displaced = self.entries.remove(i);
                    if record_history {
                        self.history.push(displaced);
                    }
                }

                let entry = PlacementEntry { coord, tile };
                self.entries.push(entry);
                if record_history {
                    self.history.push(entry);
                }
                changed += 1;
            }
        }

        debug!(col, row, area, tile = tile.0, changed, "tiles placed");
        changed
    }

    /// Step back one history entry. Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(last) = self.history.pop() else {
            debug!("undo with empty history");
            return false;
        };

        if let Some(i) = self.index_of(last.coord) {
            self.entries.remove(i);
        }
        if let Some(previous) = self.history.last_at(last.coord) {
            self.entries.push(previous);
        }

        debug!(
            col = last.coord.col,
            row = last.coord.row,
            remaining = self.history.len(),
            "undo"
        );
        true
    }

    /// Replace the dimensions. Entries and history are always dropped.
    pub fn resize(&mut self, rows: u32, cols: u32) -> Result<(), GridError> {
        if rows == 0 || cols == 0 {
            warn!(rows, cols, "rejecting grid resize");
            return Err(GridError::InvalidDimensions {
                rows: rows as i64,
                cols: cols as i64,
            });
        }
        info!(rows, cols, "resizing grid");
        self.rows = rows;
        self.cols = cols;
        self.entries.clear();
        self.history.clear();
        Ok(())
    }

    /// Change the cell edge length; placed entries keep their coordinates.
    pub fn resize_cell_size(&mut self, size: u32) -> Result<(), GridError> {
        if size == 0 {
            warn!("rejecting zero cell size");
            return Err(GridError::InvalidCellSize { size: 0 });
        }
        info!(size, "changing cell size");
        self.cell_size = size;
        Ok(())
    }

    /// Fresh map at the default dimensions.
    pub fn clear(&mut self) {
        let defaults = GridConfig::default();
        info!("new map");
        self.rows = defaults.rows;
        self.cols = defaults.cols;
        self.entries.clear();
        self.history.clear();
    }

    pub fn zoom(&mut self, factor: f32) {
        self.scale = zoomed_scale(self.scale, factor, self.min_scale, self.max_scale);
        debug!(factor, scale = self.scale, "zoom");
    }

    pub fn zoom_in(&mut self) {
        self.zoom(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.zoom(ZOOM_OUT_FACTOR);
    }

    /// Continuous zoom from a wheel: positive deltas zoom in, zero does nothing.
    pub fn wheel_zoom(&mut self, delta: f32) {
        if delta > 0.0 {
            self.zoom(WHEEL_ZOOM_IN_FACTOR);
        } else if delta < 0.0 {
            self.zoom(WHEEL_ZOOM_OUT_FACTOR);
        }
    }

    pub fn reset_zoom(&mut self) {
        self.scale = 1.0_f32.clamp(self.min_scale, self.max_scale);
        debug!(scale = self.scale, "zoom reset");
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan.x += dx;
        self.pan.y += dy;
        trace!(x = self.pan.x, y = self.pan.y, "pan");
    }

    pub fn set_brush_area(&mut self, area: u32) {
        self.brush_area = area.clamp(MIN_BRUSH_AREA, MAX_BRUSH_AREA);
        debug!(area = self.brush_area, "brush area");
    }

    pub fn increase_brush_area(&mut self) {
        self.set_brush_area(self.brush_area.saturating_add(1));
    }

    pub fn decrease_brush_area(&mut self) {
        self.set_brush_area(self.brush_area.saturating_sub(1));
    }

    /// In-bounds cells the brush would cover at a device point.
    pub fn brush_footprint(&self, x: f32, y: f32) -> Vec<GridCoord> {
        let (col, row) = self.transform().device_to_cell(x, y);
        if !self.contains(col, row) {
            return Vec::new();
        }
        let area = self.brush_area as i64;
        (0..area)
            .flat_map(|dy| (0..area).map(move |dx| (col + dx, row + dy)))
            .filter(|&(c, r)| self.contains(c, r))
            .map(|(c, r)| GridCoord::new(c as u32, r as u32))
            .collect()
    }

    pub fn entry_at(&self, col: u32, row: u32) -> Option<TileId> {
        self.index_of(GridCoord::new(col, row))
            .map(|i| self.entries[i].tile)
    }

    /// Current placements in insertion order.
    pub fn entries(&self) -> &[PlacementEntry] {
        &self.entries
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn scale_bounds(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn brush_area(&self) -> u32 {
        self.brush_area
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }
}
