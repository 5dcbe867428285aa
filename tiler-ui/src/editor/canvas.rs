// This is the map canvas for the tile editor UI
// It ties the placement grid, the tile registry and the pointer together behind the
// operations the menus, keyboard and mouse glue call into

use std::path::{Path, PathBuf};

use tiler_codec::{CodecError, ImportSummary, ProjectDescriptor, ProjectImport};
use tiler_core::{
    render, DrawCommand, GridError, LoadReport, PlacementEntry, PlacementGrid, Point, Preview,
    Size, TileError, TileId, TileRegistry,
};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Default)]
pub struct MapCanvas {
    grid: PlacementGrid,
    registry: TileRegistry,
    selected_tile: Option<TileId>,
    // Multi-selection in the tile palette, in the order tiles were picked.
    selection: Vec<TileId>,
    pointer: Option<Point>,
    tiles_folder: Option<PathBuf>,
    matrix_path: Option<PathBuf>,
}

impl MapCanvas {
    pub fn new() -> Self {
        info!("Creating new map canvas");
        Self::default()
    }

    pub fn with_grid(grid: PlacementGrid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    // Layout changed: tell the grid how big the viewport is
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.grid.set_viewport(Size::new(width, height));
    }

    // Paint the selected tile with the current brush
    pub fn place(&mut self, x: f32, y: f32) -> usize {
        match self.selected_tile {
            Some(tile) => self.place_tile(x, y, tile),
            None => {
                trace!("Placement at ({}, {}) without a selected tile", x, y);
                0
            }
        }
    }

    pub fn place_tile(&mut self, x: f32, y: f32, tile: TileId) -> usize {
        if self.registry.get(tile).is_none() {
            warn!("Attempted to place unknown tile {:?}", tile);
            return 0;
        }
        self.grid.place(x, y, tile, true)
    }

    pub fn undo(&mut self) -> bool {
        self.grid.undo()
    }

    // Dimensions arrive from user input, so they are checked here before the grid sees them
    pub fn resize(&mut self, rows: i64, cols: i64) -> Result<(), GridError> {
        let (Ok(r), Ok(c)) = (u32::try_from(rows), u32::try_from(cols)) else {
            warn!("Rejecting grid size {}x{}", cols, rows);
            return Err(GridError::InvalidDimensions { rows, cols });
        };
        self.grid.resize(r, c)
    }

    pub fn resize_cell_size(&mut self, size: i64) -> Result<(), GridError> {
        let Ok(size) = u32::try_from(size) else {
            warn!("Rejecting cell size {}", size);
            return Err(GridError::InvalidCellSize { size });
        };
        self.grid.resize_cell_size(size)
    }

    pub fn zoom(&mut self, factor: f32) {
        self.grid.zoom(factor);
    }

    pub fn zoom_in(&mut self) {
        self.grid.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.grid.zoom_out();
    }

    pub fn wheel_zoom(&mut self, delta: f32) {
        self.grid.wheel_zoom(delta);
    }

    pub fn reset_zoom(&mut self) {
        self.grid.reset_zoom();
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.grid.pan_by(dx, dy);
    }

    pub fn set_brush_area(&mut self, area: u32) {
        self.grid.set_brush_area(area);
    }

    pub fn increase_brush_area(&mut self) {
        self.grid.increase_brush_area();
    }

    pub fn decrease_brush_area(&mut self) {
        self.grid.decrease_brush_area();
    }

    pub fn encode_matrix(&self) -> String {
        tiler_codec::encode(&self.grid, &self.registry)
    }

    // Decode matrix text and replace the map with it
    pub fn decode_matrix(&mut self, text: &str) -> Result<ImportSummary, CodecError> {
        let decoded = tiler_codec::decode(text)?;
        tiler_codec::import_matrix(&decoded, &mut self.grid, &mut self.registry)
    }

    pub fn load_tiles<I, P>(&mut self, paths: I) -> LoadReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.registry.load(paths)
    }

    pub fn load_tiles_folder(&mut self, dir: &Path) -> Result<LoadReport, TileError> {
        let report = self.registry.load_folder(dir)?;
        self.tiles_folder = Some(dir.to_path_buf());
        Ok(report)
    }

    // Clear the grid and go back to the default size
    pub fn new_map(&mut self) {
        self.grid.clear();
    }

    pub fn save_matrix(&mut self, path: &Path) -> anyhow::Result<()> {
        tiler_codec::save_matrix(path, &self.grid, &self.registry)?;
        self.matrix_path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn import_matrix_file(&mut self, path: &Path) -> anyhow::Result<ImportSummary> {
        let decoded = tiler_codec::load_matrix(path)?;
        let summary = tiler_codec::import_matrix(&decoded, &mut self.grid, &mut self.registry)?;
        self.matrix_path = Some(path.to_path_buf());
        Ok(summary)
    }

    pub fn project_descriptor(&self) -> ProjectDescriptor {
        ProjectDescriptor::from_state(
            self.tiles_folder.as_deref(),
            self.matrix_path.as_deref(),
            &self.grid,
        )
    }

    pub fn export_project(&self, path: &Path) -> anyhow::Result<PathBuf> {
        tiler_codec::save_project(path, &self.project_descriptor())
    }

    pub fn import_project(&mut self, path: &Path) -> anyhow::Result<ProjectImport> {
        let descriptor = tiler_codec::load_project(path)?;
        let outcome = tiler_codec::import_project(&descriptor, &mut self.grid, &mut self.registry)?;
        if Path::new(&descriptor.tiles_folder).is_dir() {
            self.tiles_folder = Some(PathBuf::from(&descriptor.tiles_folder));
        }
        if outcome.matrix.is_some() {
            self.matrix_path = Some(PathBuf::from(&descriptor.map_matrix));
        }
        Ok(outcome)
    }

    pub fn set_tiles_folder(&mut self, dir: Option<PathBuf>) {
        self.tiles_folder = dir;
    }

    pub fn set_matrix_path(&mut self, path: Option<PathBuf>) {
        self.matrix_path = path;
    }

    pub fn tiles_folder(&self) -> Option<&Path> {
        self.tiles_folder.as_deref()
    }

    pub fn matrix_path(&self) -> Option<&Path> {
        self.matrix_path.as_deref()
    }

    // Pointer tracking for the preview, shift-drag paints
    pub fn pointer_moved(&mut self, x: f32, y: f32, shift: bool) -> usize {
        self.pointer = Some(Point::new(x, y));
        if shift {
            return self.place(x, y);
        }
        0
    }

    pub fn pointer_pressed(&mut self, x: f32, y: f32) -> usize {
        self.pointer = Some(Point::new(x, y));
        self.place(x, y)
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    pub fn select_tile(&mut self, tile: TileId) {
        if let Some(t) = self.registry.get(tile) {
            debug!("Selected tile: {}", t.name);
            self.selection.clear();
            self.selected_tile = Some(tile);
        }
    }

    // Shift-click in the palette adds to the multi-selection instead
    pub fn add_to_selection(&mut self, tile: TileId) {
        if self.registry.get(tile).is_some() && !self.selection.contains(&tile) {
            self.selection.push(tile);
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.registry.ids();
        debug!("Selected all {} tiles", self.selection.len());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // The first picked tile decides the new state for the whole selection
    pub fn toggle_selection_solid(&mut self) -> Option<bool> {
        self.registry.toggle_solid(&self.selection)
    }

    // Solid checkbox: applies to the whole selection when the tile is part of it
    pub fn set_solid(&mut self, tile: TileId, solid: bool) {
        if self.selection.contains(&tile) {
            self.registry.set_solid_all(&self.selection, solid);
        } else {
            self.registry.set_solid(tile, solid);
        }
    }

    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let preview = self
            .selected_tile
            .zip(self.pointer)
            .map(|(tile, pointer)| Preview { tile, pointer });
        render(&self.grid, &self.registry, preview)
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u32 {
        self.grid.cols()
    }

    pub fn cell_size(&self) -> u32 {
        self.grid.cell_size()
    }

    pub fn scale(&self) -> f32 {
        self.grid.scale()
    }

    pub fn entries(&self) -> &[PlacementEntry] {
        self.grid.entries()
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    pub fn selected_tile(&self) -> Option<TileId> {
        self.selected_tile
    }

    pub fn selection(&self) -> &[TileId] {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn canvas_with_tiles(names: &[&str]) -> (MapCanvas, Vec<TileId>) {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = names
            .iter()
            .map(|n| {
                let p = dir.path().join(n);
                RgbaImage::new(16, 16).save(&p).unwrap();
                p
            })
            .collect();
        let mut canvas = MapCanvas::new();
        let report = canvas.load_tiles(&paths);
        (canvas, report.loaded)
    }

    #[test]
    fn test_place_without_selection() {
        let (mut canvas, _) = canvas_with_tiles(&["a.png"]);
        assert_eq!(canvas.place(8.0, 8.0), 0);
        assert!(canvas.entries().is_empty());
    }

    #[test]
    fn test_scenario_place_and_export() {
        let (mut canvas, ids) = canvas_with_tiles(&["T.png"]);
        canvas.select_tile(ids[0]);
        canvas.set_brush_area(1);
        canvas.pointer_pressed(8.0, 8.0);

        let text = canvas.encode_matrix();
        assert!(text.starts_with("[f:T.png, s:true], ., ., "));
    }

    #[test]
    fn test_shift_drag_paints() {
        let (mut canvas, ids) = canvas_with_tiles(&["a.png"]);
        canvas.select_tile(ids[0]);
        assert_eq!(canvas.pointer_moved(8.0, 8.0, false), 0);
        assert_eq!(canvas.pointer_moved(24.0, 8.0, true), 1);
        assert_eq!(canvas.grid().entry_at(1, 0), Some(ids[0]));
    }

    #[test]
    fn test_preview_follows_pointer() {
        let (mut canvas, ids) = canvas_with_tiles(&["a.png"]);
        canvas.select_tile(ids[0]);
        canvas.pointer_moved(8.0, 8.0, false);
        let with_preview = canvas.draw_commands();

        canvas.pointer_left();
        let without = canvas.draw_commands();
        assert_eq!(with_preview.len(), without.len() + 1);
    }

    #[test]
    fn test_resize_rejects_negative_input() {
        let mut canvas = MapCanvas::new();
        assert_eq!(
            canvas.resize(-2, 5),
            Err(GridError::InvalidDimensions { rows: -2, cols: 5 })
        );
        assert!(canvas.resize_cell_size(-1).is_err());
        assert!(canvas.resize_cell_size(0).is_err());
        assert_eq!(canvas.cell_size(), 16);
        canvas.resize(4, 6).unwrap();
        assert_eq!((canvas.rows(), canvas.cols()), (4, 6));
    }

    #[test]
    fn test_decode_matrix_replaces_map() {
        let (mut canvas, ids) = canvas_with_tiles(&["a.png"]);
        let summary = canvas.decode_matrix("[f:a.png, s:true], .\n., .").unwrap();
        assert_eq!(summary.placed, 1);
        assert_eq!((canvas.rows(), canvas.cols()), (2, 2));
        assert_eq!(canvas.grid().entry_at(0, 0), Some(ids[0]));

        assert!(canvas.decode_matrix("").is_err());
        assert_eq!((canvas.rows(), canvas.cols()), (2, 2));
    }

    #[test]
    fn test_selection_solid_toggle() {
        let (mut canvas, ids) = canvas_with_tiles(&["a.png", "b.png", "c.png"]);
        canvas.select_all();
        assert_eq!(canvas.selection().len(), 3);
        assert_eq!(canvas.toggle_selection_solid(), Some(false));
        assert!(canvas.registry().iter().all(|(_, t)| !t.solid));

        canvas.clear_selection();
        canvas.set_solid(ids[1], true);
        assert!(canvas.registry().get(ids[1]).unwrap().solid);
        assert!(!canvas.registry().get(ids[0]).unwrap().solid);
    }

    #[test]
    fn test_toggle_follows_first_picked_tile() {
        let (mut canvas, ids) = canvas_with_tiles(&["a.png", "b.png"]);
        canvas.set_solid(ids[0], false);
        canvas.add_to_selection(ids[1]);
        canvas.add_to_selection(ids[0]);
        canvas.add_to_selection(ids[1]);
        assert_eq!(canvas.selection(), &[ids[1], ids[0]]);

        assert_eq!(canvas.toggle_selection_solid(), Some(false));
        assert!(!canvas.registry().get(ids[0]).unwrap().solid);
        assert!(!canvas.registry().get(ids[1]).unwrap().solid);
    }

    #[test]
    fn test_project_export_import() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = dir.path().join("tiles");
        std::fs::create_dir_all(&tiles).unwrap();
        RgbaImage::new(16, 16).save(tiles.join("brick.png")).unwrap();

        let mut canvas = MapCanvas::new();
        canvas.load_tiles_folder(&tiles).unwrap();
        let brick = canvas.registry().find_by_name("brick.png").unwrap();
        canvas.resize(5, 7).unwrap();
        canvas.select_tile(brick);
        canvas.pointer_pressed(8.0, 8.0);
        let matrix = dir.path().join("map.txt");
        canvas.save_matrix(&matrix).unwrap();
        let project = canvas.export_project(&dir.path().join("demo")).unwrap();

        let mut reopened = MapCanvas::new();
        let outcome = reopened.import_project(&project).unwrap();
        assert_eq!(outcome.tiles.loaded.len(), 1);
        assert_eq!((reopened.rows(), reopened.cols()), (5, 7));
        assert_eq!(reopened.grid().entry_at(0, 0), Some(TileId(0)));
        assert_eq!(reopened.matrix_path(), Some(matrix.as_path()));
    }
}
