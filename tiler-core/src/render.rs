//! Render pipeline: turns grid + registry state into an ordered list of draw
//! commands. Rendering never mutates the grid.

use tracing::trace;

use crate::grid::PlacementGrid;
use crate::tile::{TileId, TileRegistry};
use crate::transform::{Point, Size};

/// Opacity of the brush preview.
pub const PREVIEW_ALPHA: f32 = 0.5;

/// Where the grid-size label goes, in device pixels.
pub const LABEL_POSITION: Point = Point::new(10.0, 20.0);

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Label { text: String, position: Point },
    Line { from: Point, to: Point },
    Tile {
        tile: TileId,
        /// Top-left corner in device pixels.
        position: Point,
        size: Size,
        alpha: f32,
    },
}

/// Brush preview request: the selected tile and the last pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview {
    pub tile: TileId,
    pub pointer: Point,
}

pub fn render(
    grid: &PlacementGrid,
    registry: &TileRegistry,
    preview: Option<Preview>,
) -> Vec<DrawCommand> {
    let t = grid.transform();
    let origin = t.origin_offset();
    let extent = t.grid_size_pixels();
    let cell = grid.cell_size() as f32 * grid.scale();

    let mut commands = Vec::with_capacity(
        1 + (grid.rows() + grid.cols() + 2) as usize + grid.entries().len(),
    );

    commands.push(DrawCommand::Label {
        text: format!("{}x{}", grid.cols(), grid.rows()),
        position: LABEL_POSITION,
    });

    for i in 0..=grid.cols() {
        let x = origin.x + i as f32 * cell;
        commands.push(DrawCommand::Line {
            from: Point::new(x, origin.y),
            to: Point::new(x, origin.y + extent.height),
        });
    }
    for i in 0..=grid.rows() {
        let y = origin.y + i as f32 * cell;
        commands.push(DrawCommand::Line {
            from: Point::new(origin.x, y),
            to: Point::new(origin.x + extent.width, y),
        });
    }

    let mut blit = |tile: TileId, col: u32, row: u32, alpha: f32| {
        // Ids from another registry draw nothing.
        let Some(image) = registry.get(tile) else {
            return;
        };
        let center = t.cell_center_to_device(col as i64, row as i64);
        let size = Size::new(
            image.width() as f32 * grid.scale(),
            image.height() as f32 * grid.scale(),
        );
        commands.push(DrawCommand::Tile {
            tile,
            position: Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size,
            alpha,
        });
    };

    for entry in grid.entries() {
        blit(entry.tile, entry.coord.col, entry.coord.row, 1.0);
    }

    if let Some(preview) = preview {
        for coord in grid.brush_footprint(preview.pointer.x, preview.pointer.y) {
            blit(preview.tile, coord.col, coord.row, PREVIEW_ALPHA);
        }
    }

    trace!(commands = commands.len(), "rendered");
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn setup() -> (PlacementGrid, TileRegistry, TileId) {
        let mut registry = TileRegistry::new();
        let id = registry.insert("t.png", RgbaImage::new(16, 16)).unwrap();
        (PlacementGrid::new(), registry, id)
    }

    fn count_lines(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    #[test]
    fn test_grid_lines_then_tiles() {
        let (mut grid, registry, id) = setup();
        grid.resize(3, 5).unwrap();
        grid.place_cell(1, 2, id, 1, true);

        let commands = render(&grid, &registry, None);
        assert_eq!(
            commands[0],
            DrawCommand::Label {
                text: "5x3".into(),
                position: LABEL_POSITION
            }
        );
        assert_eq!(count_lines(&commands), 6 + 4);
        assert_eq!(
            commands.last(),
            Some(&DrawCommand::Tile {
                tile: id,
                position: Point::new(16.0, 32.0),
                size: Size::new(16.0, 16.0),
                alpha: 1.0,
            })
        );
    }

    #[test]
    fn test_small_image_is_centered() {
        let mut registry = TileRegistry::new();
        let id = registry.insert("small.png", RgbaImage::new(8, 8)).unwrap();
        let mut grid = PlacementGrid::new();
        grid.place_cell(0, 0, id, 1, true);

        let commands = render(&grid, &registry, None);
        let Some(DrawCommand::Tile { position, size, .. }) = commands.last() else {
            panic!("expected a tile blit");
        };
        assert_eq!(*position, Point::new(4.0, 4.0));
        assert_eq!(*size, Size::new(8.0, 8.0));
    }

    #[test]
    fn test_preview_only_inside_grid() {
        let (mut grid, registry, id) = setup();
        grid.set_brush_area(2);

        let inside = render(
            &grid,
            &registry,
            Some(Preview {
                tile: id,
                pointer: Point::new(8.0, 8.0),
            }),
        );
        let previews = inside
            .iter()
            .filter(|c| matches!(c, DrawCommand::Tile { alpha, .. } if *alpha < 1.0))
            .count();
        assert_eq!(previews, 4);

        let outside = render(
            &grid,
            &registry,
            Some(Preview {
                tile: id,
                pointer: Point::new(-50.0, 8.0),
            }),
        );
        assert!(!outside
            .iter()
            .any(|c| matches!(c, DrawCommand::Tile { .. })));
    }

    #[test]
    fn test_render_does_not_mutate() {
        let (mut grid, registry, id) = setup();
        grid.place_cell(2, 2, id, 2, true);
        let before = grid.entries().to_vec();
        let history = grid.history_len();

        render(&grid, &registry, Some(Preview { tile: id, pointer: Point::new(1.0, 1.0) }));
        assert_eq!(grid.entries(), before.as_slice());
        assert_eq!(grid.history_len(), history);
    }
}
