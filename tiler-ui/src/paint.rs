// Turns engine draw commands into egui shapes
// Text needs the font system, so labels are handed back for the caller to paint

use std::collections::HashMap;

use egui::{pos2, vec2, Color32, Pos2, Rect, Shape, Stroke, TextureId, Vec2};
use tiler_core::{DrawCommand, Point, TileId};
use tracing::trace;

use crate::style::EditorStyle;

#[derive(Debug, Default)]
pub struct PaintList {
    pub shapes: Vec<Shape>,
    pub labels: Vec<(Pos2, String)>,
}

fn to_pos(offset: Vec2, p: Point) -> Pos2 {
    pos2(p.x, p.y) + offset
}

/// Convert draw commands into shapes, keeping their order. `offset` is the
/// screen position of the canvas' top-left corner.
pub fn to_shapes(
    commands: &[DrawCommand],
    style: &EditorStyle,
    textures: &HashMap<TileId, TextureId>,
    offset: Vec2,
) -> PaintList {
    let mut out = PaintList::default();
    let stroke = Stroke::new(style.grid_line_width, style.grid_line);
    let full_uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));

    for command in commands {
        match command {
            DrawCommand::Label { text, position } => {
                out.labels.push((to_pos(offset, *position), text.clone()));
            }
            DrawCommand::Line { from, to } => {
                out.shapes.push(Shape::line_segment(
                    [to_pos(offset, *from), to_pos(offset, *to)],
                    stroke,
                ));
            }
            DrawCommand::Tile {
                tile,
                position,
                size,
                alpha,
            } => {
                let Some(texture) = textures.get(tile) else {
                    trace!("No texture uploaded for {:?}", tile);
                    continue;
                };
                let rect =
                    Rect::from_min_size(to_pos(offset, *position), vec2(size.width, size.height));
                let tint = Color32::WHITE.gamma_multiply(*alpha);
                out.shapes.push(Shape::image(*texture, rect, full_uv, tint));
            }
        }
    }
    out
}
