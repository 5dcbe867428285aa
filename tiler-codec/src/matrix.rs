//! Map matrix text format.
//!
//! One line per grid row, cells separated by `", "`:
//! - `.` (or nothing) is an empty cell
//! - `[f:<tile name>, s:<true|false>]` is an occupied cell
//!
//! The column count comes from the first line only. Later lines are not checked
//! against it; cells past the last column are dropped when importing.

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info, trace, warn};

use tiler_core::{PlacementGrid, TileRegistry};

use crate::CodecError;

const EMPTY_CELL: &str = ".";
const CELL_SEPARATOR: &str = ", ";

/// One occupied cell read back from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCell {
    pub row: u32,
    pub col: u32,
    pub name: String,
    pub solid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMatrix {
    pub rows: u32,
    pub cols: u32,
    pub cells: Vec<DecodedCell>,
}

/// What an import actually placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub placed: usize,
    /// Cells naming tiles the registry does not know.
    pub unresolved: usize,
}

/// Serialize the grid's current placements. Every row ends with `\n`.
pub fn encode(grid: &PlacementGrid, registry: &TileRegistry) -> String {
    let (rows, cols) = (grid.rows() as usize, grid.cols() as usize);
    let mut matrix = vec![vec![EMPTY_CELL.to_string(); cols]; rows];

    for entry in grid.entries() {
        let (row, col) = (entry.coord.row as usize, entry.coord.col as usize);
        if row >= rows || col >= cols {
            continue;
        }
        match registry.get(entry.tile) {
            // f = file name, s = solid
            Some(tile) => matrix[row][col] = format!("[f:{}, s:{}]", tile.name, tile.solid),
            None => warn!(tile = entry.tile.0, "placed tile missing from registry"),
        }
    }

    let mut out = String::new();
    for line in matrix {
        out.push_str(&line.join(CELL_SEPARATOR));
        out.push('\n');
    }
    debug!(rows, cols, "encoded map matrix");
    out
}

/// Parse matrix text. Fails only when there is no usable first line.
pub fn decode(text: &str) -> Result<DecodedMatrix, CodecError> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let rows = lines.len();
    let cols = lines.first().map(|l| split_cells(l).len()).unwrap_or(0);
    if rows == 0 || cols == 0 {
        warn!(rows, cols, "rejecting empty map matrix");
        return Err(CodecError::EmptyMatrix);
    }

    let mut cells = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let line_cells = split_cells(line);
        if line_cells.len() != cols {
            debug!(row, expected = cols, found = line_cells.len(), "ragged matrix row");
        }
        for (col, cell) in line_cells.into_iter().enumerate() {
            if let Some((name, solid)) = parse_cell(cell) {
                trace!(row, col, name = %name, solid, "decoded cell");
                cells.push(DecodedCell {
                    row: row as u32,
                    col: col as u32,
                    name,
                    solid,
                });
            }
        }
    }

    debug!(rows, cols, occupied = cells.len(), "decoded map matrix");
    Ok(DecodedMatrix {
        rows: rows as u32,
        cols: cols as u32,
        cells,
    })
}

/// Replace the grid's contents with a decoded matrix.
///
/// The grid is resized to the matrix dimensions (dropping entries and history),
/// then every cell whose name resolves in `registry` is placed without history.
/// The decoded solid flag is written back to the tile.
pub fn import_matrix(
    decoded: &DecodedMatrix,
    grid: &mut PlacementGrid,
    registry: &mut TileRegistry,
) -> Result<ImportSummary, CodecError> {
    if decoded.rows == 0 || decoded.cols == 0 {
        return Err(CodecError::EmptyMatrix);
    }
    grid.resize(decoded.rows, decoded.cols)?;

    let mut summary = ImportSummary::default();
    for cell in &decoded.cells {
        let Some(id) = registry.find_by_name(&cell.name) else {
            debug!(name = %cell.name, "matrix names an unknown tile, dropping");
            summary.unresolved += 1;
            continue;
        };
        registry.set_solid(id, cell.solid);
        summary.placed += grid.place_cell(cell.col, cell.row, id, 1, false);
    }

    info!(
        rows = decoded.rows,
        cols = decoded.cols,
        placed = summary.placed,
        unresolved = summary.unresolved,
        "map matrix imported"
    );
    Ok(summary)
}

/// Write the grid as a map matrix file.
pub fn save_matrix(
    path: impl AsRef<Path>,
    grid: &PlacementGrid,
    registry: &TileRegistry,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }
    fs::write(path, encode(grid, registry))
        .with_context(|| format!("write map matrix: {}", path.display()))?;
    info!(path = %path.display(), "map matrix saved");
    Ok(())
}

/// Read and decode a map matrix file.
pub fn load_matrix(path: impl AsRef<Path>) -> anyhow::Result<DecodedMatrix> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("read map matrix: {}", path.display()))?;
    let decoded = decode(&text).with_context(|| format!("parse map matrix: {}", path.display()))?;
    Ok(decoded)
}

// `[...]` with no nested brackets
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]]+\]").expect("token pattern compiles"));
static WHOLE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\[\]]+\]$").expect("token pattern compiles"));
static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"f:([^,\]]+)").expect("name pattern compiles"));
static SOLID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"s:(true|false)").expect("solid pattern compiles"));

// Split a row on commas that sit outside `[...]` tokens.
fn split_cells(line: &str) -> Vec<&str> {
    if line.trim().is_empty() {
        return Vec::new();
    }

    let tokens: Vec<Range<usize>> = TOKEN.find_iter(line).map(|m| m.range()).collect();
    let mut cells = Vec::new();
    let mut start = 0;
    for (i, _) in line.match_indices(',') {
        if tokens.iter().any(|t| t.contains(&i)) {
            continue;
        }
        cells.push(line[start..i].trim());
        start = i + 1;
    }
    cells.push(line[start..].trim());
    cells
}

// `[f:name, s:true]` -> ("name", true). Empty and unrecognised cells give None.
fn parse_cell(cell: &str) -> Option<(String, bool)> {
    if cell.is_empty() || cell == EMPTY_CELL {
        return None;
    }
    if !WHOLE_TOKEN.is_match(cell) {
        warn!(cell, "malformed matrix cell");
        return None;
    }

    let name = NAME.captures(cell)?.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    let solid = SOLID
        .captures(cell)
        .and_then(|c| c.get(1))
        .is_some_and(|m| m.as_str() == "true");

    Some((name.to_string(), solid))
}
