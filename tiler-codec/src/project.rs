//! Project descriptors: where the tiles and the map matrix live, plus the grid
//! dimensions. Saved as pretty JSON next to the map.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use tiler_core::{
    LoadReport, PlacementGrid, TileRegistry, DEFAULT_CELL_SIZE, DEFAULT_GRID_COLS,
    DEFAULT_GRID_ROWS,
};

use crate::matrix::{import_matrix, load_matrix, ImportSummary};
use crate::{CodecError, PROJECT_FILE_EXT};

/// Missing keys fall back to empty paths and the default grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDescriptor {
    pub tiles_folder: String,
    pub map_matrix: String,
    pub grid_rows: u32,
    pub grid_cols: u32,
    pub cell_size: u32,
}

impl Default for ProjectDescriptor {
    fn default() -> Self {
        Self {
            tiles_folder: String::new(),
            map_matrix: String::new(),
            grid_rows: DEFAULT_GRID_ROWS,
            grid_cols: DEFAULT_GRID_COLS,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl ProjectDescriptor {
    /// Snapshot the live grid dimensions alongside the given paths.
    pub fn from_state(
        tiles_folder: Option<&Path>,
        map_matrix: Option<&Path>,
        grid: &PlacementGrid,
    ) -> Self {
        let display = |p: Option<&Path>| {
            p.map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        Self {
            tiles_folder: display(tiles_folder),
            map_matrix: display(map_matrix),
            grid_rows: grid.rows(),
            grid_cols: grid.cols(),
            cell_size: grid.cell_size(),
        }
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        let fields = [
            ("grid_rows", self.grid_rows),
            ("grid_cols", self.grid_cols),
            ("cell_size", self.cell_size),
        ];
        for (field, value) in fields {
            if value == 0 {
                tracing::error!(field, value, "project value must be positive");
                return Err(CodecError::InvalidDescriptor { field, value });
            }
        }
        Ok(())
    }
}

/// Serialize with two-space indentation.
pub fn encode_project(descriptor: &ProjectDescriptor) -> Result<String, CodecError> {
    serde_json::to_string_pretty(descriptor).map_err(CodecError::Project)
}

pub fn decode_project(text: &str) -> Result<ProjectDescriptor, CodecError> {
    serde_json::from_str(text).map_err(|err| {
        warn!(error = %err, "rejecting project json");
        CodecError::Project(err)
    })
}

/// Save a project, adding the `.tiling.json` extension when it is missing.
/// Returns the path actually written.
pub fn save_project(
    path: impl AsRef<Path>,
    descriptor: &ProjectDescriptor,
) -> anyhow::Result<PathBuf> {
    let mut path = path.as_ref().to_path_buf();
    let suffix = format!(".{PROJECT_FILE_EXT}");
    if !path.to_string_lossy().ends_with(&suffix) {
        let mut name = path.clone().into_os_string();
        name.push(&suffix);
        path = PathBuf::from(name);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let json = encode_project(descriptor).context("serialize project to json")?;
    fs::write(&path, json).with_context(|| format!("write project file: {}", path.display()))?;
    info!(path = %path.display(), "project saved");
    Ok(path)
}

pub fn load_project(path: impl AsRef<Path>) -> anyhow::Result<ProjectDescriptor> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read project file: {}", path.display()))?;
    let descriptor = decode_project(&data).context("parse project json")?;
    Ok(descriptor)
}

/// What a project import loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectImport {
    pub tiles: LoadReport,
    pub matrix: Option<ImportSummary>,
}

/// Apply a descriptor to a live grid and registry.
///
/// Everything that can fail (validation, reading and decoding the map matrix)
/// happens before the grid is touched. Paths that are empty or missing on
/// disk are skipped. When a map matrix is present its dimensions win over the
/// descriptor's.
pub fn import_project(
    descriptor: &ProjectDescriptor,
    grid: &mut PlacementGrid,
    registry: &mut TileRegistry,
) -> anyhow::Result<ProjectImport> {
    descriptor.validate()?;

    let matrix_path = existing(&descriptor.map_matrix, "map matrix");
    let decoded = matrix_path.as_deref().map(|p| load_matrix(p)).transpose()?;

    let mut outcome = ProjectImport::default();
    if let Some(folder) = existing(&descriptor.tiles_folder, "tiles folder") {
        outcome.tiles = registry
            .load_folder(&folder)
            .with_context(|| format!("load tiles folder: {}", folder.display()))?;
    }

    grid.resize_cell_size(descriptor.cell_size)?;
    grid.resize(descriptor.grid_rows, descriptor.grid_cols)?;

    if let Some(decoded) = decoded {
        outcome.matrix = Some(import_matrix(&decoded, grid, registry)?);
    }

    info!(
        tiles = outcome.tiles.loaded.len(),
        rows = grid.rows(),
        cols = grid.cols(),
        cell_size = grid.cell_size(),
        "project imported"
    );
    Ok(outcome)
}

fn existing(path: &str, what: &str) -> Option<PathBuf> {
    if path.is_empty() {
        debug!(what, "no path in project, skipping");
        return None;
    }
    let path = PathBuf::from(path);
    if !path.exists() {
        warn!(what, path = %path.display(), "project path does not exist, skipping");
        return None;
    }
    Some(path)
}
