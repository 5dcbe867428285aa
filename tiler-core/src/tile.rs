//! Tile registry: owns every loaded tile image for the session.
//!
//! A tile's file name is its identity. Loading a file whose name is already
//! registered is a no-op, and tiles are never removed, so `TileId`s stay valid
//! for the lifetime of the registry.

use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::ErrorKind;

/// Extension of tile images picked up by folder loads.
pub const TILE_IMAGE_EXT: &str = "png";

/// Stable handle to a tile inside a `TileRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

#[derive(Debug, Clone)]
pub struct Tile {
    pub name: String,
    pub image: RgbaImage,
    pub solid: bool,
}

impl Tile {
    /// New tiles start out solid.
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
            solid: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A file that could not be turned into a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a batch load. Skipped duplicates appear in neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<TileId>,
    pub failures: Vec<LoadFailure>,
}

#[derive(Debug, Error)]
pub enum TileError {
    #[error("failed to decode tile image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TileError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Decode
    }
}

#[derive(Debug, Default)]
pub struct TileRegistry {
    tiles: Vec<Tile>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile name derived from a path: its file name.
    pub fn name_for(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
    }

    /// Load a batch of image files.
    ///
    /// Already-known names are skipped silently. A file that fails to decode is
    /// recorded in `failures` and the rest of the batch carries on.
    pub fn load<I, P>(&mut self, paths: I) -> LoadReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = LoadReport::default();

        for path in paths {
            let path = path.as_ref();
            let name = Self::name_for(path);

            if self.find_by_name(&name).is_some() {
                debug!(name = %name, "tile already loaded, skipping");
                continue;
            }

            match decode_file(path) {
                Ok(image) => {
                    let id = self.push(Tile::new(name, image));
                    report.loaded.push(id);
                }
                Err(err) => {
                    error!(path = %path.display(), error = %err, "failed to load tile");
                    report.failures.push(LoadFailure {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            total = self.tiles.len(),
            "tile batch loaded"
        );
        report
    }

    /// Load every `.png` directly inside `dir`, in file name order.
    pub fn load_folder(&mut self, dir: impl AsRef<Path>) -> Result<LoadReport, TileError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| TileError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_tile_extension(p))
            .collect();
        paths.sort();

        debug!(dir = %dir.display(), files = paths.len(), "loading tile folder");
        Ok(self.load(paths))
    }

    /// Register an already-decoded image. Returns `None` if the name is taken.
    pub fn insert(&mut self, name: impl Into<String>, image: RgbaImage) -> Option<TileId> {
        let name = name.into();
        if self.find_by_name(&name).is_some() {
            debug!(name = %name, "tile already loaded, skipping insert");
            return None;
        }
        Some(self.push(Tile::new(name, image)))
    }

    fn push(&mut self, tile: Tile) -> TileId {
        let id = TileId(self.tiles.len());
        trace!(name = %tile.name, id = id.0, "registering tile");
        self.tiles.push(tile);
        id
    }

    pub fn find_by_name(&self, name: &str) -> Option<TileId> {
        self.tiles.iter().position(|t| t.name == name).map(TileId)
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    pub fn set_solid(&mut self, id: TileId, solid: bool) -> bool {
        match self.tiles.get_mut(id.0) {
            Some(tile) => {
                tile.solid = solid;
                true
            }
            None => {
                warn!(id = id.0, "set_solid on unknown tile");
                false
            }
        }
    }

    pub fn set_solid_all(&mut self, ids: &[TileId], solid: bool) {
        for &id in ids {
            self.set_solid(id, solid);
        }
    }

    /// Flip the solid flag of a group: the new state is the negation of the
    /// first tile's state, applied to all of them. Returns the new state.
    pub fn toggle_solid(&mut self, ids: &[TileId]) -> Option<bool> {
        let first = ids.first().and_then(|&id| self.get(id))?;
        let new_state = !first.solid;
        self.set_solid_all(ids, new_state);
        debug!(count = ids.len(), solid = new_state, "toggled solid state");
        Some(new_state)
    }

    /// Tiles with their ids, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles.iter().enumerate().map(|(i, t)| (TileId(i), t))
    }

    pub fn ids(&self) -> Vec<TileId> {
        (0..self.tiles.len()).map(TileId).collect()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

fn has_tile_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(TILE_IMAGE_EXT))
        .unwrap_or(false)
}

fn decode_file(path: &Path) -> Result<RgbaImage, TileError> {
    let bytes = fs::read(path).map_err(|source| TileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| TileError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}
