//! tiler-codec: text and JSON persistence for tile maps.
//!
//! Design rules:
//! - The map matrix is plain UTF-8 text, one line per grid row.
//! - Decoding never touches a grid; importing validates before it mutates.
//! - Tile names are resolved against the live registry at import time.
//! - Project descriptors are small JSON snapshots, not owned by the grid.

use thiserror::Error;
use tiler_core::{ErrorKind, GridError};

/// File extension for exported map matrices.
pub const MATRIX_FILE_EXT: &str = "txt";

/// File extension for saved projects.
pub const PROJECT_FILE_EXT: &str = "tiling.json";

/// Errors raised while decoding or applying persisted maps and projects.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("map matrix has no rows or no columns")]
    EmptyMatrix,

    #[error("invalid project json: {0}")]
    Project(#[source] serde_json::Error),

    #[error("invalid project value: {field}={value}")]
    InvalidDescriptor { field: &'static str, value: u32 },

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::EmptyMatrix | CodecError::Project(_) => ErrorKind::Format,
            CodecError::InvalidDescriptor { .. } | CodecError::Grid(_) => ErrorKind::Validation,
        }
    }
}

pub mod matrix;
pub mod project;

pub use matrix::{
    decode, encode, import_matrix, load_matrix, save_matrix, DecodedCell, DecodedMatrix,
    ImportSummary,
};
pub use project::{
    decode_project, encode_project, import_project, load_project, save_project, ProjectDescriptor,
    ProjectImport,
};
