//! Error types for the voxdraw engine

use thiserror::Error;

use crate::voxel::brush::BrushError;
use crate::voxel::edit::DrawError;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Brush error: {0}")]
    Brush(#[from] BrushError),

    #[error("Draw error: {0}")]
    Draw(#[from] DrawError),
}
