use contours::errors::TerrainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terrain error: {0}")]
    Terrain(#[from] TerrainError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid viewport {0:?}, expected WIDTHxHEIGHT")]
    InvalidViewport(String),
}

pub type Result<T, E = StudioError> = std::result::Result<T, E>;
