use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("Resolution must be at least 2, got {0}")]
    InvalidResolution(usize),

    #[error("Max height must be a positive finite number, got {0}")]
    InvalidMaxHeight(f64),

    #[error("Contour interval must be a positive finite number, got {0}")]
    InvalidContourInterval(f64),

    #[error("Vertical exaggeration must be a positive finite number, got {0}")]
    InvalidExaggeration(f64),

    #[error("Unknown terrain type: {0}")]
    UnknownTerrain(String),

    #[error("Unknown render style: {0}")]
    UnknownRenderStyle(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = TerrainError> = std::result::Result<T, E>;
