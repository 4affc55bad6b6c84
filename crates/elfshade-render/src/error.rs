//! Error types for elfshade-render

use thiserror::Error;

/// Result type alias using the render Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up or writing frames
#[derive(Error, Debug)]
pub enum Error {
    /// Kernel configuration was rejected
    #[error(transparent)]
    Core(#[from] elfshade_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode or encode failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Settings file could not be parsed or written
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// No scene with this name
    #[error("Unknown scene '{0}' (try `elfshade scenes`)")]
    UnknownScene(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
