use lux_core::SceneError;
use thiserror::Error;

/// Errors surfaced by the renderer's public entry points.
///
/// Numeric degeneracies during tracing are never errors; they only end the
/// contribution of the current sample.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("render worker panicked")]
    WorkerPanicked,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
