use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("png encoding error: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] mandelzoom_core::CoreError),
}
