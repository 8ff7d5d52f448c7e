use thiserror::Error;

/// Errors originating from the core navigation and iteration model.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid zoom factor: {0} (must be > 0 and finite)")]
    InvalidZoomFactor(f64),

    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid viewport bounds: {reason}")]
    InvalidBounds { reason: String },
}
