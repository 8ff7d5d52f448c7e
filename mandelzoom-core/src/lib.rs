pub mod complex;
pub mod error;
pub mod escape;
pub mod viewport;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use escape::{escape_time, evaluate, EscapeTime};
pub use viewport::ViewportModel;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
