//! Error types for the reconstruction library

use thiserror::Error;

/// Result type for reconstruction operations
pub type Result<T> = std::result::Result<T, ReconError>;

#[derive(Error, Debug)]
pub enum ReconError {
    /// Two containers (or a container and a geometry) disagree on shape
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { expected: Vec<usize>, actual: Vec<usize> },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested operation is not defined for this function or operator
    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] ::image::ImageError),
}

impl ReconError {
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        ReconError::ShapeMismatch { expected: expected.to_vec(), actual: actual.to_vec() }
    }
}
