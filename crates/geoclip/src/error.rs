use thiserror::Error;

/// Result type for clipping operations
pub type Result<T> = std::result::Result<T, ClipError>;

/// Contract violations rejected at the entry of a clip operation.
///
/// Geometry that lies outside the window is never an error; it simply
/// produces empty output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClipError {
    #[error("Invalid bounds: x [{x_min}, {x_max}], y [{y_min}, {y_max}] must be finite with min <= max")]
    InvalidBounds { x_min: f64, x_max: f64, y_min: f64, y_max: f64 },

    #[error("Bounds x [{x_min}, {x_max}], y [{y_min}, {y_max}] fall outside the coordinate domain")]
    BoundsOutsideDomain { x_min: f64, x_max: f64, y_min: f64, y_max: f64 },

    #[error("Too few vertices: need at least {needed}, got {got}")]
    TooFewVertices { needed: usize, got: usize },

    #[error("Polyline {polyline} has a vertex count of zero")]
    ZeroCount { polyline: usize },

    #[error("Vertex counts sum to {counted} but {vertices} vertices were supplied")]
    CountMismatch { counted: usize, vertices: usize },

    #[error("Interleaved coordinate array has odd length {0}")]
    OddCoordinateCount(usize),

    #[error("Non-finite coordinate at vertex {index}")]
    NonFiniteCoordinate { index: usize },

    #[error("Invalid resolution {0}: must be finite and >= 0")]
    InvalidResolution(f64),

    #[error("Output buffer too small: need {needed} vertices, got {got}")]
    OutputTooSmall { needed: usize, got: usize },
}
