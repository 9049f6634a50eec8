use crate::field::FloatValue;
use crate::grid::GridAxis;
use thiserror::Error;

/// Error type for invalid grid, field and window operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RthermError {
    #[error("Grid {axis} axis has extent {extent}; mapping between grids needs at least two cells along each source axis")]
    DegenerateGrid { axis: GridAxis, extent: usize },
    #[error("Not enough time steps: the window configuration needs {required}, the field has {available}")]
    InsufficientData { required: usize, available: usize },
    #[error("Coordinate (row={row}, col={col}) lies outside a grid of {rows} rows and {cols} columns")]
    OutOfBounds {
        row: FloatValue,
        col: FloatValue,
        rows: usize,
        cols: usize,
    },
    #[error("Shape mismatch. Expected {expected}, got {found}")]
    ShapeMismatch { expected: String, found: String },
    #[error("Invalid window of {window_length} steps repeated {window_count} times; both must be at least 1")]
    InvalidWindow {
        window_length: usize,
        window_count: usize,
    },
    #[error("Invalid field shape: {0}")]
    InvalidShape(String),
}

/// Convenience type for `Result<T, RthermError>`.
pub type RthermResult<T> = Result<T, RthermError>;
