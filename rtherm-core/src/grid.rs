//! Grid shapes and coordinates
//!
//! Every location in this crate is a row-major pair with named fields. Integer
//! cell locations are [`GridIndex`]; fractional locations in some grid's index
//! space are [`GridPosition`]. The only way to go from one to the other is
//! [`GridIndex::to_position`] (or a [`GridMapper`](crate::grid_mapper::GridMapper)
//! when the two grids differ), so row/column and x/y are never swapped by accident.
//!
//! # Examples
//!
//! ```rust
//! use rtherm_core::grid::{GridIndex, GridShape};
//!
//! let shape = GridShape::new(41, 107);
//! assert_eq!(shape.len(), 41 * 107);
//! assert!(shape.contains(GridIndex::new(40, 106)));
//! assert!(!shape.contains(GridIndex::new(41, 0)));
//!
//! let position = GridIndex::new(3, 7).to_position();
//! assert_eq!(position.row, 3.0);
//! assert_eq!(position.col, 7.0);
//! ```

use crate::field::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two spatial axes of a grid
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridAxis {
    Row,
    Column,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAxis::Row => write!(f, "row"),
            GridAxis::Column => write!(f, "column"),
        }
    }
}

/// Spatial extent of a grid, in cells
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Extent along a single axis
    pub fn extent(&self, axis: GridAxis) -> usize {
        match axis {
            GridAxis::Row => self.rows,
            GridAxis::Column => self.cols,
        }
    }

    /// Whether `index` addresses a cell of this grid
    pub fn contains(&self, index: GridIndex) -> bool {
        index.row < self.rows && index.col < self.cols
    }
}

impl From<(usize, usize)> for GridShape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::new(rows, cols)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Integer cell location within a grid
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

impl GridIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The same location expressed as a fractional position in the same grid
    pub fn to_position(self) -> GridPosition {
        GridPosition::new(self.row as FloatValue, self.col as FloatValue)
    }
}

impl From<GridIndex> for GridPosition {
    fn from(index: GridIndex) -> Self {
        index.to_position()
    }
}

/// Fractional location in a grid's index space
///
/// `row` runs along the first array axis (y), `col` along the second (x).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: FloatValue,
    pub col: FloatValue,
}

impl GridPosition {
    pub fn new(row: FloatValue, col: FloatValue) -> Self {
        Self { row, col }
    }
}
