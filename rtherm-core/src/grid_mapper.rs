//! Coordinate mapping between two grids covering the same extent
//!
//! Both grids are assumed to span the same physical area with their first and
//! last cells anchored to the same locations. A cell index in the source grid is
//! therefore scaled independently along each axis:
//!
//! $$ r' = r \frac{R_{target} - 1}{R_{source} - 1}, \qquad c' = c \frac{C_{target} - 1}{C_{source} - 1} $$
//!
//! The first index maps to the first index and the last to the last.
//!
//! # Examples
//!
//! ```rust
//! use rtherm_core::grid::{GridIndex, GridPosition, GridShape};
//! use rtherm_core::grid_mapper::map;
//!
//! let fine = GridShape::new(2, 2);
//! let coarse = GridShape::new(4, 4);
//! let mapped = map(&[GridIndex::new(0, 0), GridIndex::new(1, 1)], fine, coarse).unwrap();
//! assert_eq!(mapped, vec![GridPosition::new(0.0, 0.0), GridPosition::new(3.0, 3.0)]);
//! ```

use crate::errors::{RthermError, RthermResult};
use crate::field::FloatValue;
use crate::grid::{GridAxis, GridIndex, GridPosition, GridShape};

/// Maps cell indices of a source grid into a target grid's index space
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridMapper {
    source: GridShape,
    target: GridShape,
}

impl GridMapper {
    /// Create a mapper between two grid shapes
    ///
    /// Fails with [`RthermError::DegenerateGrid`] if a source axis has fewer than
    /// two cells (the scale factor would divide by zero) or a target axis is empty.
    pub fn new(source: GridShape, target: GridShape) -> RthermResult<Self> {
        for axis in [GridAxis::Row, GridAxis::Column] {
            let extent = source.extent(axis);
            if extent < 2 {
                return Err(RthermError::DegenerateGrid { axis, extent });
            }
            let extent = target.extent(axis);
            if extent == 0 {
                return Err(RthermError::DegenerateGrid { axis, extent });
            }
        }
        Ok(Self { source, target })
    }

    pub fn source(&self) -> GridShape {
        self.source
    }

    pub fn target(&self) -> GridShape {
        self.target
    }

    /// Map a single source cell into the target grid's index space
    pub fn map_index(&self, index: GridIndex) -> RthermResult<GridPosition> {
        if !self.source.contains(index) {
            return Err(RthermError::OutOfBounds {
                row: index.row as FloatValue,
                col: index.col as FloatValue,
                rows: self.source.rows,
                cols: self.source.cols,
            });
        }
        Ok(GridPosition::new(
            scale(index.row, self.source.rows, self.target.rows),
            scale(index.col, self.source.cols, self.target.cols),
        ))
    }

    /// Map every index, preserving order
    pub fn map_all(&self, indices: &[GridIndex]) -> RthermResult<Vec<GridPosition>> {
        indices.iter().map(|&index| self.map_index(index)).collect()
    }
}

/// Map `coords` from a grid of shape `source` into a grid of shape `target`
pub fn map(
    coords: &[GridIndex],
    source: GridShape,
    target: GridShape,
) -> RthermResult<Vec<GridPosition>> {
    GridMapper::new(source, target)?.map_all(coords)
}

// The numerator is formed before dividing so that the last source index lands
// exactly on the last target index.
fn scale(index: usize, source_extent: usize, target_extent: usize) -> FloatValue {
    (index as FloatValue * (target_extent - 1) as FloatValue) / (source_extent - 1) as FloatValue
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corners_map_to_corners() {
        let source = GridShape::new(2000, 5001);
        let target = GridShape::new(41, 107);
        let mapper = GridMapper::new(source, target).unwrap();

        let corners = [
            (GridIndex::new(0, 0), GridPosition::new(0.0, 0.0)),
            (GridIndex::new(0, 5000), GridPosition::new(0.0, 106.0)),
            (GridIndex::new(1999, 0), GridPosition::new(40.0, 0.0)),
            (GridIndex::new(1999, 5000), GridPosition::new(40.0, 106.0)),
        ];
        for (index, expected) in corners {
            assert_eq!(mapper.map_index(index).unwrap(), expected);
        }
    }

    #[test]
    fn test_axes_scale_independently() {
        let mapped = map(
            &[GridIndex::new(5, 5)],
            GridShape::new(11, 21),
            GridShape::new(3, 5),
        )
        .unwrap();
        assert_relative_eq!(mapped[0].row, 1.0);
        assert_relative_eq!(mapped[0].col, 1.0);
    }

    #[test]
    fn test_order_is_preserved() {
        let cells = [
            GridIndex::new(2, 0),
            GridIndex::new(0, 2),
            GridIndex::new(1, 1),
        ];
        let mapped = map(&cells, GridShape::new(3, 3), GridShape::new(5, 5)).unwrap();
        assert_eq!(
            mapped,
            vec![
                GridPosition::new(4.0, 0.0),
                GridPosition::new(0.0, 4.0),
                GridPosition::new(2.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_single_cell_target_collapses_to_origin() {
        let mapped = map(
            &[GridIndex::new(3, 3)],
            GridShape::new(4, 4),
            GridShape::new(1, 1),
        )
        .unwrap();
        assert_eq!(mapped[0], GridPosition::new(0.0, 0.0));
    }

    #[test]
    fn test_degenerate_source_axis() {
        let err = map(&[], GridShape::new(1, 4), GridShape::new(4, 4)).unwrap_err();
        assert_eq!(
            err,
            RthermError::DegenerateGrid {
                axis: GridAxis::Row,
                extent: 1
            }
        );

        let err = map(&[], GridShape::new(4, 1), GridShape::new(4, 4)).unwrap_err();
        assert_eq!(
            err,
            RthermError::DegenerateGrid {
                axis: GridAxis::Column,
                extent: 1
            }
        );
    }

    #[test]
    fn test_empty_target_axis() {
        let err = GridMapper::new(GridShape::new(4, 4), GridShape::new(4, 0)).unwrap_err();
        assert!(matches!(
            err,
            RthermError::DegenerateGrid {
                axis: GridAxis::Column,
                extent: 0
            }
        ));
    }

    #[test]
    fn test_index_outside_source() {
        let mapper = GridMapper::new(GridShape::new(3, 3), GridShape::new(5, 5)).unwrap();
        let err = mapper.map_index(GridIndex::new(3, 0)).unwrap_err();
        assert!(matches!(err, RthermError::OutOfBounds { rows: 3, cols: 3, .. }));
    }
}
