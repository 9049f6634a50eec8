//! Bilinear sampling of a scalar field at fractional grid positions
//!
//! A query at `(row, col)` = `(y, x)` reads the four surrounding cells
//!
//! ```text
//!   (y1, x1) f11 ---- f12 (y1, x2)
//!            |         |
//!   (y2, x1) f21 ---- f22 (y2, x2)
//! ```
//!
//! with `y1 = floor(y)`, `y2 = min(y1 + 1, rows - 1)` and likewise for `x`, and
//! combines them with weights `(1 - t, t)` along each axis, where `t` is the
//! distance past the lower neighbour. Inside the grid this is the usual
//! `(y2 - y, y - y1)` weighting. On the last row or column the two neighbours
//! coincide and the weights collapse to `(1, 0)`, so a query on the edge returns
//! the edge value.
//!
//! # Examples
//!
//! ```rust
//! use ndarray::array;
//! use rtherm_core::bilinear::sample;
//! use rtherm_core::field::ScalarField2D;
//! use rtherm_core::grid::GridPosition;
//!
//! let field = ScalarField2D::from_array(array![[0.0, 2.0], [4.0, 6.0]]).unwrap();
//! let values = sample(
//!     &field,
//!     &[GridPosition::new(0.0, 0.5), GridPosition::new(0.5, 0.5), GridPosition::new(1.0, 1.0)],
//! )
//! .unwrap();
//! assert_eq!(values, vec![1.0, 3.0, 6.0]);
//! ```

use crate::errors::{RthermError, RthermResult};
use crate::field::{FloatValue, ScalarField2D};
use crate::grid::GridPosition;
use serde::{Deserialize, Serialize};

/// Distance outside the grid that [`BoundsPolicy::Strict`] still clamps onto the edge
pub const CLAMP_TOLERANCE: FloatValue = 1e-6;

/// How query positions outside `[0, rows - 1] x [0, cols - 1]` are handled
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Clamp positions within [`CLAMP_TOLERANCE`] of the grid, reject anything further out
    #[default]
    Strict,
    /// Clamp every position onto the nearest edge
    Clamp,
}

/// Samples a field at fractional positions using its four nearest cells
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BilinearSampler {
    bounds: BoundsPolicy,
}

impl BilinearSampler {
    pub fn new(bounds: BoundsPolicy) -> Self {
        Self { bounds }
    }

    pub fn bounds_policy(&self) -> BoundsPolicy {
        self.bounds
    }

    /// Interpolated value of `field` at a single position
    ///
    /// NaN positions are always rejected with [`RthermError::OutOfBounds`].
    pub fn sample_point(
        &self,
        field: &ScalarField2D,
        position: GridPosition,
    ) -> RthermResult<FloatValue> {
        let shape = field.shape();
        let out_of_bounds = || RthermError::OutOfBounds {
            row: position.row,
            col: position.col,
            rows: shape.rows,
            cols: shape.cols,
        };

        let y = self
            .clamp_axis(position.row, shape.rows)
            .ok_or_else(out_of_bounds)?;
        let x = self
            .clamp_axis(position.col, shape.cols)
            .ok_or_else(out_of_bounds)?;

        let (y1, y2, ty) = neighbours(y, shape.rows);
        let (x1, x2, tx) = neighbours(x, shape.cols);

        let data = field.view();
        let along_row = |y: usize| lerp(data[[y, x1]], data[[y, x2]], tx);
        Ok(lerp(along_row(y1), along_row(y2), ty))
    }

    /// Interpolated values at every position, in input order
    ///
    /// The first position that cannot be sampled aborts the whole call.
    pub fn sample(
        &self,
        field: &ScalarField2D,
        positions: &[GridPosition],
    ) -> RthermResult<Vec<FloatValue>> {
        #[cfg(feature = "parallel")]
        use rayon::prelude::*;

        #[cfg(feature = "parallel")]
        let positions = positions.par_iter();
        #[cfg(not(feature = "parallel"))]
        let positions = positions.iter();

        positions
            .map(|&position| self.sample_point(field, position))
            .collect()
    }

    fn clamp_axis(&self, value: FloatValue, extent: usize) -> Option<FloatValue> {
        let max = (extent - 1) as FloatValue;
        if value.is_nan() {
            return None;
        }
        match self.bounds {
            BoundsPolicy::Strict if value < -CLAMP_TOLERANCE || value > max + CLAMP_TOLERANCE => {
                None
            }
            _ => Some(num::clamp(value, 0.0, max)),
        }
    }
}

/// Sample `field` at `coords` with the default [`BoundsPolicy`]
pub fn sample(field: &ScalarField2D, coords: &[GridPosition]) -> RthermResult<Vec<FloatValue>> {
    BilinearSampler::default().sample(field, coords)
}

/// `(1 - t) * lower + t * upper`, or exactly `lower` when `t` is zero
fn lerp(lower: FloatValue, upper: FloatValue, t: FloatValue) -> FloatValue {
    if t > 0.0 {
        lower * (1.0 - t) + upper * t
    } else {
        lower
    }
}

/// Lower neighbour, upper neighbour and the fractional distance past the lower one.
///
/// `value` must already lie in `[0, extent - 1]`. When it sits exactly on a cell
/// the upper neighbour is the cell itself.
fn neighbours(value: FloatValue, extent: usize) -> (usize, usize, FloatValue) {
    let lower = value.floor() as usize;
    let t = value - lower as FloatValue;
    let upper = if t > 0.0 {
        (lower + 1).min(extent - 1)
    } else {
        lower
    };
    (lower, upper, t)
}
