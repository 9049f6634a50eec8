//! Shape-checked scalar fields
//!
//! [`ScalarField2D`] holds a single grid of values (one aggregated period, or a
//! land-cover classification) and [`ScalarField3D`] holds a time-major stack of
//! grids indexed `[t][row][col]`. Both own their data, carry their own shape and
//! refuse to be built from data that does not match it. Neither exposes mutable
//! access once constructed.
//!
//! # Examples
//!
//! ```rust
//! use rtherm_core::field::{ScalarField2D, ScalarField3D};
//! use rtherm_core::grid::{GridIndex, GridShape};
//!
//! let layer = ScalarField2D::from_shape_vec(GridShape::new(2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(layer.get(GridIndex::new(1, 0)), Some(&3.0));
//!
//! let hourly = ScalarField3D::from_layers(vec![layer.clone(), layer]).unwrap();
//! assert_eq!(hourly.steps(), 2);
//! assert_eq!(hourly.grid_shape(), GridShape::new(2, 2));
//! ```

use crate::errors::{RthermError, RthermResult};
use crate::grid::{GridIndex, GridShape};
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

/// Floating point type used for temperatures and fractional coordinates
pub type FloatValue = f64;

/// A two-dimensional grid of values with shape `(rows, cols)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldData<Array2<T>>")]
pub struct ScalarField2D<T = FloatValue> {
    data: Array2<T>,
}

impl<T> ScalarField2D<T> {
    /// Wrap an existing array
    ///
    /// Fails if either axis is empty.
    pub fn from_array(data: Array2<T>) -> RthermResult<Self> {
        let (rows, cols) = data.dim();
        ensure_not_empty(&[rows, cols])?;
        Ok(Self { data })
    }

    /// Build a field from row-major values
    pub fn from_shape_vec(shape: GridShape, values: Vec<T>) -> RthermResult<Self> {
        if values.len() != shape.len() {
            return Err(RthermError::ShapeMismatch {
                expected: format!("{} values for a {} grid", shape.len(), shape),
                found: format!("{} values", values.len()),
            });
        }
        let data = Array2::from_shape_vec((shape.rows, shape.cols), values)
            .map_err(|e| RthermError::InvalidShape(e.to_string()))?;
        Self::from_array(data)
    }

    pub fn shape(&self) -> GridShape {
        let (rows, cols) = self.data.dim();
        GridShape::new(rows, cols)
    }

    pub fn get(&self, index: GridIndex) -> Option<&T> {
        self.data.get((index.row, index.col))
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }
}

impl<T: Clone> ScalarField2D<T> {
    /// A field with every cell set to `value`
    pub fn filled(shape: GridShape, value: T) -> RthermResult<Self> {
        Self::from_array(Array2::from_elem((shape.rows, shape.cols), value))
    }
}

/// A time-major stack of grids with shape `(steps, rows, cols)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldData<Array3<FloatValue>>")]
pub struct ScalarField3D {
    data: Array3<FloatValue>,
}

impl ScalarField3D {
    /// Wrap an existing `(steps, rows, cols)` array
    pub fn from_array(data: Array3<FloatValue>) -> RthermResult<Self> {
        let (steps, rows, cols) = data.dim();
        ensure_not_empty(&[steps, rows, cols])?;
        Ok(Self { data })
    }

    /// Build a field from values ordered by step, then row, then column
    pub fn from_shape_vec(
        steps: usize,
        shape: GridShape,
        values: Vec<FloatValue>,
    ) -> RthermResult<Self> {
        let expected = steps * shape.len();
        if values.len() != expected {
            return Err(RthermError::ShapeMismatch {
                expected: format!("{} values for {} steps of a {} grid", expected, steps, shape),
                found: format!("{} values", values.len()),
            });
        }
        let data = Array3::from_shape_vec((steps, shape.rows, shape.cols), values)
            .map_err(|e| RthermError::InvalidShape(e.to_string()))?;
        Self::from_array(data)
    }

    /// Stack equally-shaped layers along a new leading time axis
    pub fn from_layers(layers: Vec<ScalarField2D>) -> RthermResult<Self> {
        let shape = match layers.first() {
            Some(first) => first.shape(),
            None => return Err(RthermError::InvalidShape("no layers to stack".to_string())),
        };

        let mut values = Vec::with_capacity(layers.len() * shape.len());
        for (step, layer) in layers.iter().enumerate() {
            if layer.shape() != shape {
                return Err(RthermError::ShapeMismatch {
                    expected: format!("layer {} to be {}", step, shape),
                    found: layer.shape().to_string(),
                });
            }
            values.extend(layer.view().iter().copied());
        }
        Self::from_shape_vec(layers.len(), shape, values)
    }

    /// Number of time steps
    pub fn steps(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Spatial shape shared by every step
    pub fn grid_shape(&self) -> GridShape {
        let (_, rows, cols) = self.data.dim();
        GridShape::new(rows, cols)
    }

    /// The grid at time step `step`
    pub fn layer(&self, step: usize) -> Option<ArrayView2<'_, FloatValue>> {
        if step < self.steps() {
            Some(self.data.index_axis(Axis(0), step))
        } else {
            None
        }
    }

    pub fn view(&self) -> ArrayView3<'_, FloatValue> {
        self.data.view()
    }

    pub fn into_array(self) -> Array3<FloatValue> {
        self.data
    }
}

/// Unvalidated serialised form of a field
#[derive(Deserialize)]
struct FieldData<A> {
    data: A,
}

impl<T> TryFrom<FieldData<Array2<T>>> for ScalarField2D<T> {
    type Error = RthermError;

    fn try_from(value: FieldData<Array2<T>>) -> RthermResult<Self> {
        Self::from_array(value.data)
    }
}

impl TryFrom<FieldData<Array3<FloatValue>>> for ScalarField3D {
    type Error = RthermError;

    fn try_from(value: FieldData<Array3<FloatValue>>) -> RthermResult<Self> {
        Self::from_array(value.data)
    }
}

fn ensure_not_empty(extents: &[usize]) -> RthermResult<()> {
    if extents.contains(&0) {
        return Err(RthermError::InvalidShape(format!(
            "every axis needs at least one element, got {:?}",
            extents
        )));
    }
    Ok(())
}
