//! Windowed maxima along the time axis
//!
//! A [`WindowSpec`] splits the leading (time) axis of a [`ScalarField3D`] into
//! `window_count` contiguous, non-overlapping windows of `window_length` steps.
//! Steps after the last full window are discarded. Each window is reduced to a
//! single grid holding the per-cell maximum.
//!
//! # Missing values
//!
//! How NaN inside a window is treated is chosen with [`NanPolicy`]:
//!
//! - [`NanPolicy::Propagate`] (default): any NaN in a window makes that cell NaN.
//! - [`NanPolicy::Ignore`]: NaNs are skipped. A cell that is NaN for the whole
//!   window stays NaN.
//!
//! # Examples
//!
//! ```rust
//! use rtherm_core::aggregate::{aggregate, WindowSpec};
//! use rtherm_core::field::ScalarField3D;
//! use rtherm_core::grid::GridShape;
//!
//! // Six hourly steps of a single cell, two windows of three hours
//! let hourly = ScalarField3D::from_shape_vec(
//!     6,
//!     GridShape::new(1, 1),
//!     vec![1.0, 4.0, 2.0, 7.0, 3.0, 5.0],
//! )
//! .unwrap();
//! let maxima = aggregate(&hourly, WindowSpec::new(3, 2).unwrap()).unwrap();
//! assert_eq!(maxima.len(), 2);
//! assert_eq!(maxima[0].view()[[0, 0]], 4.0);
//! assert_eq!(maxima[1].view()[[0, 0]], 7.0);
//! ```

use crate::errors::{RthermError, RthermResult};
use crate::field::{ScalarField2D, ScalarField3D};
use ndarray::{s, Axis, Zip};
use num::Float;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Hours in a week, the default window length
pub const HOURS_PER_WEEK: usize = 24 * 7;

/// Whole weeks in a year, the default number of windows
pub const WEEKS_PER_YEAR: usize = 52;

/// Treatment of NaN values when reducing a window
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanPolicy {
    /// A NaN anywhere in the window makes the result NaN
    #[default]
    Propagate,
    /// NaNs are skipped; the result is NaN only if every value is NaN
    Ignore,
}

/// Partitioning of a time axis into equal contiguous windows
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WindowSpec {
    window_length: usize,
    window_count: usize,
}

impl WindowSpec {
    /// Fails with [`RthermError::InvalidWindow`] if either value is zero.
    pub fn new(window_length: usize, window_count: usize) -> RthermResult<Self> {
        if window_length == 0 || window_count == 0 {
            return Err(RthermError::InvalidWindow {
                window_length,
                window_count,
            });
        }
        Ok(Self {
            window_length,
            window_count,
        })
    }

    /// `weeks` windows of [`HOURS_PER_WEEK`] hourly steps
    pub fn weekly(weeks: usize) -> RthermResult<Self> {
        Self::new(HOURS_PER_WEEK, weeks)
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn window_count(&self) -> usize {
        self.window_count
    }

    /// Number of time steps covered by all windows together
    pub fn required_steps(&self) -> usize {
        self.window_length * self.window_count
    }

    /// Time steps belonging to `window`
    pub fn steps_of(&self, window: usize) -> Range<usize> {
        let start = window * self.window_length;
        start..start + self.window_length
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            window_length: HOURS_PER_WEEK,
            window_count: WEEKS_PER_YEAR,
        }
    }
}

/// Reduces a time-major field to per-window maxima
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TemporalAggregator {
    window: WindowSpec,
    nan_policy: NanPolicy,
}

impl TemporalAggregator {
    pub fn new(window: WindowSpec) -> Self {
        Self {
            window,
            nan_policy: NanPolicy::default(),
        }
    }

    pub fn with_nan_policy(mut self, nan_policy: NanPolicy) -> Self {
        self.nan_policy = nan_policy;
        self
    }

    pub fn window(&self) -> WindowSpec {
        self.window
    }

    pub fn nan_policy(&self) -> NanPolicy {
        self.nan_policy
    }

    /// One grid of maxima per window, in ascending time order
    ///
    /// Fails with [`RthermError::InsufficientData`] if the field has fewer steps
    /// than the windows cover.
    pub fn aggregate(&self, field: &ScalarField3D) -> RthermResult<Vec<ScalarField2D>> {
        let required = self.window.required_steps();
        let available = field.steps();
        if available < required {
            return Err(RthermError::InsufficientData {
                required,
                available,
            });
        }

        #[cfg(feature = "parallel")]
        use rayon::prelude::*;

        #[cfg(feature = "parallel")]
        let windows = (0..self.window.window_count()).into_par_iter();
        #[cfg(not(feature = "parallel"))]
        let windows = 0..self.window.window_count();

        windows.map(|w| self.window_max(field, w)).collect()
    }

    fn window_max(&self, field: &ScalarField3D, window: usize) -> RthermResult<ScalarField2D> {
        let steps = self.window.steps_of(window);
        let view = field.view();
        let slice = view.slice(s![steps.start..steps.end, .., ..]);

        let mut maxima = slice.index_axis(Axis(0), 0).to_owned();
        for layer in slice.axis_iter(Axis(0)).skip(1) {
            Zip::from(&mut maxima)
                .and(&layer)
                .for_each(|current, &candidate| {
                    *current = max_with_policy(*current, candidate, self.nan_policy)
                });
        }
        ScalarField2D::from_array(maxima)
    }
}

/// Aggregate `field` with the default [`NanPolicy`]
pub fn aggregate(field: &ScalarField3D, window: WindowSpec) -> RthermResult<Vec<ScalarField2D>> {
    TemporalAggregator::new(window).aggregate(field)
}

fn max_with_policy<F: Float>(current: F, candidate: F, policy: NanPolicy) -> F {
    match policy {
        NanPolicy::Propagate if current.is_nan() || candidate.is_nan() => F::nan(),
        // `Float::max` returns the non-NaN argument when only one is NaN
        _ => current.max(candidate),
    }
}
