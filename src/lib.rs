//! Weekly maximum temperatures at urban land-cover cells
//!
//! `rtherm` takes an hourly temperature stack on a coarse grid and a land-cover
//! classification on a finer grid covering the same area, and produces, for each
//! urban cell of the land cover, the series of weekly maximum temperatures
//! interpolated to that cell.
//!
//! # Examples
//!
//! ```rust
//! use ndarray::Array3;
//! use rtherm::{LandCover, PipelineConfig, ScalarField3D, UrbanExtractionPipeline};
//!
//! // Two weeks of hourly data on a 3x3 grid, warming by one degree per hour
//! let hourly = ScalarField3D::from_array(Array3::from_shape_fn((336, 3, 3), |(t, _, _)| {
//!     270.0 + t as f64
//! }))
//! .unwrap();
//! let land_cover = LandCover::from_array(ndarray::array![[13, 0, 0], [0, 0, 0], [0, 0, 13]]).unwrap();
//!
//! let config = PipelineConfig {
//!     window_count: 2,
//!     ..Default::default()
//! };
//! let result = UrbanExtractionPipeline::new(hourly, land_cover, config).run().unwrap();
//!
//! assert_eq!(result.cell_count(), 2);
//! assert_eq!(result.by_cell()[0], vec![270.0 + 167.0, 270.0 + 335.0]);
//! ```

pub mod config;
pub mod pipeline;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{run, UrbanExtractionPipeline, UrbanTemperatures};

pub use rtherm_core::aggregate::{aggregate, NanPolicy, TemporalAggregator, WindowSpec};
pub use rtherm_core::bilinear::{sample, BilinearSampler, BoundsPolicy};
pub use rtherm_core::errors::{RthermError, RthermResult};
pub use rtherm_core::field::{FloatValue, ScalarField2D, ScalarField3D};
pub use rtherm_core::grid::{GridAxis, GridIndex, GridPosition, GridShape};
pub use rtherm_core::grid_mapper::{map, GridMapper};
pub use rtherm_core::land_cover::{urban_cells, LandCover, LandCoverCode, URBAN_CODE};

pub use rtherm_io as io;
