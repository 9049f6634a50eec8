//! Extraction of weekly maximum temperatures at urban cells
//!
//! The pipeline runs four stages over fields that were loaded elsewhere:
//!
//! 1. reduce the hourly stack to per-window maxima ([`TemporalAggregator`]),
//! 2. find the urban cells of the land-cover grid, in row-major order,
//! 3. map those fine-grid cells into the coarse temperature grid ([`GridMapper`]),
//! 4. bilinearly sample every window's maxima at the mapped positions
//!    ([`BilinearSampler`]).
//!
//! Any failure aborts the run; there are no partial results.

use crate::config::PipelineConfig;
use log::{debug, info, warn};
use ndarray::{Array2, ArrayView2};
use rtherm_core::aggregate::TemporalAggregator;
use rtherm_core::bilinear::BilinearSampler;
use rtherm_core::errors::{RthermError, RthermResult};
use rtherm_core::field::{FloatValue, ScalarField2D, ScalarField3D};
use rtherm_core::grid::GridIndex;
use rtherm_core::grid_mapper::GridMapper;
use rtherm_core::land_cover::{cells_with_code, LandCover};
use rtherm_io::{load_field_3d, load_land_cover, save_array, write_array, DumpResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Sampled temperatures, one row per window and one column per urban cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrbanTemperatures {
    cells: Vec<GridIndex>,
    values: Array2<FloatValue>,
}

impl UrbanTemperatures {
    /// Urban cells of the land-cover grid, in the order of the columns
    pub fn cells(&self) -> &[GridIndex] {
        &self.cells
    }

    pub fn window_count(&self) -> usize {
        self.values.nrows()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// `(window_count, cell_count)` array of temperatures
    pub fn values(&self) -> ArrayView2<'_, FloatValue> {
        self.values.view()
    }

    /// One vector per window, each ordered like [`cells`](Self::cells)
    pub fn by_window(&self) -> Vec<Vec<FloatValue>> {
        self.values.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// One time series per urban cell, each ordered by window
    pub fn by_cell(&self) -> Vec<Vec<FloatValue>> {
        self.values
            .columns()
            .into_iter()
            .map(|column| column.to_vec())
            .collect()
    }

    /// The time series of a single urban cell
    pub fn series_for(&self, cell: GridIndex) -> Option<Vec<FloatValue>> {
        let position = self.cells.iter().position(|&c| c == cell)?;
        Some(self.values.column(position).to_vec())
    }

    /// Write the `(window_count, cell_count)` array as a text dump
    pub fn write_dump<W: Write + ?Sized>(&self, writer: &mut W) -> DumpResult<()> {
        write_array(writer, self.values.view())
    }

    pub fn save_dump(&self, path: impl AsRef<Path>) -> DumpResult<()> {
        save_array(path, self.values.view())
    }
}

/// Extracts per-window maximum temperatures at urban cells
///
/// Owns its inputs and configuration, so repeated runs always see the same data
/// and produce identical results.
#[derive(Debug, Clone)]
pub struct UrbanExtractionPipeline {
    hourly: ScalarField3D,
    land_cover: LandCover,
    config: PipelineConfig,
}

impl UrbanExtractionPipeline {
    /// Create a pipeline over an hourly `(steps, rows, cols)` temperature stack on
    /// the coarse grid and a land-cover classification on the fine grid
    pub fn new(hourly: ScalarField3D, land_cover: LandCover, config: PipelineConfig) -> Self {
        Self {
            hourly,
            land_cover,
            config,
        }
    }

    /// Create a pipeline from a land-cover dump and an hourly temperature dump
    pub fn from_dump_files(
        land_cover: impl AsRef<Path>,
        hourly: impl AsRef<Path>,
        config: PipelineConfig,
    ) -> DumpResult<Self> {
        let land_cover = land_cover.as_ref();
        let hourly = hourly.as_ref();

        debug!("Reading land cover from {}", land_cover.display());
        let land_cover = load_land_cover(land_cover)?;
        debug!("Reading hourly temperatures from {}", hourly.display());
        let hourly = load_field_3d(hourly)?;

        Ok(Self::new(hourly, land_cover, config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn hourly(&self) -> &ScalarField3D {
        &self.hourly
    }

    pub fn land_cover(&self) -> &LandCover {
        &self.land_cover
    }

    /// Per-window maxima of the hourly stack
    pub fn window_maxima(&self) -> RthermResult<Vec<ScalarField2D>> {
        let start = Instant::now();
        debug!(
            "Calculating window maxima of {} steps on a {} grid",
            self.hourly.steps(),
            self.hourly.grid_shape()
        );

        let aggregator = TemporalAggregator::new(self.config.window_spec()?)
            .with_nan_policy(self.config.nan_policy);
        let maxima = aggregator.aggregate(&self.hourly)?;

        debug!(
            "Calculated {} windows in {:?}",
            maxima.len(),
            start.elapsed()
        );
        Ok(maxima)
    }

    /// Land-cover cells matching the configured urban code, in row-major order
    pub fn urban_cells(&self) -> Vec<GridIndex> {
        cells_with_code(&self.land_cover, self.config.urban_code)
    }

    /// Run every stage and collect the sampled temperatures
    pub fn run(&self) -> RthermResult<UrbanTemperatures> {
        let start = Instant::now();
        // Every window shares the grid of the hourly stack
        let coarse = self.hourly.grid_shape();
        let fine = self.land_cover.shape();
        if fine.rows < coarse.rows || fine.cols < coarse.cols {
            return Err(RthermError::ShapeMismatch {
                expected: format!(
                    "a land-cover grid at least as fine as the {} temperature grid",
                    coarse
                ),
                found: format!("a {} land-cover grid", fine),
            });
        }

        let maxima = self.window_maxima()?;

        let cells = self.urban_cells();
        if cells.is_empty() {
            warn!(
                "Land cover contains no cells with code {}",
                self.config.urban_code
            );
        }

        debug!(
            "Interpolating {} urban cells from the {} grid onto the {} grid",
            cells.len(),
            coarse,
            fine
        );
        let positions = GridMapper::new(fine, coarse)?.map_all(&cells)?;

        let sampler = BilinearSampler::new(self.config.bounds_policy);
        let mut values = Array2::zeros((maxima.len(), cells.len()));
        for (mut row, window) in values.rows_mut().into_iter().zip(&maxima) {
            let samples = sampler.sample(window, &positions)?;
            for (slot, sample) in row.iter_mut().zip(samples) {
                *slot = sample;
            }
        }

        info!(
            "Extracted {} windows at {} urban cells in {:?}",
            maxima.len(),
            cells.len(),
            start.elapsed()
        );
        Ok(UrbanTemperatures { cells, values })
    }
}

/// Run the pipeline once with the default configuration for everything except
/// the window partitioning
pub fn run(
    hourly: &ScalarField3D,
    land_cover: &LandCover,
    hours_per_window: usize,
    window_count: usize,
) -> RthermResult<UrbanTemperatures> {
    let config = PipelineConfig {
        hours_per_window,
        window_count,
        ..Default::default()
    };
    UrbanExtractionPipeline::new(hourly.clone(), land_cover.clone(), config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    fn constant_hourly(steps: usize, rows: usize, cols: usize, value: FloatValue) -> ScalarField3D {
        ScalarField3D::from_array(Array3::from_elem((steps, rows, cols), value)).unwrap()
    }

    #[test]
    fn test_urban_cells_use_configured_code() {
        let land_cover = LandCover::from_array(array![[13, 190], [190, 13]]).unwrap();
        let config = PipelineConfig {
            urban_code: 190,
            ..Default::default()
        };
        let pipeline =
            UrbanExtractionPipeline::new(constant_hourly(1, 2, 2, 0.0), land_cover, config);
        assert_eq!(
            pipeline.urban_cells(),
            vec![GridIndex::new(0, 1), GridIndex::new(1, 0)]
        );
    }

    #[test]
    fn test_no_urban_cells_gives_empty_series() {
        let land_cover = LandCover::from_array(array![[0, 0], [0, 0]]).unwrap();
        let result = run(&constant_hourly(4, 2, 2, 290.0), &land_cover, 2, 2).unwrap();

        assert_eq!(result.window_count(), 2);
        assert_eq!(result.cell_count(), 0);
        assert_eq!(result.by_window(), vec![Vec::<FloatValue>::new(); 2]);
        assert!(result.by_cell().is_empty());
    }

    #[test]
    fn test_degenerate_land_cover_aborts() {
        let land_cover = LandCover::from_array(array![[13, 13, 0]]).unwrap();
        let err = run(&constant_hourly(2, 1, 2, 290.0), &land_cover, 1, 2).unwrap_err();
        assert!(matches!(err, RthermError::DegenerateGrid { .. }));
    }

    #[test]
    fn test_land_cover_coarser_than_temperatures_aborts() {
        let land_cover = LandCover::from_array(array![[13, 0], [0, 13]]).unwrap();
        let err = run(&constant_hourly(2, 3, 2, 290.0), &land_cover, 1, 2).unwrap_err();
        assert_eq!(
            err,
            RthermError::ShapeMismatch {
                expected: "a land-cover grid at least as fine as the 3x2 temperature grid"
                    .to_string(),
                found: "a 2x2 land-cover grid".to_string(),
            }
        );

        // Checked before the hourly stack is aggregated
        let err = run(&constant_hourly(1, 2, 3, 290.0), &land_cover, 4, 4).unwrap_err();
        assert!(matches!(err, RthermError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_short_hourly_stack_aborts() {
        let land_cover = LandCover::from_array(array![[13, 0], [0, 13]]).unwrap();
        let err = run(&constant_hourly(10, 2, 2, 290.0), &land_cover, 4, 3).unwrap_err();
        assert!(matches!(
            err,
            RthermError::InsufficientData {
                required: 12,
                available: 10
            }
        ));
    }

    #[test]
    fn test_series_lookup_and_dump() {
        let land_cover = LandCover::from_array(array![[13, 0], [0, 13]]).unwrap();
        let result = run(&constant_hourly(2, 2, 2, 1.5), &land_cover, 1, 2).unwrap();

        assert_eq!(result.series_for(GridIndex::new(1, 1)), Some(vec![1.5, 1.5]));
        assert_eq!(result.series_for(GridIndex::new(0, 1)), None);

        let mut buffer = Vec::new();
        result.write_dump(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "2\n2\n2\n1.5\n1.5\n1.5\n1.5\n"
        );
    }

    #[test]
    fn test_result_serialises_cells_by_name() {
        let land_cover = LandCover::from_array(array![[0, 13], [0, 0]]).unwrap();
        let result = run(&constant_hourly(1, 2, 2, 300.0), &land_cover, 1, 1).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["cells"][0]["row"], 0);
        assert_eq!(json["cells"][0]["col"], 1);
    }
}
