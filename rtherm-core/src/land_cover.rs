//! Land-cover classification grids

use crate::field::ScalarField2D;
use crate::grid::GridIndex;

/// Integer class code stored in a land-cover grid
pub type LandCoverCode = i32;

/// A land-cover classification, one class code per fine-grid cell
pub type LandCover = ScalarField2D<LandCoverCode>;

/// Class code marking urban cells
pub const URBAN_CODE: LandCoverCode = 13;

/// Every cell whose class equals `code`, in row-major scan order
pub fn cells_with_code(land_cover: &LandCover, code: LandCoverCode) -> Vec<GridIndex> {
    land_cover
        .view()
        .indexed_iter()
        .filter(|(_, &value)| value == code)
        .map(|((row, col), _)| GridIndex::new(row, col))
        .collect()
}

/// Every urban cell ([`URBAN_CODE`]), in row-major scan order
pub fn urban_cells(land_cover: &LandCover) -> Vec<GridIndex> {
    cells_with_code(land_cover, URBAN_CODE)
}
