//! Reading and writing rtherm fields as plain-text array dumps
//!
//! The hourly temperature stack and the land-cover grid are normally produced by
//! converting raster files into the dump format described in [`dump`]. The same
//! format is used to persist extracted urban temperature series.

pub mod dump;
pub mod errors;

pub use dump::{
    load_field_3d, load_land_cover, read_field_2d, read_field_3d, save_array, write_array,
    write_field_2d, write_field_3d,
};
pub use errors::{DumpError, DumpResult};
