//! Core data model and numerics for extracting urban temperature series
//!
//! - [`field`]: shape-checked 2D and 3D scalar fields
//! - [`grid`]: grid shapes and row-major coordinates
//! - [`aggregate`]: windowed maxima along the time axis
//! - [`grid_mapper`]: endpoint-anchored scaling between two grids
//! - [`bilinear`]: bilinear sampling at fractional positions
//! - [`land_cover`]: classification grids and urban cell lookup

pub mod aggregate;
pub mod bilinear;
pub mod errors;
pub mod field;
pub mod grid;
pub mod grid_mapper;
pub mod land_cover;
