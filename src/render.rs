//! CPU rasterization and export encoding.

pub mod export;
pub mod raster;
