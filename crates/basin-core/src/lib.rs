//! Flow routing and watershed delineation over integer elevation rasters.
//!
//! The pipeline takes a row-major [`ElevationGrid`], derives a steepest-descent
//! flow direction per interior cell, groups cells into drainage basins, and
//! optionally counts upstream contributions per cell. Raster file formats and
//! projection metadata are the caller's concern.

pub mod error;
pub mod grid;
pub mod routing;

pub use error::{DrainageError, QualityWarning};
pub use grid::ElevationGrid;
pub use routing::{derive_drainage, DrainageConfig, DrainageResult};
