//! Numerical core for bivariate normal density surfaces.
//!
//! The crate turns two coordinate sequences into the data a surface plot needs:
//! - an observation grid (y outer, x inner) built from the sequences
//! - a bivariate normal fitted to the observations
//! - the density evaluated at every observation, reshaped into a grid of 3D points
//! - an optional y-gradient field used for color mapping
//!
//! Nothing here knows about windows, cameras or GPU backends; [`mesh`] only packs the
//! result into a plain vertex/index payload for whichever renderer consumes it.

pub mod axis;
pub mod config;
pub mod density;
pub mod error;
pub mod gradient;
pub mod grid;
pub mod mesh;
pub mod metrics;
pub mod normal;
pub mod pipeline;
pub mod surface;

/// Convenience re-export for the scalar type used across the pipeline.
pub type Scalar = f64;

pub fn version_string() -> &'static str {
    concat!("surface_core ", env!("CARGO_PKG_VERSION"))
}

pub use axis::GridBounds;
pub use config::{AxisSpec, ColorCoding, EstimatorMode, SurfaceSettings};
pub use error::{Result, SurfaceError};
pub use gradient::SpacingPolicy;
pub use grid::Grid;
pub use mesh::SurfaceVertex;
pub use normal::{BivariateNormal, NormalOptions};
pub use pipeline::{SurfaceModel, SurfacePipeline, SurfaceResult};
