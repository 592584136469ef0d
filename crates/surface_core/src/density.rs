//! Dense probability-density evaluation over an observation set.

use glam::DVec2;

use crate::error::{Result, SurfaceError};
use crate::grid::Grid;
use crate::normal::BivariateNormal;
use crate::Scalar;

/// Density of `dist` at every observation, in observation order.
pub fn evaluate_density(dist: &BivariateNormal, observations: &[DVec2]) -> Vec<Scalar> {
    observations.iter().map(|&obs| dist.pdf(obs)).collect()
}

/// Same as [`evaluate_density`], reshaped to `rows x columns`.
pub fn evaluate_density_grid(
    dist: &BivariateNormal,
    observations: &[DVec2],
    rows: usize,
    columns: usize,
) -> Result<Grid<Scalar>> {
    if observations.len() != rows.saturating_mul(columns) {
        return Err(SurfaceError::shape(rows, columns, observations.len()));
    }
    Grid::from_vec(rows, columns, evaluate_density(dist, observations))
}
