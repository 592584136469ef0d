//! Assembly of the (x, y, density) point grid handed to the renderer.

use glam::{DVec2, DVec3};

use crate::error::{Result, SurfaceError};
use crate::grid::Grid;
use crate::Scalar;

/// Pairs every observation with its density; cell `(i, j)` takes element `i * columns + j`.
pub fn assemble_surface(
    observations: &[DVec2],
    densities: &[Scalar],
    rows: usize,
    columns: usize,
) -> Result<Grid<DVec3>> {
    let expected = rows.saturating_mul(columns);
    if observations.len() != expected {
        return Err(SurfaceError::shape(rows, columns, observations.len()));
    }
    if densities.len() != expected {
        return Err(SurfaceError::shape(rows, columns, densities.len()));
    }

    let points = observations
        .iter()
        .zip(densities)
        .map(|(obs, &z)| obs.extend(z))
        .collect();
    Grid::from_vec(rows, columns, points)
}
