//! Finite-difference estimate of ∂z/∂y over a surface point grid, used for color mapping.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfaceError};
use crate::grid::Grid;
use crate::Scalar;

/// What to do when the two stencil rows share the same y (e.g. a single-row grid)
/// or the difference quotient overflows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingPolicy {
    /// The cell's gradient is 0.0.
    #[default]
    Zero,
    /// Fail with [`SurfaceError::NumericDegeneracy`] at the first such cell.
    Reject,
}

/// Central difference along the row axis with clamped neighbors.
///
/// For cell `(i, j)` the stencil samples column `max(j - 1, 0)` at rows
/// `max(i - 1, 0)` and `min(i + 1, rows - 1)`, so edge rows fall back to a
/// one-sided difference.
pub fn gradient_y(points: &Grid<DVec3>, policy: SpacingPolicy) -> Result<Grid<Scalar>> {
    let (rows, columns) = points.dims();
    let mut values = Vec::with_capacity(points.len());
    let mut degenerate_cells = 0usize;

    for i in 0..rows {
        let below = i.saturating_sub(1);
        let above = (i + 1).min(rows - 1);
        for j in 0..columns {
            let column = j.saturating_sub(1);
            let p00 = points.get(below, column);
            let p10 = points.get(above, column);

            let dy = p10.y - p00.y;
            let dz = p10.z - p00.z;
            let slope = dz / dy;
            let value = if dy == 0.0 || !slope.is_finite() {
                match policy {
                    SpacingPolicy::Zero => {
                        degenerate_cells += 1;
                        0.0
                    }
                    SpacingPolicy::Reject => {
                        return Err(SurfaceError::NumericDegeneracy { row: i, column: j });
                    }
                }
            } else {
                slope
            };
            values.push(value);
        }
    }

    if degenerate_cells > 0 {
        tracing::warn!(
            degenerate_cells,
            rows,
            columns,
            "zero y-spacing in gradient stencil; cells set to 0"
        );
    }
    Grid::from_vec(rows, columns, values)
}
