//! Numeric validation helpers for density grids.

use crate::grid::Grid;
use crate::Scalar;

/// Computes a simple checksum over density samples to aid regression testing.
pub fn checksum(values: &[Scalar]) -> Scalar {
    values.iter().copied().fold(0.0, |acc, v| acc + v)
}

/// `(row, column, value)` of the largest finite value; first occurrence wins ties.
pub fn peak(grid: &Grid<Scalar>) -> Option<(usize, usize, Scalar)> {
    grid.indexed()
        .filter(|(_, _, v)| v.is_finite())
        .fold(None, |best, (i, j, &v)| match best {
            Some((_, _, top)) if top >= v => best,
            _ => Some((i, j, v)),
        })
}

/// Riemann sum: grid total times the area of one cell.
pub fn integrate(grid: &Grid<Scalar>, cell_area: Scalar) -> Scalar {
    checksum(grid.as_slice()) * cell_area
}

/// `(min, max)` over finite values, `None` if there are none.
pub fn finite_range(values: &[Scalar]) -> Option<(Scalar, Scalar)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_linear() {
        assert_eq!(checksum(&[1.0, 2.0, 3.0]), 6.0);
    }

    #[test]
    fn peak_prefers_first_maximum() {
        let grid = Grid::from_vec(2, 2, vec![1.0, 4.0, f64::NAN, 4.0]).unwrap();
        assert_eq!(peak(&grid), Some((0, 1, 4.0)));
    }

    #[test]
    fn integrate_scales_by_cell_area() {
        let grid = Grid::from_vec(1, 4, vec![0.5; 4]).unwrap();
        assert_eq!(integrate(&grid, 0.25), 0.5);
    }

    #[test]
    fn finite_range_skips_non_finite() {
        assert_eq!(finite_range(&[2.0, f64::INFINITY, -1.0]), Some((-1.0, 2.0)));
        assert_eq!(finite_range(&[f64::NAN]), None);
    }
}
