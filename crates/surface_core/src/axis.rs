//! Coordinate sequences and the mapping between grid indices and plot coordinates.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfaceError};
use crate::grid::check_axis;
use crate::Scalar;

/// Reference sample axis: -3.0, -2.8, ..., -1.0 (11 values).
pub fn sample_axis() -> Vec<Scalar> {
    // Built from integer steps so every value is the nearest double to the decimal literal.
    (0..11).map(|k| (-30 + 2 * k) as Scalar / 10.0).collect()
}

/// `count` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: Scalar, max: Scalar, count: usize) -> Result<Vec<Scalar>> {
    if count == 0 {
        return Err(SurfaceError::InvalidInput(
            "linspace requires at least one sample".into(),
        ));
    }
    if !min.is_finite() || !max.is_finite() {
        return Err(SurfaceError::InvalidInput(format!(
            "linspace bounds must be finite, got [{min}, {max}]"
        )));
    }
    if min > max {
        return Err(SurfaceError::InvalidInput(format!(
            "linspace bounds are reversed: {min} > {max}"
        )));
    }
    if count == 1 {
        return Ok(vec![min]);
    }

    let step = (max - min) / (count - 1) as Scalar;
    let mut values: Vec<Scalar> = (0..count).map(|k| min + step * k as Scalar).collect();
    // Pin the endpoint so accumulated rounding never overshoots `max`.
    values[count - 1] = max;
    Ok(values)
}

/// Extent and resolution of a surface grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_x: Scalar,
    pub max_x: Scalar,
    pub min_y: Scalar,
    pub max_y: Scalar,
    pub rows: usize,
    pub columns: usize,
}

impl GridBounds {
    /// `rows` follows `ys`, `columns` follows `xs`.
    pub fn from_axes(xs: &[Scalar], ys: &[Scalar]) -> Result<Self> {
        check_axis("x", xs)?;
        check_axis("y", ys)?;
        let (min_x, max_x) = min_max(xs);
        let (min_y, max_y) = min_max(ys);
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            rows: ys.len(),
            columns: xs.len(),
        })
    }

    /// Linearly interpolated plot coordinate of cell `(i, j)`.
    ///
    /// A single-column (or single-row) grid maps to its minimum.
    pub fn point_from_index(&self, i: usize, j: usize) -> DVec2 {
        DVec2::new(
            lerp_index(self.min_x, self.max_x, j, self.columns),
            lerp_index(self.min_y, self.max_y, i, self.rows),
        )
    }

    pub fn width(&self) -> Scalar {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> Scalar {
        self.max_y - self.min_y
    }

    /// Area of one cell of a uniform grid spanning these bounds (0 for degenerate axes).
    pub fn cell_area(&self) -> Scalar {
        let dx = if self.columns > 1 {
            self.width() / (self.columns - 1) as Scalar
        } else {
            0.0
        };
        let dy = if self.rows > 1 {
            self.height() / (self.rows - 1) as Scalar
        } else {
            0.0
        };
        dx * dy
    }
}

fn lerp_index(min: Scalar, max: Scalar, index: usize, count: usize) -> Scalar {
    if count <= 1 {
        return min;
    }
    min + index as Scalar / (count - 1) as Scalar * (max - min)
}

fn min_max(values: &[Scalar]) -> (Scalar, Scalar) {
    values
        .iter()
        .fold((Scalar::INFINITY, Scalar::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_axis_matches_reference_values() {
        let axis = sample_axis();
        assert_eq!(axis.len(), 11);
        assert_eq!(axis[0], -3.0);
        assert_eq!(axis[1], -2.8);
        assert_eq!(axis[5], -2.0);
        assert_eq!(axis[10], -1.0);
    }

    #[test]
    fn linspace_includes_both_ends() {
        let values = linspace(-1.0, 1.0, 5).unwrap();
        assert_eq!(values, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 7.0, 1).unwrap(), vec![2.0]);
    }

    #[test]
    fn linspace_rejects_bad_bounds() {
        assert!(linspace(0.0, 1.0, 0).is_err());
        assert!(linspace(1.0, 0.0, 3).is_err());
        assert!(linspace(0.0, f64::INFINITY, 3).is_err());
    }

    #[test]
    fn point_from_index_interpolates_bounds() {
        let bounds = GridBounds::from_axes(&sample_axis(), &[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(bounds.rows, 3);
        assert_eq!(bounds.columns, 11);
        assert_eq!(bounds.point_from_index(0, 0), DVec2::new(-3.0, 0.0));
        assert_eq!(bounds.point_from_index(2, 10), DVec2::new(-1.0, 2.0));
        let mid = bounds.point_from_index(1, 5);
        assert!((mid.x + 2.0).abs() < 1e-12);
        assert!((mid.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_sample_axis_maps_to_minimum() {
        let bounds = GridBounds::from_axes(&[4.0], &[1.0, 2.0]).unwrap();
        assert_eq!(bounds.point_from_index(1, 0), DVec2::new(4.0, 2.0));
        assert_eq!(bounds.cell_area(), 0.0);
    }
}
