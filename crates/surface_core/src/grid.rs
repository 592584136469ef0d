//! Dense row-major grids and the observation grid builder.

use glam::DVec2;
use serde::Serialize;

use crate::error::{Result, SurfaceError};
use crate::Scalar;

/// Dense `rows x columns` container stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid<T> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    pub fn from_vec(rows: usize, columns: usize, data: Vec<T>) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(SurfaceError::InvalidInput(format!(
                "grid dimensions must be non-zero, got {rows}x{columns}"
            )));
        }
        if data.len() != rows * columns {
            return Err(SurfaceError::shape(rows, columns, data.len()));
        }
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major flat index of `(row, column)`.
    #[inline]
    pub fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    /// Panics when `(row, column)` is out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> &T {
        assert!(
            row < self.rows && column < self.columns,
            "cell ({row}, {column}) outside {}x{} grid",
            self.rows,
            self.columns
        );
        &self.data[self.index(row, column)]
    }

    pub fn try_get(&self, row: usize, column: usize) -> Option<&T> {
        if row < self.rows && column < self.columns {
            self.data.get(self.index(row, column))
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.columns;
        &self.data[start..start + self.columns]
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterates `(row, column, value)` in row-major order.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let columns = self.columns;
        self.data
            .iter()
            .enumerate()
            .map(move |(k, value)| (k / columns, k % columns, value))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            rows: self.rows,
            columns: self.columns,
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.dims() == other.dims()
    }
}

/// Expands the two axes into their cross product, y outer and x inner.
///
/// Element `k = i * xs.len() + j` is `(xs[j], ys[i])`.
pub fn build_observations(xs: &[Scalar], ys: &[Scalar]) -> Result<Vec<DVec2>> {
    check_axis("x", xs)?;
    check_axis("y", ys)?;

    let mut observations = Vec::with_capacity(xs.len() * ys.len());
    for &y in ys {
        for &x in xs {
            observations.push(DVec2::new(x, y));
        }
    }
    Ok(observations)
}

pub(crate) fn check_axis(label: &str, values: &[Scalar]) -> Result<()> {
    if values.is_empty() {
        return Err(SurfaceError::InvalidInput(format!(
            "{label} coordinate sequence is empty"
        )));
    }
    if let Some(position) = values.iter().position(|v| !v.is_finite()) {
        return Err(SurfaceError::InvalidInput(format!(
            "{label} coordinate {position} is not finite ({})",
            values[position]
        )));
    }
    Ok(())
}
