//! Error type shared by every stage of the surface pipeline.

use thiserror::Error;

/// Result alias used across `surface_core`.
pub type Result<T> = std::result::Result<T, SurfaceError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// Empty, non-finite or otherwise unusable coordinate input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Observations that cannot produce a usable distribution.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("shape mismatch: expected {expected} elements ({rows}x{columns}), found {found}")]
    ShapeMismatch {
        rows: usize,
        columns: usize,
        expected: usize,
        found: usize,
    },

    /// Zero y-spacing hit while differentiating under [`SpacingPolicy::Reject`].
    ///
    /// [`SpacingPolicy::Reject`]: crate::gradient::SpacingPolicy::Reject
    #[error("zero y-spacing at cell ({row}, {column})")]
    NumericDegeneracy { row: usize, column: usize },
}

impl SurfaceError {
    pub(crate) fn shape(rows: usize, columns: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            rows,
            columns,
            expected: rows.saturating_mul(columns),
            found,
        }
    }
}
