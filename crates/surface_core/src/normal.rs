//! Bivariate normal fitting and density evaluation.
//!
//! Only the 2D case is needed, so inverse and determinant come from the closed-form
//! 2x2 expressions in `glam::DMat2` instead of a general decomposition.

use std::f64::consts::PI;

use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfaceError};
use crate::Scalar;

/// Diagonal jitter applied by [`NormalOptions::default`].
pub const DEFAULT_REGULARIZATION: Scalar = 1e-10;

/// `|Σ| / (Σ00 Σ11)` equals `1 - ρ²`; below this the matrix is treated as singular.
const MIN_DETERMINANT_RATIO: Scalar = 1e-12;

const SYMMETRY_TOLERANCE: Scalar = 1e-12;

/// Options for [`BivariateNormal::estimate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalOptions {
    /// Added to both diagonal entries of the sample covariance.
    pub regularization: Scalar,
}

impl Default for NormalOptions {
    fn default() -> Self {
        Self {
            regularization: DEFAULT_REGULARIZATION,
        }
    }
}

impl NormalOptions {
    pub fn unregularized() -> Self {
        Self {
            regularization: 0.0,
        }
    }

    pub fn with_regularization(regularization: Scalar) -> Self {
        Self { regularization }
    }
}

/// A 2D Gaussian with cached precision matrix and normalization constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BivariateNormal {
    mean: DVec2,
    covariance: DMat2,
    precision: DMat2,
    determinant: Scalar,
    log_norm: Scalar,
}

impl BivariateNormal {
    /// Builds a distribution from explicit parameters.
    ///
    /// The covariance must be finite, symmetric and positive-definite.
    pub fn new(mean: DVec2, covariance: DMat2) -> Result<Self> {
        if !mean.is_finite() {
            return Err(SurfaceError::InvalidInput(format!(
                "mean {mean} is not finite"
            )));
        }
        if !covariance.is_finite() {
            return Err(SurfaceError::DegenerateInput(format!(
                "covariance {covariance} is not finite"
            )));
        }
        let off_a = covariance.x_axis.y;
        let off_b = covariance.y_axis.x;
        if (off_a - off_b).abs() > SYMMETRY_TOLERANCE * off_a.abs().max(off_b.abs()).max(1.0) {
            return Err(SurfaceError::InvalidInput(format!(
                "covariance is not symmetric ({off_a} vs {off_b})"
            )));
        }

        let var_x = covariance.x_axis.x;
        let var_y = covariance.y_axis.y;
        let determinant = covariance.determinant();
        if !(var_x > 0.0 && var_y > 0.0 && determinant > 0.0)
            || determinant < MIN_DETERMINANT_RATIO * var_x * var_y
        {
            return Err(SurfaceError::DegenerateInput(format!(
                "covariance is not positive-definite (variances {var_x}, {var_y}; determinant {determinant})"
            )));
        }

        let precision = covariance.inverse();
        let log_norm = -(2.0 * PI).ln() - 0.5 * determinant.ln();
        // A subnormal determinant passes the ratio test but overflows the inverse.
        if !precision.is_finite() || !log_norm.is_finite() {
            return Err(SurfaceError::DegenerateInput(format!(
                "covariance is numerically singular (determinant {determinant}, precision {precision})"
            )));
        }
        Ok(Self {
            mean,
            covariance,
            precision,
            determinant,
            log_norm,
        })
    }

    /// Fits the maximum-likelihood (population) mean and covariance.
    ///
    /// `options.regularization` is added to both diagonal entries before the
    /// positive-definiteness check.
    pub fn estimate(observations: &[DVec2], options: NormalOptions) -> Result<Self> {
        if observations.is_empty() {
            return Err(SurfaceError::DegenerateInput(
                "cannot estimate a distribution from zero observations".into(),
            ));
        }
        if !options.regularization.is_finite() || options.regularization < 0.0 {
            return Err(SurfaceError::InvalidInput(format!(
                "regularization must be finite and non-negative, got {}",
                options.regularization
            )));
        }

        let (mean, covariance) = sample_moments(observations);
        let regularized = covariance + DMat2::from_diagonal(DVec2::splat(options.regularization));
        tracing::trace!(
            count = observations.len(),
            %mean,
            %regularized,
            "estimated bivariate normal"
        );
        Self::new(mean, regularized)
    }

    /// Fit without any diagonal jitter.
    pub fn estimate_unregularized(observations: &[DVec2]) -> Result<Self> {
        Self::estimate(observations, NormalOptions::unregularized())
    }

    pub fn mean(&self) -> DVec2 {
        self.mean
    }

    pub fn covariance(&self) -> DMat2 {
        self.covariance
    }

    /// Inverse covariance.
    pub fn precision(&self) -> DMat2 {
        self.precision
    }

    pub fn determinant(&self) -> Scalar {
        self.determinant
    }

    /// `(x - μ)ᵀ Σ⁻¹ (x - μ)`.
    pub fn mahalanobis_squared(&self, point: DVec2) -> Scalar {
        let d = point - self.mean;
        d.dot(self.precision * d)
    }

    pub fn log_pdf(&self, point: DVec2) -> Scalar {
        self.log_norm - 0.5 * self.mahalanobis_squared(point)
    }

    pub fn pdf(&self, point: DVec2) -> Scalar {
        self.log_pdf(point).exp()
    }
}

/// Population mean and covariance (divided by `M`, not `M - 1`).
fn sample_moments(observations: &[DVec2]) -> (DVec2, DMat2) {
    let count = observations.len() as Scalar;
    let mean = observations.iter().copied().sum::<DVec2>() / count;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for obs in observations {
        let d = *obs - mean;
        sxx += d.x * d.x;
        sxy += d.x * d.y;
        syy += d.y * d.y;
    }
    let covariance = DMat2::from_cols(
        DVec2::new(sxx / count, sxy / count),
        DVec2::new(sxy / count, syy / count),
    );
    (mean, covariance)
}
