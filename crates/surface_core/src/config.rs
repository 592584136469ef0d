//! Shared configuration types for the surface pipeline.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::axis::{linspace, sample_axis};
use crate::error::{Result, SurfaceError};
use crate::gradient::SpacingPolicy;
use crate::normal::{NormalOptions, DEFAULT_REGULARIZATION};
use crate::Scalar;

/// How the renderer colors the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCoding {
    /// Uniform white surface lit by colored lights; no color grid is produced.
    ByLights,
    /// Gradient brush driven by ∂z/∂y.
    #[default]
    ByGradientY,
}

impl ColorCoding {
    pub fn needs_color_values(self) -> bool {
        matches!(self, ColorCoding::ByGradientY)
    }

    pub fn parse(token: &str) -> Result<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "lights" | "by_lights" | "uniform" => Ok(ColorCoding::ByLights),
            "gradient" | "gradient_y" | "by_gradient_y" => Ok(ColorCoding::ByGradientY),
            other => Err(SurfaceError::InvalidInput(format!(
                "unknown color coding '{other}' (expected 'lights' or 'gradient')"
            ))),
        }
    }
}

/// Which fitted distribution the density is evaluated with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorMode {
    /// Fit once with regularization and evaluate with that same fit.
    #[default]
    Consistent,
    /// Fit with regularization, then evaluate with a second, unregularized fit.
    Legacy,
}

/// One coordinate axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSpec {
    Explicit(Vec<Scalar>),
    Range { min: Scalar, max: Scalar, count: usize },
}

impl AxisSpec {
    pub fn values(&self) -> Result<Vec<Scalar>> {
        match self {
            AxisSpec::Explicit(values) => Ok(values.clone()),
            AxisSpec::Range { min, max, count } => linspace(*min, *max, *count),
        }
    }
}

impl Default for AxisSpec {
    fn default() -> Self {
        AxisSpec::Explicit(sample_axis())
    }
}

/// High level pipeline settings. Defaults reproduce the reference sample plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub regularization: Scalar,
    pub color_coding: ColorCoding,
    pub estimator: EstimatorMode,
    pub spacing_policy: SpacingPolicy,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            x_axis: AxisSpec::default(),
            y_axis: AxisSpec::default(),
            regularization: DEFAULT_REGULARIZATION,
            color_coding: ColorCoding::default(),
            estimator: EstimatorMode::default(),
            spacing_policy: SpacingPolicy::default(),
        }
    }
}

impl SurfaceSettings {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| SurfaceError::InvalidInput(format!("invalid settings JSON: {err}")))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            SurfaceError::InvalidInput(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| SurfaceError::InvalidInput(format!("cannot encode settings: {err}")))
    }

    /// Resolved `(xs, ys)` coordinate sequences.
    pub fn axes(&self) -> Result<(Vec<Scalar>, Vec<Scalar>)> {
        Ok((self.x_axis.values()?, self.y_axis.values()?))
    }

    pub fn normal_options(&self) -> NormalOptions {
        NormalOptions::with_regularization(self.regularization)
    }
}
