//! End-to-end surface generation and the recompute-and-publish model around it.

use std::sync::Arc;

use glam::DVec3;
use serde::Serialize;

use crate::axis::GridBounds;
use crate::config::{ColorCoding, EstimatorMode, SurfaceSettings};
use crate::density::evaluate_density;
use crate::error::Result;
use crate::gradient::gradient_y;
use crate::grid::{build_observations, Grid};
use crate::metrics::{finite_range, peak};
use crate::normal::BivariateNormal;
use crate::surface::assemble_surface;
use crate::Scalar;

/// Immutable output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceResult {
    pub bounds: GridBounds,
    /// The distribution the densities were evaluated with.
    pub distribution: BivariateNormal,
    pub points: Grid<DVec3>,
    /// Index-aligned with `points`; `None` unless the color coding needs it.
    pub colors: Option<Grid<Scalar>>,
    pub color_coding: ColorCoding,
}

impl SurfaceResult {
    pub fn rows(&self) -> usize {
        self.points.rows()
    }

    pub fn columns(&self) -> usize {
        self.points.columns()
    }

    pub fn density_grid(&self) -> Grid<Scalar> {
        self.points.map(|p| p.z)
    }

    /// `(row, column, density)` of the highest point.
    pub fn peak(&self) -> Option<(usize, usize, Scalar)> {
        peak(&self.density_grid())
    }

    pub fn color_range(&self) -> Option<(Scalar, Scalar)> {
        self.colors
            .as_ref()
            .and_then(|colors| finite_range(colors.as_slice()))
    }
}

/// Runs grid building, fitting, density evaluation, assembly and gradient estimation.
#[derive(Debug, Clone, Default)]
pub struct SurfacePipeline {
    settings: SurfaceSettings,
}

impl SurfacePipeline {
    pub fn new(settings: SurfaceSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    /// Runs on the axes described by the settings themselves.
    pub fn run_configured(&self) -> Result<SurfaceResult> {
        let (xs, ys) = self.settings.axes()?;
        self.run(&xs, &ys)
    }

    /// `xs` spans the columns, `ys` the rows.
    pub fn run(&self, xs: &[Scalar], ys: &[Scalar]) -> Result<SurfaceResult> {
        let bounds = GridBounds::from_axes(xs, ys)?;
        let (rows, columns) = (bounds.rows, bounds.columns);
        let _span = tracing::debug_span!("surface_pipeline", rows, columns).entered();

        let observations = build_observations(xs, ys)?;
        let fitted = BivariateNormal::estimate(&observations, self.settings.normal_options())?;
        tracing::debug!(
            mean = %fitted.mean(),
            determinant = fitted.determinant(),
            "fitted bivariate normal"
        );

        let distribution = match self.settings.estimator {
            EstimatorMode::Consistent => fitted,
            EstimatorMode::Legacy => BivariateNormal::estimate_unregularized(&observations)
                .map_err(|err| {
                    tracing::warn!(%err, "unregularized estimate rejected in legacy mode");
                    err
                })?,
        };

        let densities = evaluate_density(&distribution, &observations);
        let points = assemble_surface(&observations, &densities, rows, columns)?;

        let colors = if self.settings.color_coding.needs_color_values() {
            Some(gradient_y(&points, self.settings.spacing_policy)?)
        } else {
            None
        };
        tracing::debug!(
            points = points.len(),
            colored = colors.is_some(),
            "surface assembled"
        );

        Ok(SurfaceResult {
            bounds,
            distribution,
            points,
            colors,
            color_coding: self.settings.color_coding,
        })
    }
}

type Listener = Box<dyn FnMut(&SurfaceResult)>;

/// Holds the latest [`SurfaceResult`] and notifies listeners whenever it is replaced.
///
/// A failed recompute leaves the previous result in place.
#[derive(Default)]
pub struct SurfaceModel {
    pipeline: SurfacePipeline,
    axes: Option<(Vec<Scalar>, Vec<Scalar>)>,
    current: Option<Arc<SurfaceResult>>,
    listeners: Vec<Listener>,
}

impl SurfaceModel {
    pub fn new(settings: SurfaceSettings) -> Self {
        Self {
            pipeline: SurfacePipeline::new(settings),
            ..Self::default()
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SurfaceResult) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn current(&self) -> Option<Arc<SurfaceResult>> {
        self.current.clone()
    }

    pub fn settings(&self) -> &SurfaceSettings {
        self.pipeline.settings()
    }

    /// Recomputes for new sample sequences and publishes the result.
    pub fn update(&mut self, xs: &[Scalar], ys: &[Scalar]) -> Result<Arc<SurfaceResult>> {
        let result = self.pipeline.run(xs, ys)?;
        self.axes = Some((xs.to_vec(), ys.to_vec()));
        Ok(self.publish(result))
    }

    /// Swaps the settings and, when sample sequences are known, recomputes with them.
    pub fn set_settings(
        &mut self,
        settings: SurfaceSettings,
    ) -> Result<Option<Arc<SurfaceResult>>> {
        let pipeline = SurfacePipeline::new(settings);
        let result = match &self.axes {
            Some((xs, ys)) => Some(pipeline.run(xs, ys)?),
            None => None,
        };
        self.pipeline = pipeline;
        Ok(result.map(|result| self.publish(result)))
    }

    pub fn set_color_coding(
        &mut self,
        color_coding: ColorCoding,
    ) -> Result<Option<Arc<SurfaceResult>>> {
        let mut settings = self.pipeline.settings().clone();
        settings.color_coding = color_coding;
        self.set_settings(settings)
    }

    fn publish(&mut self, result: SurfaceResult) -> Arc<SurfaceResult> {
        let result = Arc::new(result);
        for listener in &mut self.listeners {
            listener(&result);
        }
        self.current = Some(Arc::clone(&result));
        result
    }
}

impl std::fmt::Debug for SurfaceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceModel")
            .field("pipeline", &self.pipeline)
            .field("has_result", &self.current.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::axis::sample_axis;
    use crate::error::SurfaceError;

    #[test]
    fn lights_mode_skips_color_values() {
        let settings = SurfaceSettings {
            color_coding: ColorCoding::ByLights,
            ..SurfaceSettings::default()
        };
        let result = SurfacePipeline::new(settings).run_configured().unwrap();
        assert!(result.colors.is_none());
        assert_eq!(result.color_range(), None);
        assert_eq!(result.color_coding, ColorCoding::ByLights);
    }

    #[test]
    fn gradient_mode_aligns_colors_with_points() {
        let result = SurfacePipeline::default().run_configured().unwrap();
        let colors = result.colors.as_ref().unwrap();
        assert!(colors.same_shape(&result.points));
        assert!(colors.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn legacy_mode_matches_consistent_on_well_conditioned_input() {
        let axis = sample_axis();
        let consistent = SurfacePipeline::default().run(&axis, &axis).unwrap();
        let legacy = SurfacePipeline::new(SurfaceSettings {
            estimator: EstimatorMode::Legacy,
            ..SurfaceSettings::default()
        })
        .run(&axis, &axis)
        .unwrap();
        for (a, b) in consistent.points.iter().zip(legacy.points.iter()) {
            assert!((a.z - b.z).abs() <= 1e-8 * a.z.max(1e-300));
        }
    }

    #[test]
    fn legacy_mode_fails_where_regularization_is_needed() {
        let legacy = SurfacePipeline::new(SurfaceSettings {
            estimator: EstimatorMode::Legacy,
            ..SurfaceSettings::default()
        });
        assert!(matches!(
            legacy.run(&[1.0], &[2.0]),
            Err(SurfaceError::DegenerateInput(_))
        ));
        assert!(SurfacePipeline::default().run(&[1.0], &[2.0]).is_ok());
    }

    #[test]
    fn model_publishes_and_keeps_last_good_result() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut model = SurfaceModel::new(SurfaceSettings::default());
        let sink = Rc::clone(&seen);
        model.subscribe(move |result| sink.borrow_mut().push(result.rows()));

        let axis = sample_axis();
        model.update(&axis, &axis[..4]).unwrap();
        assert_eq!(*seen.borrow(), vec![4]);

        assert!(model.update(&[], &axis).is_err());
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(model.current().unwrap().rows(), 4);

        let republished = model.set_color_coding(ColorCoding::ByLights).unwrap();
        assert!(republished.unwrap().colors.is_none());
        assert_eq!(*seen.borrow(), vec![4, 4]);
        assert_eq!(model.settings().color_coding, ColorCoding::ByLights);
    }

    #[test]
    fn settings_change_without_data_does_not_publish() {
        let mut model = SurfaceModel::default();
        assert!(model.set_color_coding(ColorCoding::ByLights).unwrap().is_none());
        assert!(model.current().is_none());
    }
}
