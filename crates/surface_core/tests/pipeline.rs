use surface_core::{
    axis::{linspace, sample_axis},
    grid::build_observations,
    metrics::integrate,
    BivariateNormal, ColorCoding, EstimatorMode, NormalOptions, SpacingPolicy, SurfaceError,
    SurfacePipeline, SurfaceSettings,
};

#[test]
fn sample_data_surface_peaks_at_the_mean() {
    let result = SurfacePipeline::default().run_configured().unwrap();
    assert_eq!((result.rows(), result.columns()), (11, 11));
    assert!(result.points.iter().all(|p| p.z >= 0.0 && p.z.is_finite()));

    let mean = result.distribution.mean();
    let (nearest, _) = result
        .points
        .indexed()
        .map(|(i, j, p)| ((i, j), (p.x - mean.x).powi(2) + (p.y - mean.y).powi(2)))
        .fold(((0, 0), f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best });
    let (pi, pj, _) = result.peak().unwrap();
    assert_eq!((pi, pj), nearest);
    assert_eq!((pi, pj), (5, 5));
}

#[test]
fn surface_round_trips_input_coordinates() {
    let xs = linspace(-4.0, 1.0, 7).unwrap();
    let ys = linspace(0.0, 3.0, 5).unwrap();
    let result = SurfacePipeline::default().run(&xs, &ys).unwrap();
    for (i, j, p) in result.points.indexed() {
        assert_eq!(p.x, xs[j]);
        assert_eq!(p.y, ys[i]);
    }
    let colors = result.colors.as_ref().unwrap();
    assert_eq!(colors.dims(), (5, 7));
}

#[test]
fn wide_fine_grid_holds_unit_mass() {
    // Fit on a coarse grid, then integrate the fitted density over a wide fine one.
    let dist = BivariateNormal::estimate(
        &build_observations(&sample_axis(), &sample_axis()).unwrap(),
        NormalOptions::default(),
    )
    .unwrap();
    let mean = dist.mean();
    let count = 161;
    let xs = linspace(mean.x - 5.0, mean.x + 5.0, count).unwrap();
    let ys = linspace(mean.y - 5.0, mean.y + 5.0, count).unwrap();
    let obs = build_observations(&xs, &ys).unwrap();
    let grid =
        surface_core::density::evaluate_density_grid(&dist, &obs, count, count).unwrap();
    let step = 10.0 / (count - 1) as f64;
    let mass = integrate(&grid, step * step);
    assert!((mass - 1.0).abs() < 1e-3, "mass = {mass}");
}

#[test]
fn single_point_input_never_yields_nan() {
    let result = SurfacePipeline::default().run(&[-2.0], &[-2.0]).unwrap();
    let point = result.points.get(0, 0);
    assert!(point.z.is_finite() && point.z > 0.0);
    assert_eq!(result.colors.as_ref().unwrap().get(0, 0), &0.0);

    let strict = SurfacePipeline::new(SurfaceSettings {
        spacing_policy: SpacingPolicy::Reject,
        ..SurfaceSettings::default()
    });
    assert_eq!(
        strict.run(&[-2.0], &[-2.0]).unwrap_err(),
        SurfaceError::NumericDegeneracy { row: 0, column: 0 }
    );

    let legacy = SurfacePipeline::new(SurfaceSettings {
        estimator: EstimatorMode::Legacy,
        ..SurfaceSettings::default()
    });
    assert!(matches!(
        legacy.run(&[-2.0], &[-2.0]),
        Err(SurfaceError::DegenerateInput(_))
    ));
}

#[test]
fn vanishing_spread_is_degenerate_without_jitter() {
    let axis = [0.0, 1e-80];
    for settings in [
        SurfaceSettings {
            estimator: EstimatorMode::Legacy,
            ..SurfaceSettings::default()
        },
        SurfaceSettings {
            regularization: 0.0,
            ..SurfaceSettings::default()
        },
    ] {
        assert!(matches!(
            SurfacePipeline::new(settings).run(&axis, &axis),
            Err(SurfaceError::DegenerateInput(_))
        ));
    }

    let jittered = SurfacePipeline::default().run(&axis, &axis).unwrap();
    assert!(jittered.points.iter().all(|p| p.z.is_finite() && p.z > 0.0));
}

#[test]
fn empty_axis_surfaces_invalid_input() {
    let err = SurfacePipeline::default().run(&[], &[1.0, 2.0]).unwrap_err();
    assert!(matches!(err, SurfaceError::InvalidInput(_)));
}

#[test]
fn identical_inputs_produce_identical_results() {
    let settings = SurfaceSettings {
        color_coding: ColorCoding::ByGradientY,
        ..SurfaceSettings::default()
    };
    let pipeline = SurfacePipeline::new(settings);
    let first = pipeline.run_configured().unwrap();
    let second = pipeline.run_configured().unwrap();
    assert_eq!(first.points, second.points);
    assert_eq!(first.colors, second.colors);
}
