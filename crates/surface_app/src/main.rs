//! Headless driver: computes a density surface and publishes it to the log and, optionally, JSON.

use std::{env, fs, path::PathBuf};

use anyhow::{bail, Context as _, Result};
use surface_core::{
    mesh::{build_vertices, triangle_indices},
    metrics::integrate,
    ColorCoding, SurfaceModel, SurfaceResult, SurfaceSettings,
};
use tracer::init_tracing;

#[derive(Debug, Default)]
struct Args {
    settings: Option<PathBuf>,
    mode: Option<ColorCoding>,
    output: Option<PathBuf>,
    print_settings: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    for arg in env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--settings=") {
            args.settings = Some(PathBuf::from(value));
        } else if let Some(value) = arg.strip_prefix("--mode=") {
            args.mode = Some(
                ColorCoding::parse(value)
                    .context("invalid value for --mode (expected 'lights' or 'gradient')")?,
            );
        } else if let Some(value) = arg.strip_prefix("--output=") {
            args.output = Some(PathBuf::from(value));
        } else if arg == "--print-settings" {
            args.print_settings = true;
        } else {
            bail!("unrecognized argument '{arg}'");
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    init_tracing();
    tracing::info!(version = surface_core::version_string(), "starting");

    let args = parse_args()?;
    let mut settings = match &args.settings {
        Some(path) => SurfaceSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => SurfaceSettings::default(),
    };
    if let Some(mode) = args.mode {
        settings.color_coding = mode;
    }
    if args.print_settings {
        let json = settings
            .to_json_string()
            .context("failed to serialize settings")?;
        println!("{json}");
        return Ok(());
    }

    let (xs, ys) = settings.axes().context("failed to resolve coordinate axes")?;

    let mut model = SurfaceModel::new(settings);
    model.subscribe(log_summary);
    let result = model
        .update(&xs, &ys)
        .context("failed to compute density surface")?;

    let vertices = build_vertices(&result);
    let indices = triangle_indices(result.rows(), result.columns())
        .context("failed to build mesh indices")?;
    tracing::info!(
        vertices = vertices.len(),
        triangles = indices.len() / 3,
        bytes = std::mem::size_of_val(vertices.as_slice()),
        "mesh payload ready"
    );

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(result.as_ref())
            .context("failed to serialize surface result")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write surface to {}", path.display()))?;
        tracing::info!(path = %path.display(), "surface written");
    }

    Ok(())
}

fn log_summary(result: &SurfaceResult) {
    let dist = &result.distribution;
    let mass = integrate(&result.density_grid(), result.bounds.cell_area());
    tracing::info!(
        rows = result.rows(),
        columns = result.columns(),
        mean = %dist.mean(),
        covariance = %dist.covariance(),
        grid_mass = mass,
        "surface published"
    );
    if let Some((row, column, density)) = result.peak() {
        let at = result.points.get(row, column);
        tracing::info!(row, column, density, x = at.x, y = at.y, "density peak");
    }
    match result.color_range() {
        Some((lo, hi)) => tracing::info!(lo, hi, "gradient color range"),
        None => tracing::info!(mode = ?result.color_coding, "no color values"),
    }
}

mod tracer {
    use tracing_subscriber::EnvFilter;

    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}
