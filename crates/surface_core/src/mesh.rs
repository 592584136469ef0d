//! Renderer-facing vertex/index payload built from a [`SurfaceResult`].
//!
//! The layout is plain `#[repr(C)]` data so any backend can upload it directly.

use crate::config::ColorCoding;
use crate::error::{Result, SurfaceError};
use crate::grid::Grid;
use crate::metrics::finite_range;
use crate::pipeline::SurfaceResult;
use crate::Scalar;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    /// Texture coordinate into the color gradient, in `[0, 1]`.
    pub color_coord: f32,
}

const _: () = assert!(core::mem::size_of::<SurfaceVertex>() == 16);

impl SurfaceVertex {
    pub fn new(position: [f32; 3], color_coord: f32) -> Self {
        Self {
            position,
            color_coord,
        }
    }
}

/// One vertex per grid point, in row-major order.
pub fn build_vertices(result: &SurfaceResult) -> Vec<SurfaceVertex> {
    let coords = match (&result.colors, result.color_coding) {
        (Some(colors), ColorCoding::ByGradientY) => normalized_color_coords(colors),
        _ => vec![0.0; result.points.len()],
    };

    result
        .points
        .iter()
        .zip(coords)
        .map(|(p, coord)| SurfaceVertex::new(p.as_vec3().to_array(), coord))
        .collect()
}

/// Maps color values onto `[0, 1]` over their finite range; a flat field maps to 0.5.
pub fn normalized_color_coords(colors: &Grid<Scalar>) -> Vec<f32> {
    let Some((lo, hi)) = finite_range(colors.as_slice()) else {
        return vec![0.5; colors.len()];
    };
    let span = hi - lo;
    colors
        .iter()
        .map(|&v| {
            if span <= 0.0 || !v.is_finite() {
                0.5
            } else {
                ((v - lo) / span).clamp(0.0, 1.0) as f32
            }
        })
        .collect()
}

/// Two counter-clockwise triangles per grid cell.
///
/// Fails when the vertex count does not fit the `u32` index type.
pub fn triangle_indices(rows: usize, columns: usize) -> Result<Vec<u32>> {
    let vertex_count = rows.checked_mul(columns).and_then(|n| u32::try_from(n).ok());
    if vertex_count.is_none() {
        return Err(SurfaceError::InvalidInput(format!(
            "{rows}x{columns} grid exceeds the u32 vertex index range"
        )));
    }
    if rows < 2 || columns < 2 {
        return Ok(Vec::new());
    }
    let mut indices = Vec::with_capacity(6 * (rows - 1) * (columns - 1));
    for i in 0..rows - 1 {
        for j in 0..columns - 1 {
            let v00 = (i * columns + j) as u32;
            let v01 = v00 + 1;
            let v10 = v00 + columns as u32;
            let v11 = v10 + 1;
            indices.extend_from_slice(&[v00, v01, v11, v00, v11, v10]);
        }
    }
    Ok(indices)
}
