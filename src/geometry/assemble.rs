// src/geometry/assemble.rs
//! Pixel polyline → local-space `Platform`.

use bevy::prelude::*;

use super::core::{GeometryConfig, GeometryRejected, Platform};

/// Maps pixel coordinates into local space: origin at the image centre, y up.
#[derive(Clone, Copy, Debug)]
pub struct PixelToLocal {
    pub half_size: Vec2,
    pub pixels_per_unit: f32,
}

impl PixelToLocal {
    pub fn new(image_size: UVec2, pixels_per_unit: f32) -> Self {
        Self {
            half_size: image_size.as_vec2() * 0.5,
            pixels_per_unit: pixels_per_unit.max(f32::EPSILON),
        }
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x - self.half_size.x) / self.pixels_per_unit,
            -(p.y - self.half_size.y) / self.pixels_per_unit,
        )
    }
}

/// Build a platform from a simplified pixel polyline.
/// Rejects anything narrower than `min_edge_width_world`.
pub fn assemble_platform(
    pixels: &[Vec2],
    xf: PixelToLocal,
    cfg: &GeometryConfig,
    source: usize,
) -> Result<Platform, GeometryRejected> {
    if pixels.len() < 2 {
        return Err(GeometryRejected::SimplifiedTooShort(pixels.len()));
    }

    let mut points: Vec<Vec2> = pixels.iter().map(|&p| xf.apply(p)).collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut top_y = f32::NEG_INFINITY;
    for p in &points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        top_y = top_y.max(p.y);
    }

    let width = max_x - min_x;
    if width < cfg.min_edge_width_world {
        return Err(GeometryRejected::TooNarrow { width, min: cfg.min_edge_width_world });
    }

    Ok(Platform {
        points,
        min_x,
        max_x,
        top_y,
        thickness: cfg.edge_thickness_world,
        one_way: cfg.one_way,
        source,
    })
}
