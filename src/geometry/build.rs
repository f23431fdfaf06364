// src/geometry/build.rs
//! Full geometry pass: contours → silhouettes → simplified polylines → platforms → groups.

use bevy::prelude::*;

use super::assemble::{assemble_platform, PixelToLocal};
use super::core::{ContourPolygon, ContourSet, GeometryConfig, GeometryRejected, Platform, PlatformGeometry};
use super::ingest::{parse_artifact, ContourError};
use super::merge::{merge_platforms, MergeParams};
use super::silhouette::top_silhouette;
use super::simplify::simplify_polyline;

/// Run every stage for one polygon. `Err` means "skip this polygon".
pub fn platform_from_polygon(
    index: usize,
    poly: &ContourPolygon,
    image_area: f32,
    xf: PixelToLocal,
    cfg: &GeometryConfig,
) -> Result<Platform, GeometryRejected> {
    let area = poly.area();
    let min_area = cfg.min_area_frac * image_area;
    if area < min_area {
        return Err(GeometryRejected::AreaTooSmall { area, min: min_area });
    }

    if let Some((lo, hi)) = poly.x_extent() {
        if hi - lo < 1 {
            return Err(GeometryRejected::DegenerateExtent { width: hi - lo });
        }
    }

    let silhouette = top_silhouette(poly, cfg.top_edge_samples);
    if silhouette.len() < 2 {
        return Err(GeometryRejected::SilhouetteTooShort(silhouette.len()));
    }

    let simplified = simplify_polyline(&silhouette, cfg.dedupe_min_pixels, cfg.simplify_epsilon_pixels);
    if simplified.len() < 2 {
        return Err(GeometryRejected::SimplifiedTooShort(simplified.len()));
    }

    assemble_platform(&simplified, xf, cfg, index)
}

/// Build platforms and groups for a whole contour set.
/// Fails only when nothing survives; single-polygon rejections are logged and skipped.
pub fn build_platforms(set: &ContourSet, cfg: &GeometryConfig) -> Result<PlatformGeometry, BuildError> {
    let cfg = cfg.sanitized();
    let xf = PixelToLocal::new(set.image_size, cfg.pixels_per_unit);
    let image_area = set.image_area();

    let mut platforms = Vec::with_capacity(set.polygons.len());
    for (i, poly) in set.polygons.iter().enumerate() {
        match platform_from_polygon(i, poly, image_area, xf, &cfg) {
            Ok(p) => platforms.push(p),
            Err(reason) => debug!(
                "Geometry: polygon {} ({}) skipped: {}",
                i,
                poly.label.as_deref().unwrap_or("unlabelled"),
                reason
            ),
        }
    }

    if platforms.is_empty() {
        warn!("Geometry: no platforms built from {} polygons", set.polygons.len());
        return Err(BuildError::NoPlatformsBuilt { polygons: set.polygons.len() });
    }

    let groups = merge_platforms(
        &platforms,
        MergeParams {
            y_epsilon: cfg.merge_y_epsilon,
            x_gap_epsilon: cfg.merge_x_gap_epsilon,
            strategy: cfg.merge_strategy,
        },
    );

    debug!(
        "Geometry: {} polygons -> {} platforms in {} groups",
        set.polygons.len(),
        platforms.len(),
        groups.len()
    );

    Ok(PlatformGeometry { image_size: set.image_size, platforms, groups })
}

/// Parse an artifact and build its geometry in one go.
pub fn build_from_artifact(bytes: &[u8], cfg: &GeometryConfig) -> Result<PlatformGeometry, BuildError> {
    let set = parse_artifact(bytes)?;
    build_platforms(&set, cfg)
}

// ---------- Run-level errors ----------

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("contour artifact rejected: {0}")]
    Parse(#[from] ContourError),
    #[error("no platforms survived from {polygons} polygons")]
    NoPlatformsBuilt { polygons: usize },
}
