// src/geometry/core.rs
//! Core types for contour → platform extraction.
//! Keep this file dependency-light; every stage in `geometry` builds on it.

use bevy::prelude::*; // IVec2, Vec2, UVec2
use serde::{Deserialize, Serialize};

// ---------- Tuning ----------

/// How adjacent platforms are clustered into groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// First-match scan over groups in creation order.
    #[default]
    Greedy,
    /// Union-find over a symmetric adjacency test; independent of input order.
    Connected,
}

/// Geometry extraction knobs (data form, loaded from RON).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Pixels per local unit.
    pub pixels_per_unit: f32,
    /// Silhouette sampling density (16–256 typical).
    pub top_edge_samples: usize,
    /// Douglas-Peucker tolerance in pixels (0–10).
    pub simplify_epsilon_pixels: f32,
    /// Points closer than this to the last kept point are dropped.
    pub dedupe_min_pixels: f32,
    /// Polygons smaller than this fraction of the image are skipped.
    pub min_area_frac: f32,
    pub edge_thickness_world: f32,
    pub one_way: bool,
    pub merge_y_epsilon: f32,
    pub merge_x_gap_epsilon: f32,
    pub merge_strategy: MergeStrategy,
    pub min_edge_width_world: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: 100.0,
            top_edge_samples: 64,
            simplify_epsilon_pixels: 2.0,
            dedupe_min_pixels: 1.5,
            min_area_frac: 0.002,
            edge_thickness_world: 0.08,
            one_way: true,
            merge_y_epsilon: 0.15,
            merge_x_gap_epsilon: 0.15,
            merge_strategy: MergeStrategy::Greedy,
            min_edge_width_world: 0.3,
        }
    }
}

impl GeometryConfig {
    /// Clamp hand-edited values into workable ranges.
    pub fn sanitized(&self) -> Self {
        Self {
            pixels_per_unit: if self.pixels_per_unit > 0.0 { self.pixels_per_unit } else { 100.0 },
            top_edge_samples: self.top_edge_samples.clamp(2, 256),
            simplify_epsilon_pixels: self.simplify_epsilon_pixels.clamp(0.0, 10.0),
            dedupe_min_pixels: self.dedupe_min_pixels.max(0.0),
            min_area_frac: self.min_area_frac.clamp(0.0, 1.0),
            edge_thickness_world: self.edge_thickness_world.max(0.0),
            merge_y_epsilon: self.merge_y_epsilon.max(0.0),
            merge_x_gap_epsilon: self.merge_x_gap_epsilon.max(0.0),
            min_edge_width_world: self.min_edge_width_world.max(0.0),
            ..self.clone()
        }
    }
}

// ---------- Input side (pixel space) ----------

/// One segmented object outline as delivered by the segmentation step.
/// Pixel space: x grows right, y grows down. Implicitly closed.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourPolygon {
    pub outer: Vec<IVec2>,
    /// Optional producer metadata, carried through for logging only.
    pub label: Option<String>,
    pub area_px: Option<f32>,
    pub mask_index: Option<u32>,
}

impl ContourPolygon {
    pub fn new(outer: Vec<IVec2>) -> Self {
        Self { outer, label: None, area_px: None, mask_index: None }
    }

    /// Inclusive horizontal extent, `None` for an empty outline.
    pub fn x_extent(&self) -> Option<(i32, i32)> {
        let min = self.outer.iter().map(|p| p.x).min()?;
        let max = self.outer.iter().map(|p| p.x).max()?;
        Some((min, max))
    }

    /// Shoelace area in square pixels (orientation-independent).
    pub fn area(&self) -> f32 {
        let n = self.outer.len();
        if n < 3 {
            return 0.0;
        }
        // i32 cross terms can overflow i64.
        let mut twice: i128 = 0;
        for i in 0..n {
            let a = self.outer[i];
            let b = self.outer[(i + 1) % n];
            twice += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
        }
        (twice.unsigned_abs() as f64 * 0.5) as f32
    }
}

/// Validated output of the contour ingester.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourSet {
    pub image_size: UVec2,
    pub polygons: Vec<ContourPolygon>,
}

impl ContourSet {
    #[inline]
    pub fn image_area(&self) -> f32 {
        self.image_size.x as f32 * self.image_size.y as f32
    }
}

// ---------- Output side (local space) ----------

/// What an instantiated entity is, so collaborators never match on names.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnCategory {
    Platform,
    Obstacle,
    Item,
}

/// One walkable top surface in local space (y up).
#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
    /// Ordered by x, left to right.
    pub points: Vec<Vec2>,
    pub min_x: f32,
    pub max_x: f32,
    /// Highest local y along the surface.
    pub top_y: f32,
    /// Collision thickness handed to the physics side.
    pub thickness: f32,
    /// Objects may pass through from below only.
    pub one_way: bool,
    /// Index of the contour polygon this came from.
    pub source: usize,
}

impl Platform {
    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }

    /// Surface height at `x` by linear interpolation on the containing segment.
    /// Returns `None` outside `[min_x, max_x]`.
    pub fn surface_y_at(&self, x: f32) -> Option<f32> {
        if !self.contains_x(x) || self.points.is_empty() {
            return None;
        }
        if self.points.len() == 1 {
            return Some(self.points[0].y);
        }
        for seg in self.points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            if x >= a.x && x <= b.x {
                let dx = b.x - a.x;
                if dx <= f32::EPSILON {
                    return Some(a.y.max(b.y));
                }
                let t = (x - a.x) / dx;
                return Some(a.y + (b.y - a.y) * t);
            }
        }
        // Only reachable through float edge cases at the ends.
        self.points.last().map(|p| p.y)
    }
}

/// Platforms treated as one logical surface (one obstacle max).
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformGroup {
    /// Indices into `PlatformGeometry::platforms`.
    pub members: Vec<usize>,
    pub min_x: f32,
    pub max_x: f32,
    pub top_y: f32,
}

impl PlatformGroup {
    pub fn from_platform(index: usize, p: &Platform) -> Self {
        Self { members: vec![index], min_x: p.min_x, max_x: p.max_x, top_y: p.top_y }
    }

    pub fn absorb(&mut self, index: usize, p: &Platform) {
        self.members.push(index);
        self.min_x = self.min_x.min(p.min_x);
        self.max_x = self.max_x.max(p.max_x);
        self.top_y = self.top_y.max(p.top_y);
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        Vec2::new((self.min_x + self.max_x) * 0.5, self.top_y)
    }
}

/// Everything one geometry pass produces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformGeometry {
    pub image_size: UVec2,
    pub platforms: Vec<Platform>,
    pub groups: Vec<PlatformGroup>,
}

impl PlatformGeometry {
    /// Lowest, then leftmost, point across all platforms.
    pub fn player_spawn_anchor(&self) -> Option<Vec2> {
        self.platforms
            .iter()
            .flat_map(|p| p.points.iter().copied())
            .min_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
    }
}

// ---------- Per-polygon skip reasons ----------

/// Why a single polygon produced no platform. Never fatal for the run.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryRejected {
    #[error("polygon area {area:.1}px² below minimum {min:.1}px²")]
    AreaTooSmall { area: f32, min: f32 },
    #[error("degenerate x-extent ({width}px)")]
    DegenerateExtent { width: i32 },
    #[error("silhouette has {0} points, need at least 2")]
    SilhouetteTooShort(usize),
    #[error("simplified polyline has {0} points, need at least 2")]
    SimplifiedTooShort(usize),
    #[error("platform width {width:.3} below minimum {min:.3}")]
    TooNarrow { width: f32, min: f32 },
}
