// src/geometry/silhouette.rs
//! Top-edge height field of a polygon: for evenly spaced x, the smallest pixel y
//! (visually highest point) where any edge crosses that x.

use bevy::prelude::*;

use super::core::ContourPolygon;

/// Sample the topmost boundary of `poly` at `samples` evenly spaced x positions.
///
/// Returns an x-sorted pixel-space polyline. Empty when the x-extent is under one
/// pixel; may hold fewer than 2 points for pathological input, which callers skip.
pub fn top_silhouette(poly: &ContourPolygon, samples: usize) -> Vec<Vec2> {
    let Some((min_x, max_x)) = poly.x_extent() else { return Vec::new() };
    if max_x - min_x < 1 {
        return Vec::new();
    }

    let n = samples.max(2);
    let span = (max_x - min_x) as f32;
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        // Pin the last sample to max_x so float drift can't leave the extent.
        let x = if i == n - 1 {
            max_x as f32
        } else {
            min_x as f32 + span * (i as f32 / (n - 1) as f32)
        };
        if let Some(y) = top_y_at(&poly.outer, x) {
            out.push(Vec2::new(x, y));
        }
    }
    out
}

/// Smallest y over every edge (closing edge included) whose x-span covers `x`.
fn top_y_at(ring: &[IVec2], x: f32) -> Option<f32> {
    let n = ring.len();
    let mut best: Option<f32> = None;

    for i in 0..n {
        let a = ring[i].as_vec2();
        let b = ring[(i + 1) % n].as_vec2();
        let (lo, hi) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
        if x < lo || x > hi {
            continue;
        }

        let y = if (b.x - a.x).abs() <= f32::EPSILON {
            // Vertical edge: its top end is the candidate.
            a.y.min(b.y)
        } else {
            let t = (x - a.x) / (b.x - a.x);
            a.y + (b.y - a.y) * t
        };

        best = Some(match best {
            Some(cur) => cur.min(y),
            None => y,
        });
    }
    best
}
