// src/geometry/simplify.rs
//! Open-polyline cleanup: near-duplicate removal, then Douglas-Peucker.
//! Both passes keep order and the original endpoints.

use bevy::prelude::*;

/// Full simplification: dedupe at `min_dist`, then Douglas-Peucker at `epsilon`.
pub fn simplify_polyline(points: &[Vec2], min_dist: f32, epsilon: f32) -> Vec<Vec2> {
    let deduped = remove_near_duplicates(points, min_dist);
    douglas_peucker(&deduped, epsilon)
}

/// Drop points closer than `min_dist` to the last kept point.
/// The true last point always survives; it replaces a kept neighbour it crowds.
pub fn remove_near_duplicates(points: &[Vec2], min_dist: f32) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let min_d2 = min_dist * min_dist;
    let last = points[points.len() - 1];

    let mut out: Vec<Vec2> = Vec::with_capacity(points.len());
    out.push(points[0]);
    for &p in &points[1..points.len() - 1] {
        if let Some(prev) = out.last() {
            if prev.distance_squared(p) < min_d2 {
                continue;
            }
        }
        out.push(p);
    }

    // Endpoint: if it crowds the last kept interior point, that interior point goes.
    if out.len() >= 2 {
        if let Some(&prev) = out.last() {
            if prev.distance_squared(last) < min_d2 {
                out.pop();
            }
        }
    }
    out.push(last);
    out
}

/// Douglas-Peucker on an open polyline. Endpoints are always kept.
pub fn douglas_peucker(points: &[Vec2], epsilon: f32) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    mark_range(points, 0, points.len() - 1, epsilon, &mut keep);

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn mark_range(points: &[Vec2], first: usize, last: usize, epsilon: f32, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let (a, b) = (points[first], points[last]);

    let mut max_dist = 0.0f32;
    let mut max_idx = first;
    for (i, &p) in points.iter().enumerate().take(last).skip(first + 1) {
        let d = perpendicular_distance(p, a, b);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        keep[max_idx] = true;
        mark_range(points, first, max_idx, epsilon, keep);
        mark_range(points, max_idx, last, epsilon, keep);
    }
}

/// Distance from `p` to the infinite line through `a`/`b` (to `a` if they coincide).
fn perpendicular_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len = ab.length();
    if len <= f32::EPSILON {
        return p.distance(a);
    }
    ab.perp_dot(p - a).abs() / len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_run_collapses_to_endpoints() {
        let pts: Vec<Vec2> = (0..8).map(|i| Vec2::new(200.0 + i as f32 * 57.0, 300.0)).collect();
        let out = simplify_polyline(&pts, 1.5, 2.0);
        assert_eq!(out, vec![pts[0], pts[7]]);
    }

    #[test]
    fn keeps_a_peak_above_epsilon() {
        let pts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.5),
            Vec2::new(10.0, 8.0),
            Vec2::new(15.0, 0.4),
            Vec2::new(20.0, 0.0),
        ];
        let out = douglas_peucker(&pts, 2.0);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], Vec2::new(10.0, 8.0));
    }

    #[test]
    fn near_duplicates_are_dropped_but_endpoints_survive() {
        let pts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.2, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(9.9, 0.0),
            Vec2::new(10.0, 0.0),
        ];
        let out = remove_near_duplicates(&pts, 1.0);
        assert_eq!(out, vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(10.0, 0.0)]);
    }

    #[test]
    fn output_never_grows_and_endpoints_are_exact() {
        let pts: Vec<Vec2> = (0..50)
            .map(|i| {
                let x = i as f32 * 3.0;
                Vec2::new(x, (x * 0.37).sin() * 6.0 + 100.0)
            })
            .collect();
        for eps in [0.0, 0.5, 2.0, 10.0] {
            let out = simplify_polyline(&pts, 1.0, eps);
            assert!(out.len() <= pts.len());
            assert_eq!(out.first(), pts.first());
            assert_eq!(out.last(), pts.last());
        }
    }

    #[test]
    fn tiny_inputs_pass_through() {
        assert!(simplify_polyline(&[], 1.0, 1.0).is_empty());
        let one = [Vec2::new(1.0, 1.0)];
        assert_eq!(simplify_polyline(&one, 1.0, 1.0), one.to_vec());
    }
}
