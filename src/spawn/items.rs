// src/spawn/items.rs
//! Round-robin item placement across raw platforms with a beside/above fallback chain.

use bevy::prelude::*;
use rand::Rng;

use super::core::{OccupancyList, SpawnTuning};
use super::sampler::sample_on_platform;
use crate::geometry::core::{Platform, PlatformGeometry, SpawnCategory};

/// Place up to `requested` items, cycling platforms in order.
/// Each platform tracks its own slot count so repeated visits spread out.
pub fn plan_items(
    geometry: &PlatformGeometry,
    requested: usize,
    tuning: &SpawnTuning,
    rng: &mut impl Rng,
    occupancy: &mut OccupancyList,
) -> Vec<Vec2> {
    let platforms = &geometry.platforms;
    let mut out = Vec::with_capacity(requested);
    if requested == 0 || platforms.is_empty() {
        return out;
    }

    let budget = requested.saturating_mul(4).saturating_add(platforms.len());
    let mut slots = vec![0usize; platforms.len()];
    let mut consumed = 0usize;
    let mut dropped = 0usize;

    for step in 0..budget {
        if consumed >= requested {
            break;
        }
        let pi = step % platforms.len();
        let platform = &platforms[pi];
        if platform.points.len() < 2 || platform.width() <= 0.0 {
            continue;
        }

        let slot = slots[pi];
        slots[pi] += 1;
        consumed += 1;

        let candidate = sample_on_platform(platform, slot, tuning.along_edge_jitter, rng);
        match resolve_conflict(candidate, platform, occupancy, tuning, rng) {
            Some(p) => {
                occupancy.push(p, SpawnCategory::Item);
                out.push(p);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("Items: {dropped} of {requested} dropped, no free spot after fallbacks");
    }
    out
}

/// Accept `candidate` or walk the fallbacks: beside left, beside right,
/// float above, then jitter around the floated point.
fn resolve_conflict(
    candidate: Vec2,
    platform: &Platform,
    occupancy: &OccupancyList,
    tuning: &SpawnTuning,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    let sep = tuning.min_separation;
    let with_items = tuning.avoid_item_overlap;
    let free = |p: Vec2| !occupancy.conflicts(p, sep, with_items);

    let Some(nearest) = occupancy.nearest_conflict(candidate, sep, with_items) else {
        return Some(candidate);
    };

    for dir in [-1.0f32, 1.0] {
        let x = nearest.x + dir * tuning.side_shift;
        if let Some(y) = platform.surface_y_at(x) {
            let beside = Vec2::new(x, y);
            if free(beside) {
                return Some(beside);
            }
        }
    }

    let floated = nearest + Vec2::Y * tuning.float_above_offset;
    if free(floated) {
        return Some(floated);
    }

    let dx = tuning.side_shift.abs();
    let dy = tuning.float_above_offset.abs();
    for _ in 0..tuning.item_attempts {
        let jitter = Vec2::new(rng.random_range(-dx..=dx), rng.random_range(0.0..=dy));
        let p = floated + jitter;
        if free(p) {
            return Some(p);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::core::PlanSeed;

    fn single_flat() -> PlatformGeometry {
        let p = Platform {
            points: vec![Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0)],
            min_x: -2.0,
            max_x: 2.0,
            top_y: 0.0,
            thickness: 0.1,
            one_way: true,
            source: 0,
        };
        PlatformGeometry { image_size: UVec2::new(400, 400), platforms: vec![p], groups: Vec::new() }
    }

    fn exact() -> SpawnTuning {
        SpawnTuning { along_edge_jitter: 0.0, ..Default::default() }
    }

    #[test]
    fn conflict_shifts_left_first() {
        let geo = single_flat();
        let mut occ = OccupancyList::default();
        occ.push(Vec2::ZERO, SpawnCategory::Obstacle);
        let items = plan_items(&geo, 2, &exact(), &mut PlanSeed(5).rng(), &mut occ);
        assert_eq!(items.len(), 2);
        assert!((items[0] - Vec2::new(-0.7, 0.0)).length() < 1e-5);
        // Slot 1 lands right next to the first item and gets pushed further left.
        assert!((items[1] - Vec2::new(-1.4, 0.0)).length() < 1e-5);
        assert_eq!(occ.len(), 3);
    }

    #[test]
    fn blocked_sides_float_above() {
        let geo = single_flat();
        let mut occ = OccupancyList::default();
        for x in [-0.7, 0.0, 0.7] {
            occ.push(Vec2::new(x, 0.0), SpawnCategory::Obstacle);
        }
        let items = plan_items(&geo, 1, &exact(), &mut PlanSeed(5).rng(), &mut occ);
        assert_eq!(items, vec![Vec2::new(0.0, 0.8)]);
    }

    #[test]
    fn blocked_left_shifts_right() {
        let geo = single_flat();
        let mut occ = OccupancyList::default();
        occ.push(Vec2::ZERO, SpawnCategory::Obstacle);
        occ.push(Vec2::new(-0.7, 0.0), SpawnCategory::Obstacle);
        let items = plan_items(&geo, 1, &exact(), &mut PlanSeed(5).rng(), &mut occ);
        assert_eq!(items.len(), 1);
        assert!((items[0] - Vec2::new(0.7, 0.0)).length() < 1e-5);
    }

    #[test]
    fn left_past_platform_edge_shifts_right() {
        let geo = single_flat();
        let mut occ = OccupancyList::default();
        occ.push(Vec2::new(-1.5, 0.0), SpawnCategory::Obstacle);
        // -1.5 - 0.7 is off the platform, so the left option does not exist.
        let p = resolve_conflict(
            Vec2::new(-1.5, 0.0),
            &geo.platforms[0],
            &occ,
            &exact(),
            &mut PlanSeed(5).rng(),
        );
        let p = p.unwrap();
        assert!((p - Vec2::new(-0.8, 0.0)).length() < 1e-5);
    }

    #[test]
    fn blocked_float_jitters_around_it() {
        let geo = single_flat();
        let tuning = SpawnTuning { item_attempts: 64, ..exact() };
        let mut occ = OccupancyList::default();
        for p in [Vec2::ZERO, Vec2::new(-0.7, 0.0), Vec2::new(0.7, 0.0), Vec2::new(0.0, 0.8)] {
            occ.push(p, SpawnCategory::Obstacle);
        }
        let floated = Vec2::new(0.0, 0.8);
        let resolve = |seed| resolve_conflict(Vec2::ZERO, &geo.platforms[0], &occ, &tuning, &mut PlanSeed(seed).rng());

        let p = resolve(11).unwrap();
        assert_ne!(p, floated);
        assert!(!occ.conflicts(p, tuning.min_separation, true));
        assert!((p.x - floated.x).abs() <= tuning.side_shift + 1e-5);
        assert!(p.y >= floated.y && p.y <= floated.y + tuning.float_above_offset + 1e-5);
        assert_eq!(resolve(11), Some(p));
    }

    #[test]
    fn impossible_items_are_dropped_not_fatal() {
        let geo = single_flat();
        let tuning = SpawnTuning { min_separation: 50.0, ..exact() };
        let mut occ = OccupancyList::default();
        occ.push(Vec2::ZERO, SpawnCategory::Obstacle);
        let items = plan_items(&geo, 4, &tuning, &mut PlanSeed(5).rng(), &mut occ);
        assert!(items.is_empty());
        assert_eq!(occ.len(), 1);
    }

    #[test]
    fn item_overlap_allowed_when_disabled() {
        let geo = single_flat();
        let tuning = SpawnTuning { avoid_item_overlap: false, ..exact() };
        let mut occ = OccupancyList::default();
        // Same platform, 4 items: slots 0 and 3+ may overlap each other freely.
        let items = plan_items(&geo, 4, &tuning, &mut PlanSeed(5).rng(), &mut occ);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0], Vec2::ZERO);
    }
}
