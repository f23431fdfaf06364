// src/spawn/obstacles.rs
//! One obstacle per platform group, groups visited in seeded-shuffle order.

use bevy::prelude::*;
use rand::Rng;

use super::core::{OccupancyList, SpawnTuning};
use super::sampler::{point_on_surface, sample_on_platform};
use crate::geometry::core::{PlatformGeometry, SpawnCategory};

/// Seeded Fisher–Yates over `0..n`.
pub fn shuffled_indices(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }
    order
}

/// Place up to `min(requested, groups)` obstacles and commit them to `occupancy`.
pub fn plan_obstacles(
    geometry: &PlatformGeometry,
    requested: usize,
    player_anchor: Option<Vec2>,
    tuning: &SpawnTuning,
    rng: &mut impl Rng,
    occupancy: &mut OccupancyList,
) -> Vec<Vec2> {
    let groups = &geometry.groups;
    let target = requested.min(groups.len());
    let mut out = Vec::with_capacity(target);
    if target == 0 {
        return out;
    }

    let sep = tuning.min_separation;
    for gi in shuffled_indices(groups.len(), rng) {
        if out.len() >= target {
            break;
        }
        let group = &groups[gi];

        if groups.len() > 1 {
            if let Some(anchor) = player_anchor {
                if group.midpoint().distance(anchor) < tuning.avoid_player_spawn_radius {
                    debug!("Obstacles: group {gi} skipped, too close to player spawn");
                    continue;
                }
            }
        }

        let Some(&member) = group.members.get(rng.random_range(0..group.members.len().max(1))) else {
            continue;
        };
        let platform = &geometry.platforms[member];

        let first = sample_on_platform(platform, 0, tuning.along_edge_jitter, rng);
        let mut placed = (!occupancy.conflicts(first, sep, true)).then_some(first);

        if placed.is_none() && sep > 0.0 {
            for _ in 0..tuning.obstacle_attempts {
                let candidate = point_on_surface(platform, first.x + rng.random_range(-sep..=sep));
                if !occupancy.conflicts(candidate, sep, true) {
                    placed = Some(candidate);
                    break;
                }
            }
        }

        match placed {
            Some(p) => {
                occupancy.push(p, SpawnCategory::Obstacle);
                out.push(p);
            }
            None => debug!("Obstacles: group {gi} dropped after {} retries", tuning.obstacle_attempts),
        }
    }
    out
}
