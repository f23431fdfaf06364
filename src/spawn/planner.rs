// src/spawn/planner.rs
//! Whole planning pass: obstacles first, then items, from a single seeded stream.

use bevy::prelude::*;

use super::core::{OccupancyList, PlanRequest, SpawnPlan, SpawnTuning};
use super::items::plan_items;
use super::obstacles::plan_obstacles;
use crate::geometry::core::PlatformGeometry;

/// Plan obstacles and items for `geometry`. Pure and deterministic in
/// (`geometry`, `request`, `tuning`); no state survives between calls.
pub fn plan_spawns(geometry: &PlatformGeometry, request: PlanRequest, tuning: &SpawnTuning) -> SpawnPlan {
    let mut rng = request.seed.rng();
    let mut occupancy = OccupancyList::default();
    let anchor = geometry.player_spawn_anchor();

    let obstacles = plan_obstacles(geometry, request.obstacles, anchor, tuning, &mut rng, &mut occupancy);
    let items = plan_items(geometry, request.items, tuning, &mut rng, &mut occupancy);

    debug!(
        "Plan seed={}: obstacles {}/{} items {}/{}",
        request.seed.0,
        obstacles.len(),
        request.obstacles,
        items.len(),
        request.items
    );

    SpawnPlan {
        obstacles,
        items,
        requested_obstacles: request.obstacles,
        requested_items: request.items,
    }
}
