// src/spawn/core.rs
//! Core types for deterministic obstacle/item planning on platform geometry.

use bevy::prelude::*; // Vec2
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::core::SpawnCategory;

/// Determinism key; identical seed + geometry gives an identical plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanSeed(pub u64);

impl PlanSeed {
    /// The one RNG a planning pass draws from, in a fixed order.
    #[inline]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0 ^ 0x9E37_79B9_7F4A_7C15u64)
    }
}

/// Placement conflict-resolution knobs (data form, loaded from RON).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Two committed points closer than this conflict.
    pub min_separation: f32,
    /// Horizontal step for the beside-fallback.
    pub side_shift: f32,
    /// Vertical step for the float-above fallback.
    pub float_above_offset: f32,
    /// Groups whose midpoint is this close to the player spawn get no obstacle.
    pub avoid_player_spawn_radius: f32,
    /// Max random offset (local units) along a platform when sampling.
    pub along_edge_jitter: f32,
    /// Whether items also keep clear of earlier items (not only obstacles).
    pub avoid_item_overlap: bool,
    /// Jitter retries before an obstacle is dropped.
    pub obstacle_attempts: u32,
    /// Jitter retries around the floated point before an item is dropped.
    pub item_attempts: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            min_separation: 0.6,
            side_shift: 0.7,
            float_above_offset: 0.8,
            avoid_player_spawn_radius: 1.5,
            along_edge_jitter: 0.15,
            avoid_item_overlap: true,
            obstacle_attempts: 8,
            item_attempts: 8,
        }
    }
}

/// What to plan for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanRequest {
    pub seed: PlanSeed,
    pub obstacles: usize,
    pub items: usize,
}

/// Output of one planning pass. Counts may fall short of the request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnPlan {
    pub obstacles: Vec<Vec2>,
    pub items: Vec<Vec2>,
    pub requested_obstacles: usize,
    pub requested_items: usize,
}

impl SpawnPlan {
    #[inline]
    pub fn obstacle_count(&self) -> usize { self.obstacles.len() }
    #[inline]
    pub fn item_count(&self) -> usize { self.items.len() }
}

/// Points committed so far in the current pass. Only grows.
#[derive(Clone, Debug, Default)]
pub struct OccupancyList {
    entries: Vec<(Vec2, SpawnCategory)>,
}

impl OccupancyList {
    pub fn push(&mut self, p: Vec2, category: SpawnCategory) {
        self.entries.push((p, category));
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn relevant(&self, with_items: bool) -> impl Iterator<Item = Vec2> + '_ {
        self.entries
            .iter()
            .filter(move |(_, c)| with_items || *c != SpawnCategory::Item)
            .map(|(p, _)| *p)
    }

    /// True if any relevant point is closer than `min_sep`.
    pub fn conflicts(&self, p: Vec2, min_sep: f32, with_items: bool) -> bool {
        let min_d2 = min_sep * min_sep;
        self.relevant(with_items).any(|q| q.distance_squared(p) < min_d2)
    }

    /// Closest relevant point that is closer than `min_sep`, first one wins ties.
    pub fn nearest_conflict(&self, p: Vec2, min_sep: f32, with_items: bool) -> Option<Vec2> {
        let min_d2 = min_sep * min_sep;
        let mut best: Option<(f32, Vec2)> = None;
        for q in self.relevant(with_items) {
            let d2 = q.distance_squared(p);
            if d2 >= min_d2 {
                continue;
            }
            if best.is_none_or(|(bd, _)| d2 < bd) {
                best = Some((d2, q));
            }
        }
        best.map(|(_, q)| q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = PlanSeed(7).rng();
        let mut b = PlanSeed(7).rng();
        for _ in 0..16 {
            assert_eq!(a.random::<u32>(), b.random::<u32>());
        }
    }

    #[test]
    fn item_entries_ignored_unless_requested() {
        let mut occ = OccupancyList::default();
        occ.push(Vec2::ZERO, SpawnCategory::Item);
        occ.push(Vec2::new(5.0, 0.0), SpawnCategory::Obstacle);
        assert!(occ.conflicts(Vec2::new(0.1, 0.0), 0.5, true));
        assert!(!occ.conflicts(Vec2::new(0.1, 0.0), 0.5, false));
        assert_eq!(occ.nearest_conflict(Vec2::new(4.8, 0.0), 0.5, false), Some(Vec2::new(5.0, 0.0)));
        assert_eq!(occ.nearest_conflict(Vec2::new(2.5, 0.0), 0.5, true), None);
    }
}
