// src/session/state.rs
//! Session-level values shared between passes, plus the pass handoff events.

use bevy::prelude::*;
use std::sync::Arc;

use crate::config::SessionDefaults;
use crate::geometry::core::{ContourSet, PlatformGeometry};
use crate::spawn::core::PlanSeed;
use crate::spawn::{PlanRequest, SpawnPlan};

/// The one place cross-pass state lives. Written by the pass scheduler (start)
/// and the pass collector (finish); everything else reads.
#[derive(Resource, Clone, Debug)]
pub struct PlatformerSession {
    pub seed: PlanSeed,
    pub obstacle_count: usize,
    pub item_count: usize,
    /// Which obstacle/item look the visual side should use.
    pub obstacle_variant: usize,
    pub item_variant: usize,
    /// Bumped every time a pass starts.
    pub generation: u64,
    /// Last contour input, kept so a regeneration can rerun without new input.
    pub contours: Option<Arc<ContourSet>>,
    pub geometry: Option<Arc<PlatformGeometry>>,
    pub last_plan: Option<SpawnPlan>,
}

impl Default for PlatformerSession {
    fn default() -> Self {
        Self::from_defaults(&SessionDefaults::default())
    }
}

impl PlatformerSession {
    pub fn from_defaults(d: &SessionDefaults) -> Self {
        Self {
            seed: PlanSeed(d.random_seed),
            obstacle_count: d.obstacle_count,
            item_count: d.item_count,
            obstacle_variant: 0,
            item_variant: 0,
            generation: 0,
            contours: None,
            geometry: None,
            last_plan: None,
        }
    }

    #[inline]
    pub fn plan_request(&self) -> PlanRequest {
        PlanRequest { seed: self.seed, obstacles: self.obstacle_count, items: self.item_count }
    }

    /// Fold a regeneration request's overrides into the session.
    pub fn apply(&mut self, req: &RegenerateRequested) {
        if let Some(seed) = req.seed {
            self.seed = PlanSeed(seed);
        }
        if let Some(n) = req.obstacles {
            self.obstacle_count = n;
        }
        if let Some(n) = req.items {
            self.item_count = n;
        }
        if let Some(v) = req.obstacle_variant {
            self.obstacle_variant = v;
        }
        if let Some(v) = req.item_variant {
            self.item_variant = v;
        }
    }
}

/// Counts for display only ("collect N of N", platforms detected, ...).
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub generation: u64,
    pub platforms: usize,
    pub groups: usize,
    pub obstacles_placed: usize,
    pub obstacles_requested: usize,
    pub items_placed: usize,
    pub items_requested: usize,
}

// ---------- Events ----------

/// New contour input; starts a fresh pass and supersedes any running one.
#[derive(Event, Clone, Debug)]
pub struct BuildPassRequested(pub ContourSet);

/// Rerun on the current contours with any overrides applied.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct RegenerateRequested {
    pub seed: Option<u64>,
    pub obstacles: Option<usize>,
    pub items: Option<usize>,
    pub obstacle_variant: Option<usize>,
    pub item_variant: Option<usize>,
}

/// Fired exactly once per finished pass; consumers react instead of polling.
#[derive(Event, Clone, Debug)]
pub struct PassCompleted {
    pub generation: u64,
    pub geometry: Arc<PlatformGeometry>,
    pub plan: SpawnPlan,
}

/// The pass (or its input) failed; nothing from it will be instantiated.
#[derive(Event, Clone, Debug)]
pub struct PassFailed {
    pub generation: u64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regenerate_overrides_only_what_is_set() {
        let mut s = PlatformerSession::default();
        let before = s.clone();
        s.apply(&RegenerateRequested { items: Some(12), ..Default::default() });
        assert_eq!(s.item_count, 12);
        assert_eq!(s.seed, before.seed);
        assert_eq!(s.obstacle_count, before.obstacle_count);
        assert_eq!(s.plan_request().items, 12);
    }
}
