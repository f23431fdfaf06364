// src/spawn/mod.rs
//! Deterministic obstacle/item planning on top of platform geometry.

pub mod core;
pub mod sampler;
pub mod obstacles;
pub mod items;
pub mod planner;

pub use self::core::{PlanRequest, SpawnPlan, SpawnTuning};
pub use planner::plan_spawns;
