// src/session/tasks.rs
//! Runs geometry + planning off the main thread, one pass at a time.

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;
use std::sync::Arc;

use super::instancing::PassEntity;
use super::state::{BuildPassRequested, PassCompleted, PassFailed, PassSummary, PlatformerSession, RegenerateRequested};
use crate::config::PipelineConfig;
use crate::geometry::core::{ContourSet, GeometryConfig, PlatformGeometry};
use crate::geometry::{build_platforms, BuildError};
use crate::spawn::{plan_spawns, PlanRequest, SpawnPlan, SpawnTuning};

/// What a finished pass hands back.
#[derive(Debug)]
pub struct PassOutput {
    pub geometry: PlatformGeometry,
    pub plan: SpawnPlan,
}

/// The pass itself, synchronous and pure. Geometry failures stop before planning.
pub fn run_pass(
    contours: &ContourSet,
    geometry_cfg: &GeometryConfig,
    request: PlanRequest,
    tuning: &SpawnTuning,
) -> Result<PassOutput, BuildError> {
    let geometry = build_platforms(contours, geometry_cfg)?;
    let plan = plan_spawns(&geometry, request, tuning);
    Ok(PassOutput { geometry, plan })
}

struct InFlightPass {
    generation: u64,
    task: Task<Result<PassOutput, BuildError>>,
}

/// At most one pass runs; dropping the task cancels it.
#[derive(Resource, Default)]
pub struct PassTasks {
    in_flight: Option<InFlightPass>,
}

impl PassTasks {
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Start a pass for new input or a regeneration. The newest request wins:
/// the running task is dropped and every entity from the last pass is despawned
/// before the new task is spawned.
pub fn schedule_pass(
    mut commands: Commands,
    mut builds: EventReader<BuildPassRequested>,
    mut regens: EventReader<RegenerateRequested>,
    mut tasks: ResMut<PassTasks>,
    mut session: ResMut<PlatformerSession>,
    config: Res<PipelineConfig>,
    existing: Query<Entity, With<PassEntity>>,
) {
    let new_input = builds.read().last().map(|ev| Arc::new(ev.0.clone()));
    let mut regenerate = false;
    for ev in regens.read() {
        session.apply(ev);
        regenerate = true;
    }

    match new_input {
        Some(contours) => session.contours = Some(contours),
        None if regenerate => {}
        None => return,
    }
    let Some(contours) = session.contours.clone() else {
        warn!("Pass: regeneration requested before any contours arrived");
        return;
    };

    if let Some(stale) = tasks.in_flight.take() {
        debug!("Pass: cancelling generation {}", stale.generation);
    }
    for e in &existing {
        commands.entity(e).despawn();
    }
    session.generation += 1;
    session.geometry = None;
    session.last_plan = None;

    let generation = session.generation;
    let request = session.plan_request();
    let geometry_cfg = config.geometry.clone();
    let tuning = config.placement.clone();

    info!(
        "Pass {}: {} polygons, seed={} obstacles={} items={}",
        generation,
        contours.polygons.len(),
        request.seed.0,
        request.obstacles,
        request.items
    );

    let task = AsyncComputeTaskPool::get()
        .spawn(async move { run_pass(&contours, &geometry_cfg, request, &tuning) });
    tasks.in_flight = Some(InFlightPass { generation, task });
}

/// Poll the running pass; on completion store the result and signal once.
pub fn collect_pass_result(
    mut tasks: ResMut<PassTasks>,
    mut session: ResMut<PlatformerSession>,
    mut summary: ResMut<PassSummary>,
    mut completed: EventWriter<PassCompleted>,
    mut failed: EventWriter<PassFailed>,
) {
    let Some(pass) = tasks.in_flight.as_mut() else { return };
    if !pass.task.is_finished() {
        return;
    }
    let Some(result) = future::block_on(future::poll_once(&mut pass.task)) else { return };
    let generation = pass.generation;
    tasks.in_flight = None;

    match result {
        Ok(PassOutput { geometry, plan }) => {
            let geometry = Arc::new(geometry);
            *summary = PassSummary {
                generation,
                platforms: geometry.platforms.len(),
                groups: geometry.groups.len(),
                obstacles_placed: plan.obstacle_count(),
                obstacles_requested: plan.requested_obstacles,
                items_placed: plan.item_count(),
                items_requested: plan.requested_items,
            };
            info!(
                "Pass {}: {} platforms / {} groups, obstacles {}/{}, items {}/{}",
                generation,
                summary.platforms,
                summary.groups,
                summary.obstacles_placed,
                summary.obstacles_requested,
                summary.items_placed,
                summary.items_requested
            );

            session.geometry = Some(geometry.clone());
            session.last_plan = Some(plan.clone());
            completed.write(PassCompleted { generation, geometry, plan });
        }
        Err(e) => {
            warn!("Pass {}: failed: {}", generation, e);
            // The previous pass's entities are already gone.
            *summary = PassSummary { generation, ..Default::default() };
            failed.write(PassFailed { generation, reason: e.to_string() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::core::PlanSeed;

    #[test]
    fn run_pass_is_repeatable() {
        let contours = ContourSet {
            image_size: UVec2::new(800, 600),
            polygons: vec![
                crate::geometry::core::ContourPolygon::new(vec![
                    IVec2::new(100, 400),
                    IVec2::new(700, 380),
                    IVec2::new(700, 500),
                    IVec2::new(100, 500),
                ]),
            ],
        };
        let request = PlanRequest { seed: PlanSeed(77), obstacles: 2, items: 5 };
        let cfg = GeometryConfig::default();
        let tuning = SpawnTuning::default();
        let a = run_pass(&contours, &cfg, request, &tuning).unwrap();
        let b = run_pass(&contours, &cfg, request, &tuning).unwrap();
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.geometry, b.geometry);
        assert_eq!(a.plan.obstacle_count(), 1);
    }
}
