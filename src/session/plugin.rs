//! Session plugin wiring (glue).
//! - Pipeline config + session resources
//! - Pass request/completion events
//! - Async pass scheduling, collection, instancing
//! - Contour artifact source (asset loader + config file)

use bevy::asset::AssetLoadFailedEvent;
use bevy::prelude::*;

use super::instancing::{instantiate_completed_pass, WorldMapping};
use super::state::{BuildPassRequested, PassCompleted, PassFailed, PassSummary, PlatformerSession, RegenerateRequested};
use super::tasks::{collect_pass_result, schedule_pass, PassTasks};
use crate::config::PipelineConfig;
use crate::geometry::{ContourArtifact, ContourAssetPlugin};

/// Startup ordering so the session sees the loaded config.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum PlatformerStartupSet {
    Config,
    Session,
}

/// Core pipeline: no rendering, no asset IO. Feed it `BuildPassRequested`.
pub struct PlatformerPlugin;

impl Plugin for PlatformerPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Startup,
            (PlatformerStartupSet::Config, PlatformerStartupSet::Session.after(PlatformerStartupSet::Config)),
        )
        .init_resource::<PipelineConfig>()
        .init_resource::<PlatformerSession>()
        .init_resource::<PassTasks>()
        .init_resource::<PassSummary>()
        .init_resource::<WorldMapping>()
        .add_event::<BuildPassRequested>()
        .add_event::<RegenerateRequested>()
        .add_event::<PassCompleted>()
        .add_event::<PassFailed>()
        .add_systems(Startup, init_session_from_config.in_set(PlatformerStartupSet::Session))
        // 1. start (or supersede) a pass
        .add_systems(Update, schedule_pass)
        // 2. poll it
        .add_systems(Update, collect_pass_result.after(schedule_pass))
        // 3. materialize the finished pass
        .add_systems(Update, instantiate_completed_pass.after(collect_pass_result));
    }
}

/// Startup: seed the session from config defaults.
fn init_session_from_config(mut commands: Commands, config: Res<PipelineConfig>) {
    commands.insert_resource(PlatformerSession::from_defaults(&config.session));
    info!(
        "Session: seed={} obstacles={} items={}",
        config.session.random_seed, config.session.obstacle_count, config.session.item_count
    );
}

// ---------- Contour source ----------

/// Where the artifact and config live.
#[derive(Resource, Clone)]
pub struct PlatformerSettings {
    /// Asset path (relative to `assets/`).
    pub artifact_path: String,
    /// Filesystem path of the RON config.
    pub config_path: String,
}

impl Default for PlatformerSettings {
    fn default() -> Self {
        Self {
            artifact_path: "contours/capture.contour.json".to_string(),
            config_path: "assets/config/pipeline.ron".to_string(),
        }
    }
}

/// Handle to the loaded contour artifact.
#[derive(Resource, Default)]
pub struct ContourArtifactHandle(pub Handle<ContourArtifact>);

/// Loads config from disk and the contour artifact through the asset server;
/// every (re)load of the artifact requests a new pass.
pub struct ContourSourcePlugin;

impl Plugin for ContourSourcePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ContourAssetPlugin)
            .init_resource::<PlatformerSettings>()
            .init_resource::<ContourArtifactHandle>()
            .add_systems(Startup, (load_pipeline_config, load_artifact).in_set(PlatformerStartupSet::Config))
            .add_systems(Update, (request_pass_on_artifact_loaded, report_artifact_failure).before(schedule_pass));
    }
}

/// Startup: read the RON config (defaults on failure).
fn load_pipeline_config(mut commands: Commands, settings: Res<PlatformerSettings>) {
    commands.insert_resource(PipelineConfig::load_or_default(&settings.config_path));
}

/// Startup: request loading the artifact, store handle.
fn load_artifact(
    mut handle_res: ResMut<ContourArtifactHandle>,
    settings: Res<PlatformerSettings>,
    assets: Res<AssetServer>,
) {
    if handle_res.0.is_strong() {
        return;
    }
    handle_res.0 = assets.load(settings.artifact_path.as_str());
    info!("Contours: loading '{}'", settings.artifact_path);
}

/// Update: each time our artifact is added or hot-reloaded, start a pass.
fn request_pass_on_artifact_loaded(
    mut asset_events: EventReader<AssetEvent<ContourArtifact>>,
    handle: Res<ContourArtifactHandle>,
    artifacts: Res<Assets<ContourArtifact>>,
    mut requests: EventWriter<BuildPassRequested>,
) {
    for ev in asset_events.read() {
        let id = match ev {
            AssetEvent::Added { id } | AssetEvent::Modified { id } => *id,
            _ => continue,
        };
        if id != handle.0.id() {
            continue;
        }
        if let Some(artifact) = artifacts.get(id) {
            info!(
                "Contours: {} polygons in {}x{} image",
                artifact.contours.polygons.len(),
                artifact.contours.image_size.x,
                artifact.contours.image_size.y
            );
            requests.write(BuildPassRequested(artifact.contours.clone()));
        }
    }
}

/// Update: a broken artifact is fatal for the run; say so once per failure.
fn report_artifact_failure(
    mut failures: EventReader<AssetLoadFailedEvent<ContourArtifact>>,
    session: Res<PlatformerSession>,
    mut failed: EventWriter<PassFailed>,
) {
    for ev in failures.read() {
        error!("Contours: '{}' rejected: {}", ev.path, ev.error);
        failed.write(PassFailed { generation: session.generation, reason: ev.error.to_string() });
    }
}
