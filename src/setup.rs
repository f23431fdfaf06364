use bevy::prelude::*;

use crate::config::PipelineConfig;
use crate::session::instancing::WorldMapping;

#[derive(Component)]
pub struct MainCamera;

pub fn setup(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera));
}

/// One local unit is drawn as `pixels_per_unit` screen pixels, so the scene
/// lines up with the source image.
pub fn sync_world_mapping(config: Res<PipelineConfig>, mut mapping: ResMut<WorldMapping>) {
    mapping.scale = config.geometry.pixels_per_unit;
    debug!("WorldMapping: scale={}", mapping.scale);
}
