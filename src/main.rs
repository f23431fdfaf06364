use bevy::prelude::*;

mod actions;
mod config;
mod geometry;
mod input;
mod session;
mod setup;
mod spawn;
mod ui;
mod visuals;

use actions::ActionState;
use input::{input_mapping_system, regenerate_from_actions};
use session::{PlatformerStackPlugin, PlatformerStartupSet};
use ui::{spawn_hud, update_hud};

fn main() {
    App::new()
        // core engine plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "contour platforms".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        // domain: artifact -> platforms -> spawn plan -> entities
        .add_plugins(PlatformerStackPlugin)
        .init_resource::<ActionState>()
        // camera + mapping once config is in
        .add_systems(Startup, setup::setup)
        .add_systems(Startup, setup::sync_world_mapping.after(PlatformerStartupSet::Config))
        .add_systems(Startup, spawn_hud)
        // keys -> regeneration requests, before the pass scheduler reads them
        .add_systems(
            Update,
            (input_mapping_system, regenerate_from_actions)
                .chain()
                .before(session::tasks::schedule_pass),
        )
        .add_systems(Update, (visuals::decorate_spawned, update_hud))
        .run();
}
