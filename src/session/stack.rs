// src/session/stack.rs
use bevy::prelude::*;

use super::plugin::{ContourSourcePlugin, PlatformerPlugin};

pub struct PlatformerStackPlugin;
impl Plugin for PlatformerStackPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PlatformerPlugin)      // session + pass lifecycle
           .add_plugins(ContourSourcePlugin); // artifact loader + config file
    }
}
