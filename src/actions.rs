use bevy::prelude::*;
use std::collections::HashMap;

/// Demo controls, decoupled from concrete keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoAction {
    NextSeed,
    MoreItems,
    FewerItems,
    NextVariant,
}

/// Which actions fired this frame.
#[derive(Default, Resource)]
pub struct ActionState {
    fired: HashMap<DemoAction, bool>,
}

impl ActionState {
    pub fn set(&mut self, action: DemoAction, fired: bool) {
        self.fired.insert(action, fired);
    }

    pub fn fired(&self, action: DemoAction) -> bool {
        *self.fired.get(&action).unwrap_or(&false)
    }

    pub fn any(&self) -> bool {
        self.fired.values().any(|&f| f)
    }
}
