use bevy::input::{keyboard::KeyCode, ButtonInput};
use bevy::prelude::*;

use crate::actions::{ActionState, DemoAction};
use crate::session::{PlatformerSession, RegenerateRequested};

/// Variants the demo cycles through with `V`.
pub const VARIANT_COUNT: usize = 3;
pub const MAX_ITEMS: usize = 32;

pub fn input_mapping_system(keys: Res<ButtonInput<KeyCode>>, mut action_state: ResMut<ActionState>) {
    action_state.set(DemoAction::NextSeed, keys.just_pressed(KeyCode::KeyR));
    action_state.set(
        DemoAction::MoreItems,
        keys.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]),
    );
    action_state.set(
        DemoAction::FewerItems,
        keys.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]),
    );
    action_state.set(DemoAction::NextVariant, keys.just_pressed(KeyCode::KeyV));
}

/// Turn this frame's actions into at most one regeneration request.
pub fn regenerate_from_actions(
    action_state: Res<ActionState>,
    session: Res<PlatformerSession>,
    mut regens: EventWriter<RegenerateRequested>,
) {
    if !action_state.any() {
        return;
    }
    if let Some(req) = regeneration_for(&action_state, &session) {
        regens.write(req);
    }
}

fn regeneration_for(actions: &ActionState, session: &PlatformerSession) -> Option<RegenerateRequested> {
    let mut req = RegenerateRequested::default();
    if actions.fired(DemoAction::NextSeed) {
        req.seed = Some(session.seed.0.wrapping_add(1));
        info!("Regenerate: seed -> {}", session.seed.0.wrapping_add(1));
    }
    let items = session.item_count;
    if actions.fired(DemoAction::MoreItems) && items < MAX_ITEMS {
        req.items = Some(items + 1);
    }
    if actions.fired(DemoAction::FewerItems) && items > 0 {
        req.items = Some(items - 1);
    }
    if actions.fired(DemoAction::NextVariant) {
        req.obstacle_variant = Some((session.obstacle_variant + 1) % VARIANT_COUNT);
        req.item_variant = Some((session.item_variant + 1) % VARIANT_COUNT);
    }

    let changed = req.seed.is_some() || req.items.is_some() || req.obstacle_variant.is_some();
    changed.then_some(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_seed_bumps_by_one() {
        let session = PlatformerSession::default();
        let mut actions = ActionState::default();
        actions.set(DemoAction::NextSeed, true);
        let req = regeneration_for(&actions, &session).unwrap();
        assert_eq!(req.seed, Some(session.seed.0 + 1));
        assert_eq!(req.items, None);
    }

    #[test]
    fn item_count_stays_in_range() {
        let mut session = PlatformerSession::default();
        session.item_count = 0;
        let mut actions = ActionState::default();
        actions.set(DemoAction::FewerItems, true);
        assert!(regeneration_for(&actions, &session).is_none());

        session.item_count = MAX_ITEMS;
        let mut actions = ActionState::default();
        actions.set(DemoAction::MoreItems, true);
        assert!(regeneration_for(&actions, &session).is_none());
        session.item_count = 4;
        assert_eq!(regeneration_for(&actions, &session).unwrap().items, Some(5));
    }

    #[test]
    fn variants_wrap() {
        let mut session = PlatformerSession::default();
        session.obstacle_variant = VARIANT_COUNT - 1;
        let mut actions = ActionState::default();
        actions.set(DemoAction::NextVariant, true);
        let req = regeneration_for(&actions, &session).unwrap();
        assert_eq!(req.obstacle_variant, Some(0));
        assert_eq!(req.item_variant, Some(1));
    }
}
