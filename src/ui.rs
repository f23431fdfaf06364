use bevy::prelude::*;

use crate::session::{PassFailed, PassSummary, PlatformerSession};

#[derive(Component)]
pub struct HudText;

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        Text::new("Waiting for contours..."),
        TextFont { font_size: 18.0, ..default() },
        TextColor(Color::WHITE),
        HudText,
    ));
}

pub fn hud_line(summary: &PassSummary, session: &PlatformerSession) -> String {
    format!(
        "seed {}  |  platforms {} ({} groups)  |  obstacles {}/{}  |  collect {} of {}\n[R] next seed  [+/-] items  [V] variant",
        session.seed.0,
        summary.platforms,
        summary.groups,
        summary.obstacles_placed,
        summary.obstacles_requested,
        summary.items_placed,
        summary.items_placed,
    )
}

pub fn update_hud(
    summary: Res<PassSummary>,
    session: Res<PlatformerSession>,
    mut failures: EventReader<PassFailed>,
    mut hud: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = hud.single_mut() else { return };
    if let Some(f) = failures.read().last() {
        text.0 = format!("pass {} failed: {}", f.generation, f.reason);
        return;
    }
    if summary.is_changed() && summary.generation > 0 {
        text.0 = hud_line(&summary, &session);
    }
}
