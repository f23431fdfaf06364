// src/visuals.rs
//! Flat-colour stand-ins for whatever art a game would attach to a plan.

use bevy::prelude::*;

use crate::geometry::core::SpawnCategory;
use crate::session::instancing::{PlatformCollider, SpawnVariant};

const OBSTACLE_SIZE: f32 = 36.0;
const ITEM_SIZE: f32 = 20.0;

fn obstacle_color(variant: usize) -> Color {
    match variant % 3 {
        0 => Color::srgb(0.85, 0.25, 0.2),
        1 => Color::srgb(0.9, 0.55, 0.1),
        _ => Color::srgb(0.6, 0.2, 0.7),
    }
}

fn item_color(variant: usize) -> Color {
    match variant % 3 {
        0 => Color::srgb(1.0, 0.85, 0.2),
        1 => Color::srgb(0.3, 0.9, 0.5),
        _ => Color::srgb(0.3, 0.7, 1.0),
    }
}

/// A polyline segment as a (centre, length, angle) box.
pub fn segment_box(a: Vec2, b: Vec2) -> (Vec2, f32, f32) {
    let d = b - a;
    ((a + b) * 0.5, d.length(), d.y.atan2(d.x))
}

/// Attach sprites to entities the latest pass just spawned.
pub fn decorate_spawned(
    mut commands: Commands,
    added: Query<(Entity, &SpawnCategory, Option<&SpawnVariant>, Option<&PlatformCollider>), Added<SpawnCategory>>,
) {
    for (e, category, variant, collider) in &added {
        let variant = variant.map_or(0, |v| v.0);
        match category {
            SpawnCategory::Platform => {
                let Some(collider) = collider else { continue };
                let color = if collider.one_way { Color::srgb(0.3, 0.75, 0.35) } else { Color::srgb(0.5, 0.5, 0.55) };
                commands.entity(e).insert(Visibility::default()).with_children(|parent| {
                    for w in collider.points.windows(2) {
                        let (centre, len, angle) = segment_box(w[0], w[1]);
                        if len <= f32::EPSILON {
                            continue;
                        }
                        parent.spawn((
                            Sprite::from_color(color, Vec2::new(len, collider.thickness)),
                            Transform::from_translation(centre.extend(0.0))
                                .with_rotation(Quat::from_rotation_z(angle)),
                        ));
                    }
                });
            }
            SpawnCategory::Obstacle => {
                commands
                    .entity(e)
                    .insert(Sprite::from_color(obstacle_color(variant), Vec2::splat(OBSTACLE_SIZE)));
            }
            SpawnCategory::Item => {
                commands.entity(e).insert(Sprite::from_color(item_color(variant), Vec2::splat(ITEM_SIZE)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_box_of_diagonal() {
        let (c, len, angle) = segment_box(Vec2::ZERO, Vec2::new(3.0, 3.0));
        assert_eq!(c, Vec2::new(1.5, 1.5));
        assert!((len - 18.0_f32.sqrt()).abs() < 1e-5);
        assert!((angle - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
    }
}
