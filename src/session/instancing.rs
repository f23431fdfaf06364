// src/session/instancing.rs
//! Materializes a finished pass as entities the physics/visual side can pick up.

use bevy::prelude::*;

use super::state::{PassCompleted, PlatformerSession};
use crate::geometry::core::SpawnCategory;

/// Tags every entity a pass produced, so the next pass can clear them all.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassEntity {
    pub generation: u64,
}

/// Collision contract for one platform (local space).
#[derive(Component, Clone, Debug, PartialEq)]
pub struct PlatformCollider {
    pub points: Vec<Vec2>,
    pub thickness: f32,
    /// Only blocks from above.
    pub one_way: bool,
}

/// Which prefab variant an obstacle/item should use.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnVariant(pub usize);

/// Local → world mapping used for entity transforms.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldMapping {
    pub origin: Vec2,
    pub scale: f32,
}

impl Default for WorldMapping {
    fn default() -> Self {
        Self { origin: Vec2::ZERO, scale: 1.0 }
    }
}

impl WorldMapping {
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec3 {
        (self.origin + local * self.scale).extend(0.0)
    }
}

/// Spawn platform/obstacle/item entities for the current generation's pass.
pub fn instantiate_completed_pass(
    mut commands: Commands,
    mut events: EventReader<PassCompleted>,
    session: Res<PlatformerSession>,
    mapping: Res<WorldMapping>,
) {
    for ev in events.read() {
        if ev.generation != session.generation {
            debug!("Instancing: ignoring stale pass {}", ev.generation);
            continue;
        }
        let tag = PassEntity { generation: ev.generation };

        for (i, p) in ev.geometry.platforms.iter().enumerate() {
            commands.spawn((
                SpawnCategory::Platform,
                PlatformCollider { points: p.points.clone(), thickness: p.thickness, one_way: p.one_way },
                Transform::from_translation(mapping.origin.extend(0.0)).with_scale(Vec3::splat(mapping.scale)),
                tag,
                Name::new(format!("Platform {i} (polygon {})", p.source)),
            ));
        }

        for (i, &o) in ev.plan.obstacles.iter().enumerate() {
            commands.spawn((
                SpawnCategory::Obstacle,
                SpawnVariant(session.obstacle_variant),
                Transform::from_translation(mapping.to_world(o)),
                tag,
                Name::new(format!("Obstacle {i}")),
            ));
        }

        for (i, &it) in ev.plan.items.iter().enumerate() {
            commands.spawn((
                SpawnCategory::Item,
                SpawnVariant(session.item_variant),
                Transform::from_translation(mapping.to_world(it)),
                tag,
                Name::new(format!("Item {i}")),
            ));
        }

        debug!(
            "Instancing: pass {} -> {} platforms, {} obstacles, {} items",
            ev.generation,
            ev.geometry.platforms.len(),
            ev.plan.obstacles.len(),
            ev.plan.items.len()
        );
    }
}
