//! Combat domain: enemy spawning helpers.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::ai::EnemyUnit;
use crate::combat::components::{Enemy, EnemyKind};
use crate::combat::resources::{AiTuning, ArchetypeStats};
use crate::core::SpawnOrder;
use crate::movement::{ContactFlags, ContactProbe, GameLayer, GroundAhead};

/// Bundle for spawning one enemy of any archetype
#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub unit: EnemyUnit,
    pub order: SpawnOrder,
    pub contacts: ContactFlags,
    pub probe: ContactProbe,
    pub ground_ahead: GroundAhead,
    pub sprite: Sprite,
    pub transform: Transform,
    pub rigid_body: RigidBody,
    pub collider: Collider,
    pub collision_layers: CollisionLayers,
    pub velocity: LinearVelocity,
    pub locked_axes: LockedAxes,
    pub gravity_scale: GravityScale,
}

impl EnemyBundle {
    pub fn new(
        kind: EnemyKind,
        stats: &ArchetypeStats,
        ai: &AiTuning,
        position: Vec2,
        order: SpawnOrder,
    ) -> Self {
        let unit = EnemyUnit::new(kind, stats.clone(), position);
        let size = stats.size();
        let gravity = if unit.uses_gravity() { 1.0 } else { 0.0 };

        Self {
            enemy: Enemy,
            unit,
            order,
            contacts: ContactFlags::default(),
            probe: ContactProbe {
                half_extents: size * 0.5,
                edge_check_distance: ai.edge_check_distance,
            },
            ground_ahead: GroundAhead::default(),
            sprite: Sprite {
                color: kind_color(kind),
                custom_size: Some(size),
                ..default()
            },
            transform: Transform::from_xyz(position.x, position.y, 0.0),
            rigid_body: RigidBody::Dynamic,
            collider: Collider::rectangle(size.x, size.y),
            collision_layers: CollisionLayers::new(
                GameLayer::Enemy,
                [GameLayer::Ground, GameLayer::Wall],
            ),
            velocity: LinearVelocity::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            gravity_scale: GravityScale(gravity),
        }
    }
}

fn kind_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Charger => Color::srgb(0.8, 0.3, 0.3),
        EnemyKind::Flyer => Color::srgb(0.6, 0.4, 0.8),
        EnemyKind::Skirmisher => Color::srgb(0.9, 0.6, 0.2),
        EnemyKind::Sentinel => Color::srgb(0.5, 0.5, 0.6),
        EnemyKind::Lurker => Color::srgb(0.4, 0.3, 0.2),
        EnemyKind::Warden => Color::srgb(0.6, 0.1, 0.1),
    }
}

/// Spawn one enemy and give it the next update slot.
pub fn spawn_enemy(
    commands: &mut Commands,
    kind: EnemyKind,
    stats: &ArchetypeStats,
    ai: &AiTuning,
    position: Vec2,
    order: SpawnOrder,
) -> Entity {
    let entity = commands
        .spawn(EnemyBundle::new(kind, stats, ai, position, order))
        .id();
    debug!("Spawned {:?} at {:?} as {:?}", kind, position, order);
    entity
}
