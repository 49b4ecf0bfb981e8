//! Movement domain: player spawning.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::{AttackLifecycle, CombatTuning};
use crate::movement::{
    ContactFlags, ContactProbe, GameLayer, MovementTuning, Player, PlayerController,
};

/// Spawn the player at `position` with a fresh motor and attack lifecycle.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec2,
    tuning: &MovementTuning,
    combat: &CombatTuning,
) -> Entity {
    let size = tuning.body_size();
    info!(
        "Spawning player at {:?}: health={}, body={:?}",
        position, combat.player_max_health, size
    );

    commands
        .spawn((
            // Identity & Movement
            (
                Player,
                PlayerController::new(
                    position,
                    combat.player_max_health,
                    tuning,
                    combat.player_defense(),
                ),
                AttackLifecycle::default(),
                ContactFlags::default(),
                ContactProbe {
                    half_extents: size * 0.5,
                    edge_check_distance: 0.0,
                },
            ),
            // Rendering
            Sprite {
                color: Color::srgb(0.9, 0.9, 0.9),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 0.0),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::rectangle(size.x, size.y),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                GravityScale(0.0), // The motor integrates its own gravity
                Friction::new(0.0),
                CollisionLayers::new(
                    GameLayer::Player,
                    [GameLayer::Ground, GameLayer::Wall, GameLayer::Sensor],
                ),
            ),
        ))
        .id()
}
