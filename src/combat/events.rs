//! Combat domain: messages for presentation layers.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::combat::components::EnemyKind;
use crate::combat::damage::SwingId;

/// A hit was applied to a defender
#[derive(Debug)]
pub struct HitLanded {
    pub target: Entity,
    pub swing: Option<SwingId>,
    pub position: Vec2,
}

impl Message for HitLanded {}

#[derive(Debug)]
pub struct EnemyKilled {
    pub entity: Entity,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub drops: u32,
}

impl Message for EnemyKilled {}

/// One pickup for the spawner to create
#[derive(Debug)]
pub struct LootDropped {
    pub position: Vec2,
    pub value: u32,
}

impl Message for LootDropped {}

#[derive(Debug)]
pub struct BossPhaseChanged {
    pub boss: Entity,
    pub phase: u8,
}

impl Message for BossPhaseChanged {}

#[derive(Debug)]
pub struct MaskBroken {
    pub entity: Entity,
}

impl Message for MaskBroken {}

#[derive(Debug)]
pub struct PlayerDefeated {
    pub position: Vec2,
}

impl Message for PlayerDefeated {}
