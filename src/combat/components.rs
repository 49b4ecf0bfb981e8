//! Combat domain: components and combat-related state types.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Health pool for damageable entities
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percent(&self) -> f32 {
        self.current / self.max
    }
}

/// What happened when damage met an armor/mask pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateResult {
    /// The gate took the hit and still holds.
    Absorbed,
    /// The gate took the hit and just broke.
    Broke,
    /// The gate is already broken; damage goes to health.
    PassThrough,
}

/// Secondary pool that soaks damage before health.
///
/// Once broken it stays broken for the rest of the entity's life. The hit that
/// breaks it is fully absorbed; nothing spills over into health.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageGate {
    pub current: f32,
    pub max: f32,
    broken: bool,
}

impl DamageGate {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            broken: max <= 0.0,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn absorb(&mut self, amount: f32) -> GateResult {
        if self.broken {
            return GateResult::PassThrough;
        }
        self.current = (self.current - amount).max(0.0);
        if self.current <= 0.0 {
            self.broken = true;
            GateResult::Broke
        } else {
            GateResult::Absorbed
        }
    }
}

/// Marks an enemy entity
#[derive(Component, Debug)]
pub struct Enemy;

/// Dead entity lingering for presentation before removal.
#[derive(Component, Debug)]
pub struct Corpse {
    pub remaining_ms: f32,
}

/// Enemy archetypes the AI framework knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Ground melee walker that patrols ledges and lunges.
    Charger,
    /// Hovering pursuer that returns to its post.
    Flyer,
    /// Keeps its distance and fires projectiles.
    Skirmisher,
    /// Masked elite with a defensive stance.
    Sentinel,
    /// Terrain-bound miniboss that burrows between strikes.
    Lurker,
    /// Multi-phase boss.
    Warden,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Charger,
        EnemyKind::Flyer,
        EnemyKind::Skirmisher,
        EnemyKind::Sentinel,
        EnemyKind::Lurker,
        EnemyKind::Warden,
    ];

    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::Warden)
    }
}
