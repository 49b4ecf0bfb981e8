//! Combat domain: straight-line enemy projectiles.

use bevy::prelude::*;

use crate::combat::damage::SwingId;

/// Size of every projectile's hitbox.
pub const PROJECTILE_SIZE: Vec2 = Vec2::new(12.0, 12.0);

/// A projectile an enemy asked to spawn this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub swing: SwingId,
    pub lifetime_ms: f32,
}

/// A projectile in flight, carrying the swing id of the volley that fired it.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub swing: SwingId,
    pub remaining_ms: f32,
}

impl From<ProjectileSpawn> for Projectile {
    fn from(spawn: ProjectileSpawn) -> Self {
        Self {
            position: spawn.position,
            velocity: spawn.velocity,
            damage: spawn.damage,
            swing: spawn.swing,
            remaining_ms: spawn.lifetime_ms,
        }
    }
}

impl Projectile {
    /// Move along the flight line. Returns false once the lifetime is spent.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        self.position += self.velocity * (dt_ms / 1000.0);
        self.remaining_ms -= dt_ms;
        self.remaining_ms > 0.0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, PROJECTILE_SIZE)
    }
}
