//! Level domain: components and resources.

use bevy::prelude::*;

use crate::level::data::LevelLayout;

/// Everything spawned for the current level.
#[derive(Component, Debug)]
pub struct LevelGeometry;

/// Damages the player on overlap. Respects the player's invulnerability.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hazard {
    pub rect: Rect,
    pub damage: f32,
}

#[derive(Component, Debug, Clone)]
pub struct Portal {
    pub rect: Rect,
    pub target: String,
}

/// The layout chosen at startup.
#[derive(Resource, Debug, Clone)]
pub struct ActiveLevel(pub LevelLayout);

/// Blocks a second portal use right after a transition.
#[derive(Resource, Debug, Clone)]
pub struct PortalCooldown {
    duration_ms: f32,
    remaining_ms: f32,
}

impl Default for PortalCooldown {
    fn default() -> Self {
        Self::new(300.0)
    }
}

impl PortalCooldown {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms,
            remaining_ms: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.remaining_ms = self.duration_ms;
    }

    pub fn tick(&mut self, dt_ms: f32) {
        self.remaining_ms = (self.remaining_ms - dt_ms).max(0.0);
    }

    pub fn can_transition(&self) -> bool {
        self.remaining_ms <= 0.0
    }
}
