//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Wall surfaces
    Wall,
    /// Player character
    Player,
    /// Enemy characters
    Enemy,
    /// Sensors (portals, hazards) - should not block movement
    Sensor,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 { Facing::Left } else { Facing::Right }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }
}

/// Per-body contact report from the physics collaborator.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFlags {
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_up: bool,
    pub blocked_down: bool,
}

impl ContactFlags {
    pub fn grounded() -> Self {
        Self {
            blocked_down: true,
            ..default()
        }
    }

    pub fn touching_wall(self) -> bool {
        self.blocked_left || self.blocked_right
    }

    /// Direction of the touched wall, -1 left, 1 right, 0 none or both.
    pub fn wall_side(self) -> f32 {
        match (self.blocked_left, self.blocked_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Half extents used when probing contacts around a body.
#[derive(Component, Debug, Clone, Copy)]
pub struct ContactProbe {
    pub half_extents: Vec2,
    /// Horizontal distance ahead of the body to check for a floor.
    pub edge_check_distance: f32,
}

/// Whether there is floor ahead of a walking body, from the edge probe.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundAhead(pub bool);

impl Default for GroundAhead {
    fn default() -> Self {
        Self(true)
    }
}

/// Player movement state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementState {
    #[default]
    Grounded,
    Airborne,
    WallSlide,
    Dash,
    /// Reserved knockback lock. Nothing in the simulation enters it on its own.
    Hitstun,
}
