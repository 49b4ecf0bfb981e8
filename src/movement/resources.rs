//! Movement domain: tuning resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Player locomotion constants. Durations are milliseconds.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub max_speed: f32,
    pub ground_accel: f32,
    pub ground_decel: f32,
    /// Air acceleration and deceleration as a fraction of the ground rates.
    pub air_control: f32,
    pub jump_velocity: f32,
    /// Applied once to upward velocity when jump is released mid-rise.
    pub jump_cut_multiplier: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub coyote_ms: f32,
    pub jump_buffer_ms: f32,
    pub dash_speed: f32,
    pub dash_ms: f32,
    pub dash_cooldown_ms: f32,
    pub dash_buffer_ms: f32,
    /// Gravity multiplier while dashing; 0 holds altitude.
    pub dash_gravity_factor: f32,
    pub dash_invulnerable: bool,
    /// Air dashes before the next landing; 0 means unlimited.
    pub air_dash_limit: u8,
    pub wall_slide_speed: f32,
    pub wall_stick_ms: f32,
    pub wall_jump_horizontal: f32,
    pub wall_jump_vertical: f32,
    pub wall_jump_lock_ms: f32,
    pub body_width: f32,
    pub body_height: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            max_speed: 320.0,
            ground_accel: 3000.0,
            ground_decel: 2600.0,
            air_control: 0.65,
            jump_velocity: 680.0,
            jump_cut_multiplier: 0.5,
            gravity: 1800.0,
            max_fall_speed: 900.0,
            coyote_ms: 100.0,
            jump_buffer_ms: 120.0,
            dash_speed: 900.0,
            dash_ms: 160.0,
            dash_cooldown_ms: 350.0,
            dash_buffer_ms: 80.0,
            dash_gravity_factor: 0.0,
            dash_invulnerable: true,
            air_dash_limit: 1,
            wall_slide_speed: 100.0,
            wall_stick_ms: 150.0,
            wall_jump_horizontal: 400.0,
            wall_jump_vertical: 600.0,
            wall_jump_lock_ms: 150.0,
            body_width: 24.0,
            body_height: 48.0,
        }
    }
}

impl MovementTuning {
    pub fn air_accel(&self) -> f32 {
        self.ground_accel * self.air_control
    }

    pub fn air_decel(&self) -> f32 {
        self.ground_decel * self.air_control
    }

    pub fn body_size(&self) -> Vec2 {
        Vec2::new(self.body_width, self.body_height)
    }
}
