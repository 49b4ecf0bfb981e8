//! Flyer: bobs around its post, chases through the air, and flies home when
//! the player escapes or it strays past its leash. Damages by contact only.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::combat::ai::unit::{AiState, EnemyUnit, Senses, ThinkContext};
use crate::movement::Facing;

/// Close enough to the post to resume hovering.
const HOME_TOLERANCE: f32 = 4.0;
/// Spring gain pulling the flyer onto its hover path, per second.
const HOVER_GAIN: f32 = 6.0;

pub(crate) fn think(unit: &mut EnemyUnit, senses: &Senses, ctx: &mut ThinkContext<'_>) {
    let speed = unit.stats.chase_speed * unit.speed_multiplier();

    match unit.state {
        AiState::Hover => {
            unit.hover_clock_ms += ctx.dt_ms;
            let period = unit.stats.hover_period_ms.max(1.0);
            let phase = TAU * unit.hover_clock_ms / period;
            let target = unit.home + Vec2::new(0.0, unit.stats.hover_amplitude * phase.sin());
            unit.velocity = ((target - unit.position) * HOVER_GAIN).clamp_length_max(speed);
            if unit.detects(senses) {
                unit.enter(AiState::Aggro);
            }
        }
        AiState::Aggro => {
            let leashed = unit.stats.leash_radius > 0.0
                && unit.position.distance(unit.home) > unit.stats.leash_radius;
            let Some(offset) = unit.to_player(senses) else {
                unit.enter(AiState::Returning);
                return;
            };
            if leashed || !unit.still_engaged(senses, ctx.ai) {
                unit.enter(AiState::Returning);
                return;
            }
            unit.face_player(senses);
            unit.velocity = offset.normalize_or_zero() * speed;
        }
        AiState::Returning => {
            let home = unit.home - unit.position;
            if home.length() <= HOME_TOLERANCE {
                unit.velocity = Vec2::ZERO;
                unit.hover_clock_ms = 0.0;
                unit.enter(AiState::Hover);
            } else {
                unit.velocity = home.normalize_or_zero() * speed;
                unit.facing = Facing::from_sign(home.x);
            }
        }
        _ => unit.enter(AiState::Returning),
    }
}
