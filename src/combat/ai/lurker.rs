//! Lurker: tunnels under the player, surfaces with a tall strike, then stays
//! exposed through its recovery before burrowing again.

use crate::combat::ai::unit::{AiState, EnemyUnit, Senses, ThinkContext};
use crate::core::TimerKey;

/// Horizontal distance at which a tunnelling lurker starts to surface.
const SURFACE_DISTANCE: f32 = 8.0;

pub(crate) fn think(unit: &mut EnemyUnit, senses: &Senses, ctx: &mut ThinkContext<'_>) {
    match unit.state {
        AiState::Burrowed => {
            unit.velocity.x = 0.0;
            if !unit.detects(senses) || unit.timers.is_active(TimerKey::AttackCooldownAi) {
                return;
            }
            let Some(offset) = unit.to_player(senses) else {
                return;
            };
            unit.face_player(senses);
            if offset.x.abs() <= SURFACE_DISTANCE {
                unit.enter(AiState::Emerging);
                unit.timers.arm(TimerKey::Burrow, unit.stats.emerge_ms);
            } else {
                // Never overshoot the player within one tick.
                let closing = offset.x.abs() * 1000.0 / ctx.dt_ms.max(1.0);
                unit.velocity.x = offset.x.signum() * unit.stats.chase_speed.min(closing);
            }
        }
        AiState::Emerging => {
            unit.velocity.x = 0.0;
            if !unit.timers.is_active(TimerKey::Burrow) {
                unit.open_strike(ctx.ids, unit.stats.commit_ms);
            }
        }
        AiState::Attack => {
            unit.velocity.x = 0.0;
            if !unit.timers.is_active(TimerKey::Commit) {
                unit.finish_attack(unit.stats.recover_ms, unit.stats.attack_cooldown_ms);
            }
        }
        AiState::Recover => {
            unit.velocity.x = 0.0;
            if !unit.timers.is_active(TimerKey::Recover) {
                unit.enter(AiState::Burrowed);
            }
        }
        _ => unit.enter(AiState::Burrowed),
    }
}
