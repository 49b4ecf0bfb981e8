//! Skirmisher: keeps the player at range and fires projectiles.

use bevy::prelude::*;

use crate::combat::ai::unit::{AiState, EnemyUnit, Senses, ThinkContext};
use crate::core::TimerKey;

pub(crate) fn think(unit: &mut EnemyUnit, senses: &Senses, ctx: &mut ThinkContext<'_>) {
    let speed = unit.speed_multiplier();

    match unit.state {
        AiState::Patrol => {
            unit.patrol_turn(senses, ctx.ai);
            unit.velocity.x = unit.facing.sign() * unit.stats.patrol_speed * speed;
            if unit.detects(senses) {
                unit.enter(AiState::Aggro);
            }
        }
        AiState::Aggro => {
            let Some(offset) = unit.to_player(senses) else {
                unit.enter(AiState::Patrol);
                return;
            };
            if !unit.still_engaged(senses, ctx.ai) {
                unit.enter(AiState::Patrol);
                return;
            }
            unit.face_player(senses);
            let distance = offset.x.abs();
            let range = unit.stats.attack_range;

            let step = if distance < range * 0.5 {
                -unit.facing.sign()
            } else if distance > range {
                unit.facing.sign()
            } else {
                0.0
            };
            // The floor probe only covers the facing side.
            unit.velocity.x = if step != 0.0 && (senses.ground_ahead || step != unit.facing.sign()) {
                step * unit.stats.chase_speed * speed
            } else {
                0.0
            };

            if distance <= range && !unit.timers.is_active(TimerKey::AttackCooldownAi) {
                unit.begin_telegraph(unit.stats.telegraph_ms);
            }
        }
        AiState::Telegraph => {
            unit.velocity.x = 0.0;
            unit.face_player(senses);
            if !unit.timers.is_active(TimerKey::Telegraph) {
                let swing = ctx.ids.allocate();
                let aim = unit
                    .to_player(senses)
                    .unwrap_or(Vec2::new(unit.facing.sign(), 0.0));
                unit.fire_projectile(swing, aim);
                unit.enter(AiState::Attack);
                unit.timers.arm(TimerKey::Commit, unit.stats.commit_ms);
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
                let next = if unit.still_engaged(senses, ctx.ai) {
                    AiState::Aggro
                } else {
                    AiState::Patrol
                };
                unit.enter(next);
            }
        }
        _ => unit.enter(AiState::Patrol),
    }
}
