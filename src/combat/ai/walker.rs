//! Ground melee walkers: the charger and the masked sentinel.
//!
//! Patrol between ledges, close in on the player, telegraph, lunge with a
//! short strike, recover. The sentinel adds a defensive stance while its mask
//! holds and speeds up once the mask breaks.

use crate::combat::ai::unit::{AiState, EnemyUnit, Senses, ThinkContext};
use crate::combat::components::EnemyKind;
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
            if !unit.still_engaged(senses, ctx.ai) {
                unit.enter(AiState::Patrol);
                return;
            }
            unit.face_player(senses);
            let distance = unit.to_player(senses).map_or(f32::MAX, |offset| offset.x.abs());

            if distance <= unit.stats.attack_range {
                unit.velocity.x = 0.0;
                if !unit.timers.is_active(TimerKey::AttackCooldownAi) {
                    unit.begin_telegraph(unit.stats.telegraph_ms);
                } else if can_brace(unit) {
                    unit.enter(AiState::DefensiveStance);
                    unit.timers.arm(TimerKey::Stance, unit.stats.stance_ms);
                }
            } else if senses.ground_ahead {
                unit.velocity.x = unit.facing.sign() * unit.stats.chase_speed * speed;
            } else {
                unit.velocity.x = 0.0;
            }
        }
        AiState::DefensiveStance => {
            unit.velocity.x = 0.0;
            unit.face_player(senses);
            if !unit.timers.is_active(TimerKey::Stance) || unit.mask_broken() {
                unit.timers.clear(TimerKey::Stance);
                unit.enter(AiState::Aggro);
            }
        }
        AiState::Telegraph => {
            unit.velocity.x = 0.0;
            if !unit.timers.is_active(TimerKey::Telegraph) {
                unit.open_strike(ctx.ids, unit.stats.commit_ms);
            }
        }
        AiState::Attack => {
            let stopped = unit.blocked_ahead(senses) || !senses.ground_ahead;
            unit.velocity.x = if stopped {
                0.0
            } else {
                unit.facing.sign() * unit.stats.lunge_speed * speed
            };
            if stopped || !unit.timers.is_active(TimerKey::Commit) {
                unit.finish_attack(unit.stats.recover_ms, unit.stats.attack_cooldown_ms);
            }
        }
        AiState::Recover => {
            unit.damp_horizontal(0.8, ctx.dt_ms);
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

/// Sentinels brace between swings while their mask holds.
fn can_brace(unit: &EnemyUnit) -> bool {
    unit.kind == EnemyKind::Sentinel
        && unit.stats.stance_ms > 0.0
        && !unit.mask_broken()
        && !unit.timers.is_active(TimerKey::Stance)
}
