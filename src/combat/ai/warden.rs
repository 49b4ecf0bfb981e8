//! Warden: the multi-phase boss.
//!
//! Each phase has its own pattern table; a pattern is drawn at random from the
//! current table whenever the attack cooldown is ready. Crossing a health
//! threshold switches tables for good and speeds everything up.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::ai::unit::{AiState, BossPattern, EnemyUnit, Senses, ThinkContext};
use crate::core::TimerKey;

/// Spread of a barrage volley, in radians from the aim line.
const BARRAGE_SPREAD: f32 = 0.3;

/// Patterns eligible in `phase`. Later phases keep the last table.
pub fn pattern_table(phase: u8) -> &'static [BossPattern] {
    match phase {
        0 => &[BossPattern::Slam, BossPattern::Lunge],
        1 => &[BossPattern::Slam, BossPattern::Lunge, BossPattern::Volley],
        _ => &[BossPattern::Lunge, BossPattern::Volley, BossPattern::Barrage],
    }
}

pub(crate) fn think(unit: &mut EnemyUnit, senses: &Senses, ctx: &mut ThinkContext<'_>) {
    let speed = unit.speed_multiplier();

    match unit.state {
        AiState::Patrol => {
            unit.velocity.x = 0.0;
            if unit.detects(senses) {
                info!("Warden engaged");
                unit.enter(AiState::Aggro);
            }
        }
        AiState::Aggro => {
            let Some(offset) = unit.to_player(senses) else {
                unit.velocity.x = 0.0;
                return;
            };
            unit.face_player(senses);

            if unit.pattern.is_none() && !unit.timers.is_active(TimerKey::AttackCooldownAi) {
                let table = pattern_table(unit.phase);
                let pattern = table[ctx.rng.random_range(0..table.len())];
                debug!("Warden picked {:?} in phase {}", pattern, unit.phase);
                unit.pattern = Some(pattern);
            }

            let in_reach = offset.x.abs() <= unit.stats.attack_range;
            match unit.pattern {
                Some(pattern) if !pattern.is_melee() || in_reach => {
                    unit.begin_telegraph(unit.stats.telegraph_ms / speed);
                }
                _ if in_reach => unit.velocity.x = 0.0,
                _ => unit.velocity.x = unit.facing.sign() * unit.stats.chase_speed * speed,
            }
        }
        AiState::Telegraph => {
            unit.velocity.x = 0.0;
            if unit.timers.is_active(TimerKey::Telegraph) {
                return;
            }
            let Some(pattern) = unit.pattern else {
                unit.enter(AiState::Aggro);
                return;
            };
            let commit_ms = unit.stats.commit_ms / speed;
            match pattern {
                BossPattern::Slam | BossPattern::Lunge => {
                    unit.open_strike(ctx.ids, commit_ms);
                }
                BossPattern::Volley | BossPattern::Barrage => {
                    let swing = ctx.ids.allocate();
                    let aim = unit
                        .to_player(senses)
                        .unwrap_or(Vec2::new(unit.facing.sign(), 0.0))
                        .normalize_or_zero();
                    if pattern == BossPattern::Barrage {
                        for angle in [-BARRAGE_SPREAD, 0.0, BARRAGE_SPREAD] {
                            unit.fire_projectile(swing, Vec2::from_angle(angle).rotate(aim));
                        }
                    } else {
                        unit.fire_projectile(swing, aim);
                    }
                    unit.enter(AiState::Attack);
                    unit.timers.arm(TimerKey::Commit, commit_ms);
                }
            }
        }
        AiState::Attack => {
            unit.velocity.x = match unit.pattern {
                Some(BossPattern::Lunge) => unit.facing.sign() * unit.stats.lunge_speed * speed,
                _ => 0.0,
            };
            if !unit.timers.is_active(TimerKey::Commit) {
                unit.pattern = None;
                unit.finish_attack(
                    unit.stats.recover_ms / speed,
                    unit.stats.attack_cooldown_ms / speed,
                );
            }
        }
        AiState::Recover => {
            unit.damp_horizontal(0.8, ctx.dt_ms);
            if !unit.timers.is_active(TimerKey::Recover) {
                unit.enter(AiState::Aggro);
            }
        }
        AiState::PhaseShift => {
            unit.velocity.x = 0.0;
            if !unit.timers.is_active(TimerKey::PhaseShift) {
                unit.enter(AiState::Aggro);
            }
        }
        _ => unit.enter(AiState::Aggro),
    }
}
