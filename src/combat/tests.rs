//! Combat domain: tests for the damage contract, swings and hit resolution.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::ai::{AiEvent, AiState, EnemyUnit, Senses, ThinkContext};
use super::{
    AiTuning, ArchetypeStats, AttackLifecycle, AttackPhase, AttackTuning, DamageContext,
    DamageCore, DamageGate, DamageOutcome, Damageable, DefenseProfile, DropRange, EnemyKind,
    GateResult, Hit, LootDrop, PROJECTILE_SIZE, Projectile, ProjectileSpawn, SwingId, SwingIds,
    hand_off_loot, hitbox_rect, knockback_direction, rects_overlap, resolve_attack,
};
use crate::core::{SimClock, TimerBank, TimerKey};
use crate::movement::Facing;

const DT: f32 = 10.0;

fn charger_at(x: f32) -> EnemyUnit {
    EnemyUnit::new(EnemyKind::Charger, ArchetypeStats::charger(), Vec2::new(x, 0.0))
}

fn sentinel_at(x: f32) -> EnemyUnit {
    EnemyUnit::new(EnemyKind::Sentinel, ArchetypeStats::sentinel(), Vec2::new(x, 0.0))
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

/// Hit `unit` once with a fresh swing after letting invulnerability lapse.
fn strike(
    unit: &mut EnemyUnit,
    amount: f32,
    swing: u64,
    loot: &mut Vec<LootDrop>,
    rng: &mut ChaCha8Rng,
) -> bool {
    unit.timers.tick(1000.0);
    let mut ctx = DamageContext { loot, rng };
    unit.take_damage(Hit::swing(amount, 0.0, SwingId(swing)), &mut ctx)
}

// -----------------------------------------------------------------------------
// Swing ids
// -----------------------------------------------------------------------------

#[test]
fn test_swing_ids_strictly_increase() {
    let mut ids = SwingIds::default();
    assert_eq!(ids.last(), None);
    let a = ids.allocate();
    let b = ids.allocate();
    assert!(b > a);
    assert_eq!(ids.last(), Some(b));
}

// -----------------------------------------------------------------------------
// Health, gate and damage core
// -----------------------------------------------------------------------------

#[test]
fn test_knockback_points_away_from_source() {
    assert_eq!(knockback_direction(10.0, 0.0), 1.0);
    assert_eq!(knockback_direction(0.0, 10.0), -1.0);
    assert_eq!(knockback_direction(5.0, 5.0), 1.0);
}

#[test]
fn test_gate_break_absorbs_whole_hit() {
    let mut gate = DamageGate::new(3.0);
    assert_eq!(gate.absorb(1.0), GateResult::Absorbed);
    assert_eq!(gate.absorb(5.0), GateResult::Broke);
    assert!(gate.is_broken());
    assert_eq!(gate.absorb(1.0), GateResult::PassThrough);
}

#[test]
fn test_damage_core_rejects_repeated_swing() {
    let mut core = DamageCore::new(5.0);
    let mut timers = TimerBank::new();
    let profile = DefenseProfile {
        invuln_ms: 0.0,
        ..default()
    };

    let first = core.apply(&mut timers, Hit::swing(1.0, 0.0, SwingId(3)), 10.0, &profile);
    assert!(matches!(first, DamageOutcome::Applied(_)));
    let again = core.apply(&mut timers, Hit::swing(1.0, 0.0, SwingId(3)), 10.0, &profile);
    assert_eq!(again, DamageOutcome::Rejected);
    let next = core.apply(&mut timers, Hit::swing(1.0, 0.0, SwingId(4)), 10.0, &profile);
    assert!(matches!(next, DamageOutcome::Applied(_)));
    assert_eq!(core.health.current, 3.0);
}

#[test]
fn test_damage_core_untracked_hits_are_never_deduplicated() {
    let mut core = DamageCore::new(5.0);
    let mut timers = TimerBank::new();
    let profile = DefenseProfile {
        invuln_ms: 0.0,
        ..default()
    };

    for _ in 0..3 {
        let outcome = core.apply(&mut timers, Hit::untracked(1.0, 0.0), 10.0, &profile);
        assert!(matches!(outcome, DamageOutcome::Applied(_)));
    }
    assert_eq!(core.health.current, 2.0);
    assert_eq!(core.last_swing(), None);
}

// -----------------------------------------------------------------------------
// Enemy damage contract
// -----------------------------------------------------------------------------

#[test]
fn test_enemy_knockback_away_from_source() {
    let mut loot = Vec::new();
    let mut rng = rng();
    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };

    let mut left_of_source = charger_at(0.0);
    assert!(left_of_source.take_damage(Hit::untracked(1.0, 20.0), &mut ctx));
    assert_eq!(left_of_source.velocity().x, -ArchetypeStats::charger().knockback_x);
    assert_eq!(left_of_source.ai_state(), AiState::Hurt);

    let mut right_of_source = charger_at(40.0);
    assert!(right_of_source.take_damage(Hit::untracked(1.0, 20.0), &mut ctx));
    assert_eq!(right_of_source.velocity().x, ArchetypeStats::charger().knockback_x);
}

#[test]
fn test_invulnerability_window_is_monotonic() {
    let mut unit = charger_at(0.0);
    let invuln = unit.stats().invuln_ms;
    let mut loot = Vec::new();
    let mut rng = rng();
    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };

    assert!(unit.take_damage(Hit::untracked(1.0, -10.0), &mut ctx));
    unit.timers.tick(invuln - DT);
    assert!(unit.is_invulnerable());
    assert!(!unit.take_damage(Hit::untracked(1.0, -10.0), &mut ctx));

    unit.timers.tick(2.0 * DT);
    assert!(!unit.is_invulnerable());
    assert!(unit.take_damage(Hit::untracked(1.0, -10.0), &mut ctx));
    assert_eq!(unit.current_hp(), 1.0);
}

#[test]
fn test_mask_soaks_exactly_its_pool_then_health_takes_over() {
    let mut unit = sentinel_at(0.0);
    let mut loot = Vec::new();
    let mut rng = rng();

    for swing in 1..=3 {
        assert!(strike(&mut unit, 1.0, swing, &mut loot, &mut rng));
        assert_eq!(unit.current_hp(), 6.0);
    }
    assert!(unit.mask_broken());
    assert_eq!(unit.drain_events(), vec![AiEvent::MaskBroken]);

    assert!(strike(&mut unit, 1.0, 4, &mut loot, &mut rng));
    assert_eq!(unit.current_hp(), 5.0);
    assert!(unit.mask_broken());
}

#[test]
fn test_mask_break_does_not_spill_into_health() {
    let mut unit = sentinel_at(0.0);
    let mut loot = Vec::new();
    let mut rng = rng();

    assert!(strike(&mut unit, 5.0, 1, &mut loot, &mut rng));
    assert!(unit.mask_broken());
    assert_eq!(unit.current_hp(), unit.max_hp());
}

#[test]
fn test_mask_dampens_knockback_until_broken() {
    let stats = ArchetypeStats::sentinel();
    let mut unit = sentinel_at(0.0);
    let mut loot = Vec::new();
    let mut rng = rng();

    assert!(strike(&mut unit, 1.0, 1, &mut loot, &mut rng));
    assert_eq!(
        unit.velocity().x,
        stats.knockback_x * stats.armored_knockback_scale
    );

    assert!(strike(&mut unit, 5.0, 2, &mut loot, &mut rng));
    assert!(strike(&mut unit, 1.0, 3, &mut loot, &mut rng));
    assert_eq!(unit.velocity().x, stats.knockback_x);
}

#[test]
fn test_death_is_idempotent_and_drops_loot_once() {
    let mut unit = charger_at(0.0);
    let mut loot = Vec::new();
    let mut rng = rng();

    assert!(strike(&mut unit, 10.0, 1, &mut loot, &mut rng));
    assert_eq!(unit.ai_state(), AiState::Dead);
    assert!(unit.is_dying());
    let dropped = loot.len();
    assert!((2..=4).contains(&dropped));

    for swing in 2..6 {
        assert!(!strike(&mut unit, 1.0, swing, &mut loot, &mut rng));
    }
    assert_eq!(loot.len(), dropped);

    let events = unit.drain_events();
    assert_eq!(
        events,
        vec![AiEvent::Killed {
            drops: dropped as u32
        }]
    );
}

#[test]
fn test_dead_enemy_stops_thinking() {
    let mut unit = charger_at(0.0);
    let mut loot = Vec::new();
    let mut rng = rng();
    strike(&mut unit, 10.0, 1, &mut loot, &mut rng);

    let ai = AiTuning::default();
    let mut ids = SwingIds::default();
    let mut ctx = ThinkContext {
        dt_ms: DT,
        ai: &ai,
        ids: &mut ids,
        rng: &mut rng,
    };
    let senses = Senses {
        player: Some(Vec2::new(10.0, 0.0)),
        ..default()
    };
    assert_eq!(unit.update(&senses, &mut ctx), Vec2::ZERO);
    assert_eq!(unit.ai_state(), AiState::Dead);
    assert_eq!(unit.contact_damage(), None);
}

// -----------------------------------------------------------------------------
// Loot handoff
// -----------------------------------------------------------------------------

#[test]
fn test_drop_counts_cover_the_whole_range() {
    let range = DropRange::new(2, 4);
    let mut rng = rng();
    let mut seen = [false; 5];
    for _ in 0..200 {
        let count = range.roll(&mut rng);
        assert!((2..=4).contains(&count));
        seen[count as usize] = true;
    }
    assert_eq!(seen, [false, false, true, true, true]);
}

#[test]
fn test_fixed_drop_range() {
    let mut rng = rng();
    assert_eq!(DropRange::fixed(3).roll(&mut rng), 3);
}

#[test]
fn test_hand_off_loot_calls_sink_per_drop() {
    let mut sink: Vec<LootDrop> = Vec::new();
    let mut rng = rng();
    let position = Vec2::new(12.0, 34.0);
    let count = hand_off_loot(&mut sink, &mut rng, position, DropRange::fixed(3), 5);

    assert_eq!(count, 3);
    assert_eq!(sink.len(), 3);
    assert!(sink.iter().all(|drop| drop.position == position && drop.value == 5));
}

// -----------------------------------------------------------------------------
// Attack lifecycle
// -----------------------------------------------------------------------------

#[test]
fn test_hitbox_extends_in_facing_direction() {
    let tuning = AttackTuning::default();
    let right = hitbox_rect(&tuning, Vec2::new(100.0, 0.0), Facing::Right);
    assert_eq!(right.min, Vec2::new(90.0, -22.0));
    assert_eq!(right.max, Vec2::new(140.0, 22.0));

    let left = hitbox_rect(&tuning, Vec2::new(100.0, 0.0), Facing::Left);
    assert_eq!(left.min.x, 60.0);
    assert_eq!(left.max.x, 110.0);
}

#[test]
fn test_attack_phases_and_cooldown_gate() {
    let tuning = AttackTuning::default();
    let mut timers = TimerBank::new();
    let mut ids = SwingIds::default();
    let mut lifecycle = AttackLifecycle::default();
    let position = Vec2::ZERO;

    let swing = lifecycle.start_attack(&mut timers, &mut ids, &tuning, position, Facing::Right);
    assert_eq!(swing, Some(SwingId(1)));
    assert_eq!(lifecycle.phase(), AttackPhase::Active);
    assert!(lifecycle.start_attack(&mut timers, &mut ids, &tuning, position, Facing::Right).is_none());

    let tick = |timers: &mut TimerBank, lifecycle: &mut AttackLifecycle| {
        timers.tick(DT);
        lifecycle.update(timers, &tuning, position)
    };

    for _ in 0..11 {
        assert!(tick(&mut timers, &mut lifecycle).is_some());
    }
    assert!(tick(&mut timers, &mut lifecycle).is_none());
    assert_eq!(lifecycle.phase(), AttackPhase::Recovery);
    assert_eq!(lifecycle.hitbox(), None);

    for _ in 0..16 {
        tick(&mut timers, &mut lifecycle);
    }
    assert_eq!(lifecycle.phase(), AttackPhase::Ready);
    // Recovery is over but the cooldown still gates the next swing.
    assert!(!lifecycle.can_attack(&timers));

    for _ in 0..4 {
        tick(&mut timers, &mut lifecycle);
    }
    assert!(lifecycle.can_attack(&timers));
    let next = lifecycle.start_attack(&mut timers, &mut ids, &tuning, position, Facing::Right);
    assert_eq!(next, Some(SwingId(2)));
}

#[test]
fn test_windup_delays_hitbox() {
    let tuning = AttackTuning {
        windup_ms: 50.0,
        ..default()
    };
    let mut timers = TimerBank::new();
    let mut ids = SwingIds::default();
    let mut lifecycle = AttackLifecycle::default();

    lifecycle.start_attack(&mut timers, &mut ids, &tuning, Vec2::ZERO, Facing::Right);
    assert_eq!(lifecycle.phase(), AttackPhase::Windup);
    assert_eq!(lifecycle.hitbox(), None);

    for _ in 0..4 {
        timers.tick(DT);
        assert!(lifecycle.update(&mut timers, &tuning, Vec2::ZERO).is_none());
    }
    timers.tick(DT);
    assert!(lifecycle.update(&mut timers, &tuning, Vec2::ZERO).is_some());
    assert_eq!(lifecycle.phase(), AttackPhase::Active);
}

#[test]
fn test_hitbox_follows_the_attacker() {
    let tuning = AttackTuning::default();
    let mut timers = TimerBank::new();
    let mut ids = SwingIds::default();
    let mut lifecycle = AttackLifecycle::default();
    lifecycle.start_attack(&mut timers, &mut ids, &tuning, Vec2::ZERO, Facing::Right);

    timers.tick(DT);
    let open = lifecycle.update(&mut timers, &tuning, Vec2::new(30.0, 0.0));
    let open = open.map(|open| open.rect);
    assert_eq!(open, Some(hitbox_rect(&tuning, Vec2::new(30.0, 0.0), Facing::Right)));
}

#[test]
fn test_cancel_keeps_cooldown() {
    let tuning = AttackTuning::default();
    let mut timers = TimerBank::new();
    let mut ids = SwingIds::default();
    let mut lifecycle = AttackLifecycle::default();
    lifecycle.start_attack(&mut timers, &mut ids, &tuning, Vec2::ZERO, Facing::Right);

    lifecycle.update(&mut timers, &tuning, Vec2::ZERO);

    lifecycle.cancel(&mut timers);
    assert_eq!(lifecycle.phase(), AttackPhase::Ready);
    assert_eq!(lifecycle.hitbox(), None);
    assert_eq!(lifecycle.take_pending(), None);
    assert!(!lifecycle.can_attack(&timers));
}

#[test]
fn test_pending_hitbox_is_collected_once_per_update() {
    let tuning = AttackTuning::default();
    let mut timers = TimerBank::new();
    let mut ids = SwingIds::default();
    let mut lifecycle = AttackLifecycle::default();
    assert_eq!(lifecycle.take_pending(), None);

    lifecycle.start_attack(&mut timers, &mut ids, &tuning, Vec2::ZERO, Facing::Right);
    let open = lifecycle.update(&mut timers, &tuning, Vec2::ZERO);
    assert!(open.is_some());
    assert_eq!(lifecycle.take_pending(), open);
    assert_eq!(lifecycle.take_pending(), None);

    // Past the active window nothing is left pending.
    for _ in 0..12 {
        timers.tick(DT);
        lifecycle.update(&mut timers, &tuning, Vec2::ZERO);
    }
    assert_eq!(lifecycle.phase(), AttackPhase::Recovery);
    assert_eq!(lifecycle.take_pending(), None);
}

/// One tick in schedule order: the swing advances, enemies think, then the
/// held hitbox resolves. A strike the enemy commits to this tick is discarded
/// by the hit before enemy attacks resolve.
#[test]
fn test_player_hitbox_resolves_after_enemies_think() {
    let tuning = AttackTuning::default();
    let ai = AiTuning::default();
    let mut ids = SwingIds::default();
    let mut clock = SimClock::default();
    let mut rng = rng();
    let mut loot: Vec<LootDrop> = Vec::new();
    let position = Vec2::new(100.0, 0.0);
    let senses = Senses {
        player: Some(position),
        ground_ahead: true,
        ..default()
    };

    let mut enemies = vec![charger_at(120.0)];
    let think = |enemies: &mut Vec<EnemyUnit>, ids: &mut SwingIds, rng: &mut ChaCha8Rng| {
        let mut ctx = ThinkContext {
            dt_ms: DT,
            ai: &ai,
            ids,
            rng,
        };
        for enemy in enemies.iter_mut() {
            enemy.update(&senses, &mut ctx);
        }
    };
    think(&mut enemies, &mut ids, &mut rng);
    think(&mut enemies, &mut ids, &mut rng);
    assert_eq!(enemies[0].ai_state(), AiState::Telegraph);
    while enemies[0].timers().remaining(TimerKey::Telegraph) > DT {
        think(&mut enemies, &mut ids, &mut rng);
    }

    let mut timers = TimerBank::new();
    let mut lifecycle = AttackLifecycle::default();
    lifecycle.start_attack(&mut timers, &mut ids, &tuning, position, Facing::Right);
    lifecycle.update(&mut timers, &tuning, position);

    think(&mut enemies, &mut ids, &mut rng);
    assert_eq!(enemies[0].ai_state(), AiState::Attack);
    assert!(enemies[0].pending_strike().is_some());

    let open = lifecycle.take_pending().expect("active swing is pending");
    let landed = {
        let mut ctx = DamageContext {
            loot: &mut loot,
            rng: &mut rng,
        };
        resolve_attack(
            open.rect,
            open.swing,
            Hit::swing(tuning.damage, position.x, open.swing),
            enemies.iter_mut(),
            &mut ctx,
            &mut clock,
        )
    };
    assert_eq!(landed, vec![0]);
    assert_eq!(enemies[0].ai_state(), AiState::Hurt);
    assert_eq!(enemies[0].pending_strike(), None);
}

// -----------------------------------------------------------------------------
// Hit resolution
// -----------------------------------------------------------------------------

#[test]
fn test_rect_overlap_is_strict() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(rects_overlap(a, Rect::new(5.0, 5.0, 15.0, 15.0)));
    assert!(!rects_overlap(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
    assert!(!rects_overlap(a, Rect::new(0.0, 10.0, 10.0, 20.0)));
}

#[test]
fn test_one_swing_damages_each_defender_at_most_once() {
    let mut enemies = vec![charger_at(120.0), charger_at(130.0), charger_at(400.0)];
    let mut clock = SimClock::default();
    let mut loot = Vec::new();
    let mut rng = rng();
    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };
    let hitbox = Rect::new(90.0, -22.0, 140.0, 22.0);
    let swing = SwingId(1);

    let landed = resolve_attack(
        hitbox,
        swing,
        Hit::swing(1.0, 100.0, swing),
        enemies.iter_mut(),
        &mut ctx,
        &mut clock,
    );
    assert_eq!(landed, vec![0, 1]);

    // Long after invulnerability, the same swing still cannot land again.
    for enemy in &mut enemies {
        enemy.timers.tick(1000.0);
    }
    let again = resolve_attack(
        hitbox,
        swing,
        Hit::swing(1.0, 100.0, swing),
        enemies.iter_mut(),
        &mut ctx,
        &mut clock,
    );
    assert!(again.is_empty());
    assert_eq!(enemies[0].last_hit_by(), Some(swing));
    assert_eq!(enemies[2].last_hit_by(), None);
    assert_eq!(enemies[0].current_hp(), 2.0);
}

#[test]
fn test_hitstop_opens_once_per_window() {
    let mut enemies = vec![charger_at(120.0), charger_at(130.0)];
    let mut clock = SimClock::new(60.0, 0.05);
    let mut loot = Vec::new();
    let mut rng = rng();
    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };
    let hitbox = Rect::new(90.0, -22.0, 140.0, 22.0);

    resolve_attack(
        hitbox,
        SwingId(1),
        Hit::untracked(1.0, 100.0),
        enemies.iter_mut(),
        &mut ctx,
        &mut clock,
    );
    assert_eq!(clock.windows_opened(), 1);

    for enemy in &mut enemies {
        enemy.timers.tick(1000.0);
    }
    clock.tick_real(30.0);
    resolve_attack(
        hitbox,
        SwingId(2),
        Hit::untracked(1.0, 100.0),
        enemies.iter_mut(),
        &mut ctx,
        &mut clock,
    );
    assert_eq!(clock.windows_opened(), 1);
    assert!(clock.tick_real(30.0));
    assert_eq!(clock.restores(), 1);
}

#[test]
fn test_missed_swing_leaves_clock_alone() {
    let mut enemies = vec![charger_at(500.0)];
    let mut clock = SimClock::default();
    let mut loot = Vec::new();
    let mut rng = rng();
    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };

    let landed = resolve_attack(
        Rect::new(90.0, -22.0, 140.0, 22.0),
        SwingId(1),
        Hit::untracked(1.0, 100.0),
        enemies.iter_mut(),
        &mut ctx,
        &mut clock,
    );
    assert!(landed.is_empty());
    assert!(!clock.in_hitstop());
}

/// Player at x=100 swings (id 7) into a 2 HP enemy at x=120, then swings
/// again (id 8) once hitstun has cleared.
#[test]
fn test_two_swings_kill_two_hp_enemy() {
    let tuning = AttackTuning::default();
    let ai = AiTuning::default();
    let stats = ArchetypeStats {
        max_health: 2.0,
        hitstun_ms: 200.0,
        invuln_ms: 150.0,
        drops: DropRange::new(2, 4),
        ..ArchetypeStats::charger()
    };
    let mut enemies = vec![EnemyUnit::new(EnemyKind::Charger, stats, Vec2::new(120.0, 0.0))];
    let mut ids = SwingIds::default();
    for _ in 0..6 {
        ids.allocate();
    }
    let mut clock = SimClock::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut loot: Vec<LootDrop> = Vec::new();

    let position = Vec2::new(100.0, 0.0);
    let mut timers = TimerBank::new();
    let mut lifecycle = AttackLifecycle::default();
    let senses = Senses::default();

    let first = lifecycle.start_attack(&mut timers, &mut ids, &tuning, position, Facing::Right);
    assert_eq!(first, Some(SwingId(7)));
    let hitbox = lifecycle.hitbox().expect("swing opens a hitbox");
    assert_eq!(hitbox.min.x, 90.0);
    assert_eq!(hitbox.max.x, 140.0);

    let mut elapsed = 0.0;
    let mut first_hits = 0;
    let tick_hit = |timers: &mut TimerBank,
                        lifecycle: &mut AttackLifecycle,
                        enemies: &mut Vec<EnemyUnit>,
                        ids: &mut SwingIds,
                        clock: &mut SimClock,
                        rng: &mut ChaCha8Rng,
                        loot: &mut Vec<LootDrop>|
     -> Vec<usize> {
        timers.tick(DT);
        {
            let mut think = ThinkContext {
                dt_ms: DT,
                ai: &ai,
                ids: &mut *ids,
                rng: &mut *rng,
            };
            for enemy in enemies.iter_mut() {
                enemy.update(&senses, &mut think);
            }
        }
        let Some(open) = lifecycle.update(timers, &tuning, position) else {
            return Vec::new();
        };
        let mut ctx = DamageContext { loot, rng };
        resolve_attack(
            open.rect,
            open.swing,
            Hit::swing(tuning.damage, position.x, open.swing),
            enemies.iter_mut(),
            &mut ctx,
            clock,
        )
    };

    // The first active tick is resolved right after the swing opens.
    {
        let mut ctx = DamageContext {
            loot: &mut loot,
            rng: &mut rng,
        };
        let landed = resolve_attack(
            hitbox,
            SwingId(7),
            Hit::swing(1.0, 100.0, SwingId(7)),
            enemies.iter_mut(),
            &mut ctx,
            &mut clock,
        );
        first_hits += landed.len();
    }
    assert_eq!(first_hits, 1);
    assert_eq!(enemies[0].current_hp(), 1.0);
    assert_eq!(enemies[0].ai_state(), AiState::Hurt);

    // The rest of the 120ms window lands nothing.
    while lifecycle.phase() == AttackPhase::Active {
        let landed = tick_hit(
            &mut timers,
            &mut lifecycle,
            &mut enemies,
            &mut ids,
            &mut clock,
            &mut rng,
            &mut loot,
        );
        assert!(landed.is_empty());
        elapsed += DT;
    }
    assert_eq!(elapsed, 120.0);
    assert_eq!(enemies[0].current_hp(), 1.0);

    // Invulnerability has lapsed; swing 7 is still refused by the swing record.
    while elapsed < 160.0 {
        tick_hit(
            &mut timers,
            &mut lifecycle,
            &mut enemies,
            &mut ids,
            &mut clock,
            &mut rng,
            &mut loot,
        );
        elapsed += DT;
    }
    {
        let mut ctx = DamageContext {
            loot: &mut loot,
            rng: &mut rng,
        };
        assert!(!enemies[0].is_invulnerable());
        assert!(!enemies[0].take_damage(Hit::swing(1.0, 100.0, SwingId(7)), &mut ctx));
    }
    assert_eq!(enemies[0].current_hp(), 1.0);

    // Hitstun clears and the next swing becomes available.
    while !lifecycle.can_attack(&timers) {
        tick_hit(
            &mut timers,
            &mut lifecycle,
            &mut enemies,
            &mut ids,
            &mut clock,
            &mut rng,
            &mut loot,
        );
    }
    assert_ne!(enemies[0].ai_state(), AiState::Hurt);

    let second = lifecycle.start_attack(&mut timers, &mut ids, &tuning, position, Facing::Right);
    assert_eq!(second, Some(SwingId(8)));
    let hitbox = lifecycle.hitbox().expect("swing opens a hitbox");
    let landed = {
        let mut ctx = DamageContext {
            loot: &mut loot,
            rng: &mut rng,
        };
        resolve_attack(
            hitbox,
            SwingId(8),
            Hit::swing(1.0, 100.0, SwingId(8)),
            enemies.iter_mut(),
            &mut ctx,
            &mut clock,
        )
    };
    assert_eq!(landed, vec![0]);
    assert_eq!(enemies[0].ai_state(), AiState::Dead);
    assert!((2..=4).contains(&loot.len()));
    assert_eq!(
        enemies[0].drain_events(),
        vec![AiEvent::Killed {
            drops: loot.len() as u32
        }]
    );
}

// -----------------------------------------------------------------------------
// Projectiles
// -----------------------------------------------------------------------------

#[test]
fn test_projectile_flies_until_lifetime_runs_out() {
    let mut projectile = Projectile::from(ProjectileSpawn {
        position: Vec2::ZERO,
        velocity: Vec2::new(100.0, 0.0),
        damage: 1.0,
        swing: SwingId(3),
        lifetime_ms: 30.0,
    });

    assert!(projectile.advance(DT));
    assert!(projectile.advance(DT));
    assert!(!projectile.advance(DT));
    assert!((projectile.position.x - 3.0).abs() < 1e-4);
    assert_eq!(projectile.rect().size(), PROJECTILE_SIZE);
    assert_eq!(projectile.swing, SwingId(3));
}
