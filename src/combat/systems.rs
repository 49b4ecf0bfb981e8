//! Combat domain: ECS systems feeding the attack lifecycle, enemy AI and hit
//! resolution, and writing their results back to physics.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::combat::ai::{AiEvent, AiState, EnemyUnit, Senses, ThinkContext};
use crate::combat::attack::AttackLifecycle;
use crate::combat::components::{Corpse, Enemy};
use crate::combat::damage::{DamageContext, Damageable, Hit, SwingIds};
use crate::combat::events::{
    BossPhaseChanged, EnemyKilled, HitLanded, LootDropped, MaskBroken, PlayerDefeated,
};
use crate::combat::hits::{rects_overlap, resolve_attack};
use crate::combat::loot::LootDrop;
use crate::combat::projectile::{PROJECTILE_SIZE, Projectile};
use crate::combat::resources::{AiTuning, AttackTuning, CombatTuning};
use crate::core::{Action, ActionSnapshot, CombatRng, InputSnapshot, SimClock, SpawnOrder, delta_ms};
use crate::movement::{ContactFlags, ContactProbe, GameLayer, GroundAhead, Player, PlayerController};

/// How far below the feet the ledge probe looks.
const LEDGE_PROBE_DEPTH: f32 = 8.0;

fn emit_loot(drops: Vec<LootDrop>, writer: &mut MessageWriter<LootDropped>) {
    for drop in drops {
        writer.write(LootDropped {
            position: drop.position,
            value: drop.value,
        });
    }
}

pub(crate) fn sync_enemy_bodies(
    mut query: Query<(&Transform, &LinearVelocity, &mut EnemyUnit), With<Enemy>>,
) {
    for (transform, velocity, mut unit) in &mut query {
        if unit.ai_state() == AiState::Dead {
            continue;
        }
        unit.sync_body(transform.translation.truncate(), velocity.0);
    }
}

/// Look for floor just past the leading edge of each walking enemy.
pub(crate) fn probe_ground_ahead(
    spatial_query: SpatialQuery,
    mut query: Query<(&Transform, &ContactProbe, &EnemyUnit, &mut GroundAhead), With<Enemy>>,
) {
    let solid_filter = SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Wall]);

    for (transform, probe, unit, mut ground_ahead) in &mut query {
        if !unit.uses_gravity() {
            continue;
        }
        let center = transform.translation.truncate();
        let lead = unit.facing().sign() * (probe.half_extents.x + probe.edge_check_distance);
        let origin = center + Vec2::new(lead, -probe.half_extents.y);
        let found = spatial_query
            .cast_ray(origin, Dir2::NEG_Y, LEDGE_PROBE_DEPTH, true, &solid_filter)
            .is_some();
        if ground_ahead.0 != found {
            ground_ahead.0 = found;
        }
    }
}

/// Start swings on the attack press and advance the open one. The hitbox is
/// held on the lifecycle until [`resolve_player_attack`] runs after the AI.
pub(crate) fn player_attack(
    input: Res<ActionSnapshot>,
    tuning: Res<AttackTuning>,
    mut ids: ResMut<SwingIds>,
    mut players: Query<(&mut PlayerController, &mut AttackLifecycle), With<Player>>,
) {
    for (mut controller, mut lifecycle) in &mut players {
        if controller.is_dying() {
            lifecycle.cancel(controller.timers_mut());
            continue;
        }
        let position = controller.position();
        let facing = controller.facing();

        if input.just_pressed(Action::Attack) {
            lifecycle.start_attack(controller.timers_mut(), &mut ids, &tuning, position, facing);
        }
        lifecycle.update(controller.timers_mut(), &tuning, position);
    }
}

/// Resolve this tick's player hitbox against every enemy, after they have
/// thought.
pub(crate) fn resolve_player_attack(
    tuning: Res<AttackTuning>,
    mut clock: ResMut<SimClock>,
    mut rng: ResMut<CombatRng>,
    mut players: Query<(&PlayerController, &mut AttackLifecycle), With<Player>>,
    mut enemies: Query<(Entity, &SpawnOrder, &mut EnemyUnit), With<Enemy>>,
    mut hits: MessageWriter<HitLanded>,
    mut loot: MessageWriter<LootDropped>,
) {
    for (controller, mut lifecycle) in &mut players {
        let Some(open) = lifecycle.take_pending() else {
            continue;
        };
        let origin = controller.position().x;

        let mut targets: Vec<_> = enemies
            .iter_mut()
            .map(|(entity, order, unit)| (*order, entity, unit))
            .collect();
        targets.sort_by_key(|(order, _, _)| *order);

        let mut drops = Vec::new();
        let landed = {
            let mut ctx = DamageContext {
                loot: &mut drops,
                rng: &mut rng.rng,
            };
            resolve_attack(
                open.rect,
                open.swing,
                Hit::swing(tuning.damage, origin, open.swing),
                targets.iter_mut().map(|(_, _, unit)| &mut **unit),
                &mut ctx,
                &mut clock,
            )
        };

        for index in landed {
            let (_, entity, unit) = &targets[index];
            hits.write(HitLanded {
                target: *entity,
                swing: Some(open.swing),
                position: unit.position(),
            });
        }
        emit_loot(drops, &mut loot);
    }
}

/// Every enemy thinks once, in spawn order, against the same player snapshot.
pub(crate) fn think_enemies(
    time: Res<Time>,
    ai: Res<AiTuning>,
    mut ids: ResMut<SwingIds>,
    mut rng: ResMut<CombatRng>,
    players: Query<&PlayerController, With<Player>>,
    mut enemies: Query<(&SpawnOrder, &ContactFlags, &GroundAhead, &mut EnemyUnit), With<Enemy>>,
) {
    let dt_ms = delta_ms(&time);
    if dt_ms <= 0.0 {
        return;
    }
    let player = players
        .iter()
        .find(|controller| !controller.is_dying())
        .map(PlayerController::position);

    let mut ordered: Vec<_> = enemies.iter_mut().collect();
    ordered.sort_by_key(|(order, _, _, _)| **order);

    let mut ctx = ThinkContext {
        dt_ms,
        ai: &ai,
        ids: &mut ids,
        rng: &mut rng.rng,
    };
    for (_, contacts, ground_ahead, mut unit) in ordered {
        let senses = Senses {
            player,
            contacts: *contacts,
            ground_ahead: ground_ahead.0,
        };
        unit.update(&senses, &mut ctx);
    }
}

/// Enemy strikes and body contact against the player.
#[allow(clippy::too_many_arguments)]
pub(crate) fn resolve_enemy_attacks(
    mut clock: ResMut<SimClock>,
    mut rng: ResMut<CombatRng>,
    mut players: Query<(Entity, &mut PlayerController), With<Player>>,
    mut enemies: Query<(&SpawnOrder, &mut EnemyUnit), With<Enemy>>,
    mut hits: MessageWriter<HitLanded>,
) {
    let Some((player_entity, mut controller)) = players.iter_mut().next() else {
        return;
    };

    let mut ordered: Vec<_> = enemies.iter_mut().collect();
    ordered.sort_by_key(|(order, _)| **order);

    let mut no_loot = crate::combat::loot::NoLoot;
    let mut ctx = DamageContext {
        loot: &mut no_loot,
        rng: &mut rng.rng,
    };

    for (_, mut unit) in ordered {
        if controller.is_dying() {
            break;
        }
        let source_x = unit.position().x;

        if let Some(strike) = unit.pending_strike() {
            let landed = resolve_attack(
                strike.rect,
                strike.swing,
                Hit::swing(strike.damage, source_x, strike.swing),
                std::iter::once(&mut *controller),
                &mut ctx,
                &mut clock,
            );
            if !landed.is_empty() {
                unit.mark_strike_landed();
                hits.write(HitLanded {
                    target: player_entity,
                    swing: Some(strike.swing),
                    position: controller.position(),
                });
                continue;
            }
        }

        let Some(damage) = unit.contact_damage() else {
            continue;
        };
        if rects_overlap(unit.hit_rect(), controller.hit_rect())
            && controller.take_damage(Hit::untracked(damage, source_x), &mut ctx)
        {
            hits.write(HitLanded {
                target: player_entity,
                swing: None,
                position: controller.position(),
            });
        }
    }
}

pub(crate) fn spawn_enemy_projectiles(
    mut commands: Commands,
    mut enemies: Query<&mut EnemyUnit, With<Enemy>>,
) {
    for mut unit in &mut enemies {
        for spawn in unit.drain_projectiles() {
            commands.spawn((
                Projectile::from(spawn),
                Sprite {
                    color: Color::srgb(1.0, 0.5, 0.2),
                    custom_size: Some(PROJECTILE_SIZE),
                    ..default()
                },
                Transform::from_xyz(spawn.position.x, spawn.position.y, 1.0),
            ));
        }
    }
}

/// Fly projectiles and resolve them against the player. A projectile is spent
/// on its first hit or when its lifetime runs out.
pub(crate) fn advance_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mut clock: ResMut<SimClock>,
    mut rng: ResMut<CombatRng>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    mut players: Query<(Entity, &mut PlayerController), With<Player>>,
    mut hits: MessageWriter<HitLanded>,
) {
    let dt_ms = delta_ms(&time);
    let mut player = players.iter_mut().next();
    let mut no_loot = crate::combat::loot::NoLoot;

    for (entity, mut projectile, mut transform) in &mut projectiles {
        let alive = projectile.advance(dt_ms);
        transform.translation.x = projectile.position.x;
        transform.translation.y = projectile.position.y;

        let mut spent = !alive;
        if let Some((player_entity, controller)) = player.as_mut() {
            let mut ctx = DamageContext {
                loot: &mut no_loot,
                rng: &mut rng.rng,
            };
            let landed = resolve_attack(
                projectile.rect(),
                projectile.swing,
                Hit::swing(projectile.damage, projectile.position.x, projectile.swing),
                std::iter::once(&mut **controller),
                &mut ctx,
                &mut clock,
            );
            if !landed.is_empty() {
                spent = true;
                hits.write(HitLanded {
                    target: *player_entity,
                    swing: Some(projectile.swing),
                    position: controller.position(),
                });
            }
        }
        if spent {
            commands.entity(entity).despawn();
        }
    }
}

/// Copy motor and AI velocities to physics.
pub(crate) fn write_back_velocities(
    mut players: Query<(&PlayerController, &mut LinearVelocity), (With<Player>, Without<Enemy>)>,
    mut enemies: Query<(&EnemyUnit, &mut LinearVelocity), (With<Enemy>, Without<Player>)>,
) {
    for (controller, mut velocity) in &mut players {
        if !controller.is_dying() {
            velocity.0 = controller.velocity();
        }
    }
    for (unit, mut velocity) in &mut enemies {
        if unit.ai_state() != AiState::Dead {
            velocity.0 = unit.velocity();
        }
    }
}

/// Turn AI events into messages.
pub(crate) fn dispatch_enemy_events(
    mut enemies: Query<(Entity, &mut EnemyUnit), With<Enemy>>,
    mut killed: MessageWriter<EnemyKilled>,
    mut masks: MessageWriter<MaskBroken>,
    mut phases: MessageWriter<BossPhaseChanged>,
) {
    for (entity, mut unit) in &mut enemies {
        for event in unit.drain_events() {
            match event {
                AiEvent::Killed { drops } => {
                    killed.write(EnemyKilled {
                        entity,
                        kind: unit.kind(),
                        position: unit.position(),
                        drops,
                    });
                }
                AiEvent::MaskBroken => {
                    masks.write(MaskBroken { entity });
                }
                AiEvent::PhaseChanged(phase) => {
                    phases.write(BossPhaseChanged {
                        boss: entity,
                        phase,
                    });
                }
            }
        }
    }
}

pub(crate) fn report_player_defeat(
    mut players: Query<&mut PlayerController, With<Player>>,
    mut defeated: MessageWriter<PlayerDefeated>,
) {
    for mut controller in &mut players {
        if controller.take_defeat_signal() {
            defeated.write(PlayerDefeated {
                position: controller.position(),
            });
        }
    }
}

/// Dead enemies stop colliding at once and despawn after the grace period.
pub(crate) fn handle_enemy_deaths(
    mut commands: Commands,
    tuning: Res<CombatTuning>,
    query: Query<(Entity, &EnemyUnit), (With<Enemy>, Without<Corpse>)>,
) {
    for (entity, unit) in &query {
        if unit.ai_state() != AiState::Dead {
            continue;
        }
        commands.entity(entity).insert((
            Corpse {
                remaining_ms: tuning.corpse_grace_ms,
            },
            RigidBodyDisabled,
            ColliderDisabled,
        ));
    }
}

pub(crate) fn despawn_corpses(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Corpse)>,
) {
    let dt_ms = delta_ms(&time);
    for (entity, mut corpse) in &mut query {
        corpse.remaining_ms -= dt_ms;
        if corpse.remaining_ms <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
