//! Combat domain: damage contract, attack lifecycle, hit resolution, enemy AI
//! and loot handoff.

pub mod ai;
mod attack;
mod components;
mod damage;
mod events;
mod hits;
mod loot;
mod projectile;
mod resources;
mod spawn;
mod systems;

#[cfg(test)]
mod tests;

pub use attack::{AttackLifecycle, AttackPhase, OpenHitbox, hitbox_rect};
pub use components::{Corpse, DamageGate, Enemy, EnemyKind, GateResult, Health};
pub use damage::{
    AppliedHit, DamageContext, DamageCore, DamageOutcome, Damageable, DefenseProfile, Hit,
    SwingId, SwingIds, knockback_direction,
};
pub use events::{
    BossPhaseChanged, EnemyKilled, HitLanded, LootDropped, MaskBroken, PlayerDefeated,
};
pub use hits::{rects_overlap, resolve_attack};
pub use loot::{LootDrop, LootSink, NoLoot, hand_off_loot};
pub use projectile::{PROJECTILE_SIZE, Projectile, ProjectileSpawn};
pub use resources::{
    AiTuning, ArchetypeOverride, ArchetypeStats, ArchetypeTable, AttackTuning, CombatTuning,
    DropRange,
};
pub use spawn::{EnemyBundle, spawn_enemy};

use bevy::prelude::*;

use crate::combat::systems::{
    advance_projectiles, despawn_corpses, dispatch_enemy_events, handle_enemy_deaths,
    player_attack, probe_ground_ahead, report_player_defeat, resolve_enemy_attacks,
    resolve_player_attack, spawn_enemy_projectiles, sync_enemy_bodies, think_enemies,
    write_back_velocities,
};
use crate::core::SimSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AttackTuning>()
            .init_resource::<CombatTuning>()
            .init_resource::<AiTuning>()
            .init_resource::<ArchetypeTable>()
            .init_resource::<SwingIds>()
            .add_message::<HitLanded>()
            .add_message::<EnemyKilled>()
            .add_message::<LootDropped>()
            .add_message::<BossPhaseChanged>()
            .add_message::<MaskBroken>()
            .add_message::<PlayerDefeated>()
            .add_systems(
                Update,
                (sync_enemy_bodies, probe_ground_ahead)
                    .chain()
                    .in_set(SimSet::Sense),
            )
            .add_systems(Update, player_attack.in_set(SimSet::Attack))
            .add_systems(Update, think_enemies.in_set(SimSet::Ai))
            .add_systems(
                Update,
                (
                    resolve_player_attack,
                    spawn_enemy_projectiles,
                    resolve_enemy_attacks,
                    advance_projectiles,
                )
                    .chain()
                    .in_set(SimSet::Resolve),
            )
            .add_systems(Update, write_back_velocities.in_set(SimSet::Writeback))
            .add_systems(
                Update,
                (
                    dispatch_enemy_events,
                    report_player_defeat,
                    handle_enemy_deaths,
                    despawn_corpses,
                )
                    .chain()
                    .in_set(SimSet::Cleanup),
            );
    }
}
