//! Combat domain: tuning resources and per-archetype stats.
//!
//! All of these are loaded once at startup and never mutated afterwards.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::components::EnemyKind;
use crate::combat::damage::DefenseProfile;

/// Inclusive range of drops spawned when an enemy dies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRange {
    pub min: u32,
    pub max: u32,
}

impl DropRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Fixed count (no variance)
    pub fn fixed(count: u32) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    /// Uniform roll in `min..=max`
    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

impl Default for DropRange {
    fn default() -> Self {
        Self::new(2, 4)
    }
}

/// Player attack timing and hitbox geometry. Durations are milliseconds.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTuning {
    pub damage: f32,
    pub windup_ms: f32,
    pub active_ms: f32,
    pub recovery_ms: f32,
    /// Gates the next swing independently of recovery.
    pub cooldown_ms: f32,
    /// Horizontal distance from the body centre to the hitbox centre.
    pub hitbox_offset: f32,
    pub hitbox_offset_y: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            damage: 1.0,
            windup_ms: 0.0,
            active_ms: 120.0,
            recovery_ms: 160.0,
            cooldown_ms: 320.0,
            hitbox_offset: 15.0,
            hitbox_offset_y: 0.0,
            hitbox_width: 50.0,
            hitbox_height: 44.0,
        }
    }
}

/// Global hit-resolution constants.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub hitstop_ms: f32,
    /// Time scale while hitstop is active.
    pub hitstop_scale: f32,
    pub player_max_health: f32,
    pub player_invuln_ms: f32,
    pub player_knockback_x: f32,
    pub player_knockback_y: f32,
    /// How long a dead enemy lingers before despawning.
    pub corpse_grace_ms: f32,
    /// Fixed RNG seed; a fresh seed is drawn when absent.
    pub rng_seed: Option<u64>,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            hitstop_ms: 60.0,
            hitstop_scale: 0.05,
            player_max_health: 5.0,
            player_invuln_ms: 1000.0,
            player_knockback_x: 280.0,
            player_knockback_y: 220.0,
            corpse_grace_ms: 600.0,
            rng_seed: None,
        }
    }
}

impl CombatTuning {
    pub fn player_defense(&self) -> DefenseProfile {
        DefenseProfile {
            hitstun_ms: 0.0,
            hitstun_multiplier: 1.0,
            invuln_ms: self.player_invuln_ms,
            knockback_x: self.player_knockback_x,
            knockback_y: self.player_knockback_y,
            knockback_scale: 1.0,
            damage_scale: 1.0,
        }
    }
}

/// Timing constants shared by every AI archetype.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// How far ahead of a walker the floor probe looks.
    pub edge_check_distance: f32,
    /// Minimum time between two patrol turnarounds.
    pub turn_cooldown_ms: f32,
    /// Deaggro radius as a multiple of aggro radius when an archetype leaves it unset.
    pub deaggro_multiplier: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            edge_check_distance: 14.0,
            turn_cooldown_ms: 400.0,
            deaggro_multiplier: 1.5,
        }
    }
}

/// Combat stats of one enemy archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeStats {
    pub max_health: f32,
    /// Mask/armor pool; 0 means none.
    pub mask_health: f32,
    pub contact_damage: f32,
    pub width: f32,
    pub height: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub aggro_radius: f32,
    /// 0 derives it from `AiTuning::deaggro_multiplier`.
    pub deaggro_radius: f32,
    /// Maximum vertical distance at which the player is noticed.
    pub vertical_band: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub telegraph_ms: f32,
    pub commit_ms: f32,
    pub recover_ms: f32,
    pub attack_cooldown_ms: f32,
    /// Horizontal speed while the committed attack runs.
    pub lunge_speed: f32,
    pub strike_width: f32,
    pub strike_height: f32,
    pub strike_offset: f32,
    pub hitstun_ms: f32,
    /// Below 1 for heavy bodies that shrug off stagger.
    pub hitstun_multiplier: f32,
    pub invuln_ms: f32,
    pub knockback_x: f32,
    pub knockback_y: f32,
    /// Knockback scale while the mask holds.
    pub armored_knockback_scale: f32,
    /// Fraction of damage taken while in defensive stance.
    pub stance_damage_scale: f32,
    pub stance_ms: f32,
    /// Speed multiplier once the mask breaks.
    pub enraged_speed_multiplier: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_lifetime_ms: f32,
    pub hover_amplitude: f32,
    pub hover_period_ms: f32,
    /// Distance from spawn beyond which a flyer gives up and returns.
    pub leash_radius: f32,
    pub emerge_ms: f32,
    /// Descending health fractions that each open the next boss phase.
    pub phase_thresholds: Vec<f32>,
    pub phase_shift_ms: f32,
    /// Per-phase speed multiplier, applied after each threshold.
    pub phase_speed_step: f32,
    pub drops: DropRange,
    pub drop_value: u32,
}

impl Default for ArchetypeStats {
    fn default() -> Self {
        Self {
            max_health: 3.0,
            mask_health: 0.0,
            contact_damage: 1.0,
            width: 28.0,
            height: 32.0,
            patrol_speed: 60.0,
            chase_speed: 140.0,
            aggro_radius: 220.0,
            deaggro_radius: 0.0,
            vertical_band: 80.0,
            attack_range: 60.0,
            attack_damage: 1.0,
            telegraph_ms: 350.0,
            commit_ms: 250.0,
            recover_ms: 400.0,
            attack_cooldown_ms: 800.0,
            lunge_speed: 260.0,
            strike_width: 40.0,
            strike_height: 30.0,
            strike_offset: 26.0,
            hitstun_ms: 200.0,
            hitstun_multiplier: 1.0,
            invuln_ms: 150.0,
            knockback_x: 220.0,
            knockback_y: 0.0,
            armored_knockback_scale: 1.0,
            stance_damage_scale: 1.0,
            stance_ms: 0.0,
            enraged_speed_multiplier: 1.0,
            projectile_speed: 0.0,
            projectile_damage: 1.0,
            projectile_lifetime_ms: 2000.0,
            hover_amplitude: 0.0,
            hover_period_ms: 1600.0,
            leash_radius: 0.0,
            emerge_ms: 0.0,
            phase_thresholds: Vec::new(),
            phase_shift_ms: 0.0,
            phase_speed_step: 1.0,
            drops: DropRange::default(),
            drop_value: 1,
        }
    }
}

impl ArchetypeStats {
    pub fn defense(&self) -> DefenseProfile {
        DefenseProfile {
            hitstun_ms: self.hitstun_ms,
            hitstun_multiplier: self.hitstun_multiplier,
            invuln_ms: self.invuln_ms,
            knockback_x: self.knockback_x,
            knockback_y: self.knockback_y,
            knockback_scale: 1.0,
            damage_scale: 1.0,
        }
    }

    pub fn deaggro_radius(&self, ai: &AiTuning) -> f32 {
        if self.deaggro_radius > 0.0 {
            self.deaggro_radius
        } else {
            self.aggro_radius * ai.deaggro_multiplier
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn charger() -> Self {
        Self {
            max_health: 3.0,
            drops: DropRange::new(2, 4),
            ..default()
        }
    }

    pub fn flyer() -> Self {
        Self {
            max_health: 2.0,
            width: 26.0,
            height: 22.0,
            patrol_speed: 0.0,
            chase_speed: 120.0,
            aggro_radius: 260.0,
            vertical_band: 220.0,
            attack_range: 0.0,
            hover_amplitude: 10.0,
            hover_period_ms: 1600.0,
            leash_radius: 420.0,
            drops: DropRange::new(1, 3),
            ..default()
        }
    }

    pub fn skirmisher() -> Self {
        Self {
            max_health: 2.0,
            patrol_speed: 50.0,
            chase_speed: 90.0,
            aggro_radius: 320.0,
            vertical_band: 120.0,
            attack_range: 260.0,
            telegraph_ms: 450.0,
            commit_ms: 100.0,
            recover_ms: 500.0,
            attack_cooldown_ms: 1400.0,
            lunge_speed: 0.0,
            projectile_speed: 320.0,
            drops: DropRange::new(2, 3),
            ..default()
        }
    }

    pub fn sentinel() -> Self {
        Self {
            max_health: 6.0,
            mask_health: 3.0,
            contact_damage: 1.0,
            width: 36.0,
            height: 44.0,
            patrol_speed: 40.0,
            chase_speed: 90.0,
            attack_range: 70.0,
            telegraph_ms: 500.0,
            commit_ms: 300.0,
            recover_ms: 500.0,
            lunge_speed: 200.0,
            strike_width: 56.0,
            strike_height: 40.0,
            strike_offset: 32.0,
            hitstun_multiplier: 0.5,
            armored_knockback_scale: 0.25,
            stance_damage_scale: 0.3,
            stance_ms: 700.0,
            enraged_speed_multiplier: 1.5,
            drops: DropRange::new(5, 8),
            ..default()
        }
    }

    pub fn lurker() -> Self {
        Self {
            max_health: 10.0,
            contact_damage: 2.0,
            width: 40.0,
            height: 48.0,
            patrol_speed: 0.0,
            chase_speed: 160.0,
            aggro_radius: 180.0,
            vertical_band: 100.0,
            attack_range: 180.0,
            attack_damage: 2.0,
            telegraph_ms: 400.0,
            commit_ms: 350.0,
            recover_ms: 700.0,
            attack_cooldown_ms: 600.0,
            lunge_speed: 0.0,
            strike_width: 48.0,
            strike_height: 96.0,
            strike_offset: 0.0,
            hitstun_multiplier: 0.4,
            emerge_ms: 450.0,
            drops: DropRange::new(8, 12),
            ..default()
        }
    }

    pub fn warden() -> Self {
        Self {
            max_health: 30.0,
            contact_damage: 2.0,
            width: 56.0,
            height: 72.0,
            patrol_speed: 0.0,
            chase_speed: 120.0,
            aggro_radius: 500.0,
            deaggro_radius: 10_000.0,
            vertical_band: 300.0,
            attack_range: 110.0,
            attack_damage: 2.0,
            telegraph_ms: 500.0,
            commit_ms: 350.0,
            recover_ms: 600.0,
            attack_cooldown_ms: 700.0,
            lunge_speed: 420.0,
            strike_width: 80.0,
            strike_height: 60.0,
            strike_offset: 44.0,
            hitstun_ms: 120.0,
            hitstun_multiplier: 0.5,
            knockback_x: 60.0,
            projectile_speed: 360.0,
            projectile_damage: 1.0,
            phase_thresholds: vec![0.66, 0.33],
            phase_shift_ms: 900.0,
            phase_speed_step: 1.25,
            drops: DropRange::new(20, 30),
            ..default()
        }
    }
}

/// Per-spawn stat overrides layered on an archetype. Unset fields keep the
/// archetype's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeOverride {
    pub max_health: Option<f32>,
    pub mask_health: Option<f32>,
    pub contact_damage: Option<f32>,
    pub patrol_speed: Option<f32>,
    pub chase_speed: Option<f32>,
    pub aggro_radius: Option<f32>,
    pub deaggro_radius: Option<f32>,
    pub attack_damage: Option<f32>,
    pub leash_radius: Option<f32>,
    pub drops: Option<DropRange>,
    pub drop_value: Option<u32>,
}

impl ArchetypeOverride {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, base: &ArchetypeStats) -> ArchetypeStats {
        let mut stats = base.clone();
        macro_rules! layer {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = self.$field {
                        stats.$field = value;
                    }
                )*
            };
        }
        layer!(
            max_health,
            mask_health,
            contact_damage,
            patrol_speed,
            chase_speed,
            aggro_radius,
            deaggro_radius,
            attack_damage,
            leash_radius,
            drops,
            drop_value,
        );
        stats
    }
}

/// Stats for every archetype, keyed by name in the tuning file.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    pub charger: ArchetypeStats,
    pub flyer: ArchetypeStats,
    pub skirmisher: ArchetypeStats,
    pub sentinel: ArchetypeStats,
    pub lurker: ArchetypeStats,
    pub warden: ArchetypeStats,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            charger: ArchetypeStats::charger(),
            flyer: ArchetypeStats::flyer(),
            skirmisher: ArchetypeStats::skirmisher(),
            sentinel: ArchetypeStats::sentinel(),
            lurker: ArchetypeStats::lurker(),
            warden: ArchetypeStats::warden(),
        }
    }
}

impl ArchetypeTable {
    pub fn get(&self, kind: EnemyKind) -> &ArchetypeStats {
        match kind {
            EnemyKind::Charger => &self.charger,
            EnemyKind::Flyer => &self.flyer,
            EnemyKind::Skirmisher => &self.skirmisher,
            EnemyKind::Sentinel => &self.sentinel,
            EnemyKind::Lurker => &self.lurker,
            EnemyKind::Warden => &self.warden,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnemyKind, &ArchetypeStats)> {
        EnemyKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}
