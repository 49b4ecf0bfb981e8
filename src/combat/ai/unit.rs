//! Combat domain: the shared enemy state machine.
//!
//! [`EnemyUnit`] owns everything an enemy needs to think: its archetype stats,
//! timer bank, damage state and the current AI state. The universal states
//! (hurt, dead) and the attack plumbing live here; each archetype module only
//! decides what its patrol, aggro and attack states do.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::combat::ai::{flyer, lurker, skirmisher, walker, warden};
use crate::combat::components::{EnemyKind, GateResult};
use crate::combat::damage::{
    DamageContext, DamageCore, DamageOutcome, Damageable, Hit, SwingId, SwingIds,
};
use crate::combat::loot::hand_off_loot;
use crate::combat::projectile::ProjectileSpawn;
use crate::combat::resources::{AiTuning, ArchetypeStats};
use crate::core::{TimerBank, TimerKey};
use crate::movement::{ContactFlags, Facing};

const FRAME_MS: f32 = 1000.0 / 60.0;

/// Enemy AI state. Exactly one is active; `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiState {
    #[default]
    Patrol,
    Aggro,
    Telegraph,
    Attack,
    Recover,
    Hurt,
    Dead,
    /// Flyer idling around its post.
    Hover,
    /// Flyer heading back to its post.
    Returning,
    /// Sentinel bracing behind its mask.
    DefensiveStance,
    /// Lurker hidden underground.
    Burrowed,
    /// Lurker surfacing; doubles as its telegraph.
    Emerging,
    /// Boss switching pattern tables.
    PhaseShift,
}

/// Boss attack patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossPattern {
    Slam,
    Lunge,
    Volley,
    Barrage,
}

impl BossPattern {
    pub fn is_melee(self) -> bool {
        matches!(self, BossPattern::Slam | BossPattern::Lunge)
    }
}

/// What an enemy knows about the world this tick.
///
/// Every enemy in a tick receives the same player snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Senses {
    /// `None` once the player is dead or absent.
    pub player: Option<Vec2>,
    pub contacts: ContactFlags,
    pub ground_ahead: bool,
}

/// Per-tick collaborators for AI updates.
pub struct ThinkContext<'a> {
    pub dt_ms: f32,
    pub ai: &'a AiTuning,
    pub ids: &'a mut SwingIds,
    pub rng: &'a mut ChaCha8Rng,
}

/// An enemy's open attack hitbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStrike {
    pub rect: Rect,
    pub swing: SwingId,
    pub damage: f32,
}

/// Notable things that happened to an enemy, drained by the ECS layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiEvent {
    MaskBroken,
    PhaseChanged(u8),
    Killed { drops: u32 },
}

#[derive(Component, Debug, Clone)]
pub struct EnemyUnit {
    pub(crate) kind: EnemyKind,
    pub(crate) stats: ArchetypeStats,
    pub(crate) state: AiState,
    pub(crate) timers: TimerBank,
    pub(crate) damage: DamageCore,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) home: Vec2,
    pub(crate) facing: Facing,
    pub(crate) strike: Option<EnemyStrike>,
    pub(crate) strike_landed: bool,
    pub(crate) phase: u8,
    pub(crate) pattern: Option<BossPattern>,
    pub(crate) hover_clock_ms: f32,
    pub(crate) projectiles: Vec<ProjectileSpawn>,
    pub(crate) events: Vec<AiEvent>,
}

impl EnemyUnit {
    pub fn new(kind: EnemyKind, stats: ArchetypeStats, position: Vec2) -> Self {
        let damage = DamageCore::new(stats.max_health).with_gate(stats.mask_health);
        let state = match kind {
            EnemyKind::Flyer => AiState::Hover,
            EnemyKind::Lurker => AiState::Burrowed,
            _ => AiState::Patrol,
        };
        Self {
            kind,
            stats,
            state,
            timers: TimerBank::new(),
            damage,
            position,
            velocity: Vec2::ZERO,
            home: position,
            facing: Facing::Left,
            strike: None,
            strike_landed: false,
            phase: 0,
            pattern: None,
            hover_clock_ms: 0.0,
            projectiles: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn ai_state(&self) -> AiState {
        self.state
    }

    pub fn current_hp(&self) -> f32 {
        self.damage.health.current
    }

    pub fn max_hp(&self) -> f32 {
        self.damage.health.max
    }

    pub fn mask_broken(&self) -> bool {
        self.damage.gate_broken()
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    pub fn stats(&self) -> &ArchetypeStats {
        &self.stats
    }

    /// Body contact damage, or `None` while the body cannot touch the player.
    pub fn contact_damage(&self) -> Option<f32> {
        match self.state {
            AiState::Dead | AiState::Burrowed | AiState::Emerging => None,
            _ if self.stats.contact_damage > 0.0 => Some(self.stats.contact_damage),
            _ => None,
        }
    }

    /// The strike to test against the player this tick, if it has not landed yet.
    pub fn pending_strike(&self) -> Option<EnemyStrike> {
        self.strike.filter(|_| !self.strike_landed)
    }

    pub fn mark_strike_landed(&mut self) {
        self.strike_landed = true;
    }

    /// Whether this body should follow gravity.
    pub fn uses_gravity(&self) -> bool {
        self.kind != EnemyKind::Flyer
    }

    pub fn sync_body(&mut self, position: Vec2, velocity: Vec2) {
        self.position = position;
        self.velocity = velocity;
    }

    pub fn drain_projectiles(&mut self) -> Vec<ProjectileSpawn> {
        std::mem::take(&mut self.projectiles)
    }

    pub fn drain_events(&mut self) -> Vec<AiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one tick. Returns the velocity to hand to physics.
    pub fn update(&mut self, senses: &Senses, ctx: &mut ThinkContext<'_>) -> Vec2 {
        if self.state == AiState::Dead {
            return Vec2::ZERO;
        }
        self.timers.tick(ctx.dt_ms);

        if self.state == AiState::Hurt {
            self.damp_horizontal(0.85, ctx.dt_ms);
            if !self.timers.is_active(TimerKey::Hitstun) {
                self.state = self.recovery_route(senses, ctx.ai);
                debug!("{:?} recovered into {:?}", self.kind, self.state);
            }
        } else {
            match self.kind {
                EnemyKind::Charger | EnemyKind::Sentinel => walker::think(self, senses, ctx),
                EnemyKind::Flyer => flyer::think(self, senses, ctx),
                EnemyKind::Skirmisher => skirmisher::think(self, senses, ctx),
                EnemyKind::Lurker => lurker::think(self, senses, ctx),
                EnemyKind::Warden => warden::think(self, senses, ctx),
            }
        }

        if let Some(strike) = self.strike.as_mut() {
            strike.rect = strike_rect(&self.stats, self.position, self.facing);
        }
        self.velocity
    }

    /// Where an archetype goes after hitstun: re-run the aggro check.
    fn recovery_route(&self, senses: &Senses, ai: &AiTuning) -> AiState {
        match self.kind {
            EnemyKind::Lurker => AiState::Burrowed,
            EnemyKind::Flyer if !self.still_engaged(senses, ai) => AiState::Returning,
            _ if self.still_engaged(senses, ai) => AiState::Aggro,
            EnemyKind::Warden => AiState::Aggro,
            _ => AiState::Patrol,
        }
    }

    pub(crate) fn speed_multiplier(&self) -> f32 {
        let enraged = if self.damage.gate_broken() {
            self.stats.enraged_speed_multiplier
        } else {
            1.0
        };
        enraged * self.stats.phase_speed_step.powi(i32::from(self.phase))
    }

    pub(crate) fn to_player(&self, senses: &Senses) -> Option<Vec2> {
        senses.player.map(|player| player - self.position)
    }

    /// Player inside the aggro radius and vertical band.
    pub(crate) fn detects(&self, senses: &Senses) -> bool {
        self.to_player(senses).is_some_and(|offset| {
            offset.length() <= self.stats.aggro_radius && offset.y.abs() <= self.stats.vertical_band
        })
    }

    /// Player still inside the wider deaggro radius.
    pub(crate) fn still_engaged(&self, senses: &Senses, ai: &AiTuning) -> bool {
        self.to_player(senses).is_some_and(|offset| {
            offset.length() <= self.stats.deaggro_radius(ai)
                && offset.y.abs() <= self.stats.vertical_band * ai.deaggro_multiplier
        })
    }

    pub(crate) fn face_player(&mut self, senses: &Senses) {
        let Some(offset) = self.to_player(senses) else {
            return;
        };
        if offset.x.abs() > 1.0 {
            self.facing = Facing::from_sign(offset.x);
        }
    }

    /// A wall in the facing direction.
    pub(crate) fn blocked_ahead(&self, senses: &Senses) -> bool {
        match self.facing {
            Facing::Left => senses.contacts.blocked_left,
            Facing::Right => senses.contacts.blocked_right,
        }
    }

    /// Bleed off horizontal speed at `per_frame` per 60 Hz frame.
    pub(crate) fn damp_horizontal(&mut self, per_frame: f32, dt_ms: f32) {
        self.velocity.x *= per_frame.powf(dt_ms / FRAME_MS);
    }

    /// Turn around at ledges and walls, rate-limited by the turn cooldown.
    pub(crate) fn patrol_turn(&mut self, senses: &Senses, ai: &AiTuning) {
        let blocked = self.blocked_ahead(senses) || !senses.ground_ahead;
        if blocked && !self.timers.is_active(TimerKey::TurnCooldown) {
            self.facing = self.facing.flipped();
            self.timers.arm(TimerKey::TurnCooldown, ai.turn_cooldown_ms);
        }
    }

    pub(crate) fn enter(&mut self, state: AiState) {
        if self.state != state {
            debug!("{:?}: {:?} -> {:?}", self.kind, self.state, state);
            self.state = state;
        }
    }

    pub(crate) fn begin_telegraph(&mut self, duration_ms: f32) {
        self.enter(AiState::Telegraph);
        self.timers.arm(TimerKey::Telegraph, duration_ms);
        self.velocity.x = 0.0;
    }

    /// Commit to an attack: new swing id, hitbox opened, commit timer armed.
    pub(crate) fn open_strike(&mut self, ids: &mut SwingIds, duration_ms: f32) -> SwingId {
        let swing = ids.allocate();
        self.strike = Some(EnemyStrike {
            rect: strike_rect(&self.stats, self.position, self.facing),
            swing,
            damage: self.stats.attack_damage,
        });
        self.strike_landed = false;
        self.enter(AiState::Attack);
        self.timers.arm(TimerKey::Commit, duration_ms);
        swing
    }

    /// Close any hitbox and start the recovery window and attack cooldown.
    pub(crate) fn finish_attack(&mut self, recover_ms: f32, cooldown_ms: f32) {
        self.strike = None;
        self.strike_landed = false;
        self.enter(AiState::Recover);
        self.timers.arm(TimerKey::Recover, recover_ms);
        self.timers.arm(TimerKey::AttackCooldownAi, cooldown_ms);
    }

    pub(crate) fn fire_projectile(&mut self, swing: SwingId, direction: Vec2) {
        let origin = self.position + Vec2::new(self.facing.sign() * self.stats.strike_offset, 0.0);
        self.projectiles.push(ProjectileSpawn {
            position: origin,
            velocity: direction.normalize_or_zero() * self.stats.projectile_speed,
            damage: self.stats.projectile_damage,
            swing,
            lifetime_ms: self.stats.projectile_lifetime_ms,
        });
    }

    fn interrupt(&mut self) {
        self.strike = None;
        self.strike_landed = false;
        self.pattern = None;
        self.timers.clear(TimerKey::Telegraph);
        self.timers.clear(TimerKey::Commit);
    }

    fn check_phase(&mut self) -> Option<u8> {
        let fraction = self.damage.health.percent();
        let reached = self
            .stats
            .phase_thresholds
            .iter()
            .filter(|threshold| fraction < **threshold)
            .count();
        let reached = u8::try_from(reached).unwrap_or(u8::MAX);
        if reached <= self.phase {
            return None;
        }
        self.phase = reached;
        Some(reached)
    }
}

/// Strike hitbox in front of the body.
pub fn strike_rect(stats: &ArchetypeStats, position: Vec2, facing: Facing) -> Rect {
    let center = position + Vec2::new(facing.sign() * stats.strike_offset, 0.0);
    Rect::from_center_size(center, Vec2::new(stats.strike_width, stats.strike_height))
}

impl Damageable for EnemyUnit {
    fn hit_rect(&self) -> Rect {
        Rect::from_center_size(self.position, self.stats.size())
    }

    fn is_dying(&self) -> bool {
        self.damage.is_dying()
    }

    fn is_invulnerable(&self) -> bool {
        self.timers.is_active(TimerKey::Invulnerable)
            || matches!(
                self.state,
                AiState::Burrowed | AiState::Emerging | AiState::PhaseShift
            )
    }

    fn last_hit_by(&self) -> Option<SwingId> {
        self.damage.last_swing()
    }

    fn record_swing(&mut self, swing: SwingId) {
        self.damage.record_swing(swing);
    }

    fn take_damage(&mut self, hit: Hit, ctx: &mut DamageContext<'_>) -> bool {
        if self.is_invulnerable() {
            return false;
        }

        let mut profile = self.stats.defense();
        if self.state == AiState::DefensiveStance {
            profile.damage_scale = self.stats.stance_damage_scale;
        }
        if self.damage.gate.is_some() && !self.damage.gate_broken() {
            profile.knockback_scale = self.stats.armored_knockback_scale;
        }

        let outcome = self
            .damage
            .apply(&mut self.timers, hit, self.position.x, &profile);
        let DamageOutcome::Applied(applied) = outcome else {
            return false;
        };

        if applied.gate == Some(GateResult::Broke) {
            info!("{:?} mask broken", self.kind);
            self.events.push(AiEvent::MaskBroken);
        }

        if applied.killed {
            self.interrupt();
            self.state = AiState::Dead;
            self.velocity = Vec2::ZERO;
            let drops = hand_off_loot(
                ctx.loot,
                ctx.rng,
                self.position,
                self.stats.drops,
                self.stats.drop_value,
            );
            info!("{:?} killed, {} drops", self.kind, drops);
            self.events.push(AiEvent::Killed { drops });
            return true;
        }

        if let Some(phase) = self.check_phase() {
            self.interrupt();
            self.enter(AiState::PhaseShift);
            self.timers.arm(TimerKey::PhaseShift, self.stats.phase_shift_ms);
            self.velocity = Vec2::ZERO;
            info!("{:?} entered phase {}", self.kind, phase);
            self.events.push(AiEvent::PhaseChanged(phase));
            return true;
        }

        if self.state != AiState::DefensiveStance {
            self.interrupt();
            self.enter(AiState::Hurt);
            self.velocity.x = applied.knockback.x;
            if applied.knockback.y != 0.0 || !self.uses_gravity() {
                self.velocity.y = applied.knockback.y;
            }
        }
        debug!(
            "{:?} hit: dealt={}, hp={}",
            self.kind, applied.dealt, self.damage.health.current
        );
        true
    }
}
