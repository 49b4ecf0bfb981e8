//! Combat domain: the damage contract every damageable entity implements.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::combat::components::{DamageGate, GateResult, Health};
use crate::combat::loot::LootSink;
use crate::core::{TimerBank, TimerKey};

/// Tags one attack activation. Strictly increasing per allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwingId(pub u64);

/// The global swing id allocator.
#[derive(Resource, Debug, Default)]
pub struct SwingIds {
    last: u64,
}

impl SwingIds {
    pub fn allocate(&mut self) -> SwingId {
        self.last += 1;
        SwingId(self.last)
    }

    /// Most recently allocated id, if any.
    pub fn last(&self) -> Option<SwingId> {
        (self.last > 0).then_some(SwingId(self.last))
    }
}

/// One incoming hit. `swing` is `None` for sources without per-swing dedup
/// (body contact, hazards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub amount: f32,
    pub source_x: f32,
    pub swing: Option<SwingId>,
}

impl Hit {
    pub fn swing(amount: f32, source_x: f32, swing: SwingId) -> Self {
        Self {
            amount,
            source_x,
            swing: Some(swing),
        }
    }

    pub fn untracked(amount: f32, source_x: f32) -> Self {
        Self {
            amount,
            source_x,
            swing: None,
        }
    }
}

/// Collaborators a defender may need while taking damage.
pub struct DamageContext<'a> {
    pub loot: &'a mut dyn LootSink,
    pub rng: &'a mut ChaCha8Rng,
}

/// Shared interface of everything a hitbox can damage.
pub trait Damageable {
    fn hit_rect(&self) -> Rect;
    fn is_dying(&self) -> bool;
    fn is_invulnerable(&self) -> bool;
    fn last_hit_by(&self) -> Option<SwingId>;
    fn record_swing(&mut self, swing: SwingId);
    /// Returns true only if damage was actually applied.
    fn take_damage(&mut self, hit: Hit, ctx: &mut DamageContext<'_>) -> bool;
}

/// How an entity reacts to an applied hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenseProfile {
    pub hitstun_ms: f32,
    /// Below 1 for entities that are hard to stagger.
    pub hitstun_multiplier: f32,
    pub invuln_ms: f32,
    pub knockback_x: f32,
    pub knockback_y: f32,
    pub knockback_scale: f32,
    pub damage_scale: f32,
}

impl Default for DefenseProfile {
    fn default() -> Self {
        Self {
            hitstun_ms: 200.0,
            hitstun_multiplier: 1.0,
            invuln_ms: 150.0,
            knockback_x: 250.0,
            knockback_y: 0.0,
            knockback_scale: 1.0,
            damage_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedHit {
    pub dealt: f32,
    pub gate: Option<GateResult>,
    pub killed: bool,
    pub knockback: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    Rejected,
    Applied(AppliedHit),
}

/// Away from the source; a source exactly level with the entity pushes right.
pub fn knockback_direction(entity_x: f32, source_x: f32) -> f32 {
    if entity_x >= source_x { 1.0 } else { -1.0 }
}

/// Health, optional armor gate, swing dedup and the dying guard, composed into
/// every damageable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageCore {
    pub health: Health,
    pub gate: Option<DamageGate>,
    last_swing: Option<SwingId>,
    dying: bool,
}

impl DamageCore {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: Health::new(max_health),
            gate: None,
            last_swing: None,
            dying: false,
        }
    }

    pub fn with_gate(mut self, gate_hp: f32) -> Self {
        if gate_hp > 0.0 {
            self.gate = Some(DamageGate::new(gate_hp));
        }
        self
    }

    pub fn is_dying(&self) -> bool {
        self.dying
    }

    pub fn gate_broken(&self) -> bool {
        self.gate.as_ref().is_some_and(DamageGate::is_broken)
    }

    pub fn last_swing(&self) -> Option<SwingId> {
        self.last_swing
    }

    pub fn record_swing(&mut self, swing: SwingId) {
        self.last_swing = Some(swing);
    }

    /// Flip the dying guard. Returns true only the first time.
    pub fn mark_dying(&mut self) -> bool {
        if self.dying {
            return false;
        }
        self.dying = true;
        true
    }

    pub fn accepts(&self, timers: &TimerBank, swing: Option<SwingId>) -> bool {
        if self.dying || timers.is_active(TimerKey::Invulnerable) {
            return false;
        }
        !matches!((swing, self.last_swing), (Some(incoming), Some(last)) if incoming == last)
    }

    /// Apply `hit` to an entity standing at `entity_x`.
    ///
    /// Arms hitstun and invulnerability, computes knockback and, when health
    /// runs out, flips the dying guard and clears every timer.
    pub fn apply(
        &mut self,
        timers: &mut TimerBank,
        hit: Hit,
        entity_x: f32,
        profile: &DefenseProfile,
    ) -> DamageOutcome {
        if !self.accepts(timers, hit.swing) {
            return DamageOutcome::Rejected;
        }
        if let Some(swing) = hit.swing {
            self.last_swing = Some(swing);
        }

        let amount = hit.amount * profile.damage_scale;
        let gate = self.gate.as_mut().map(|gate| gate.absorb(amount));
        let dealt = match gate {
            Some(GateResult::Absorbed | GateResult::Broke) => 0.0,
            Some(GateResult::PassThrough) | None => self.health.take_damage(amount),
        };

        timers.arm(
            TimerKey::Hitstun,
            profile.hitstun_ms * profile.hitstun_multiplier,
        );
        timers.arm(TimerKey::Invulnerable, profile.invuln_ms);

        let direction = knockback_direction(entity_x, hit.source_x);
        let knockback = Vec2::new(
            direction * profile.knockback_x * profile.knockback_scale,
            profile.knockback_y * profile.knockback_scale,
        );

        let killed = self.health.is_dead() && self.mark_dying();
        if killed {
            timers.clear_all();
        }

        DamageOutcome::Applied(AppliedHit {
            dealt,
            gate,
            killed,
            knockback,
        })
    }
}
