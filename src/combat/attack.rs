//! Combat domain: the player's swing sequencer.

use bevy::prelude::*;

use crate::combat::damage::{SwingId, SwingIds};
use crate::combat::resources::AttackTuning;
use crate::core::{TimerBank, TimerKey};
use crate::movement::Facing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackPhase {
    #[default]
    Ready,
    Windup,
    Active,
    Recovery,
}

/// An open hitbox for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenHitbox {
    pub rect: Rect,
    pub swing: SwingId,
}

/// One swing at a time: windup, active (hitbox open), recovery. A separate
/// cooldown gates the next swing and may outlast recovery.
///
/// Timing lives in the owner's [`TimerBank`] so the player's motor and its
/// attack share one bank.
#[derive(Component, Debug, Clone, Default)]
pub struct AttackLifecycle {
    phase: AttackPhase,
    swing: Option<SwingId>,
    facing: Facing,
    hitbox: Option<Rect>,
    pending: Option<OpenHitbox>,
}

impl AttackLifecycle {
    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn swing(&self) -> Option<SwingId> {
        self.swing
    }

    pub fn hitbox(&self) -> Option<Rect> {
        self.hitbox
    }

    pub fn can_attack(&self, timers: &TimerBank) -> bool {
        self.phase == AttackPhase::Ready && !timers.is_active(TimerKey::AttackCooldown)
    }

    /// Begin a swing. Returns the new swing id, or `None` if one is still
    /// running or cooling down.
    pub fn start_attack(
        &mut self,
        timers: &mut TimerBank,
        ids: &mut SwingIds,
        tuning: &AttackTuning,
        position: Vec2,
        facing: Facing,
    ) -> Option<SwingId> {
        if !self.can_attack(timers) {
            return None;
        }
        let swing = ids.allocate();
        self.swing = Some(swing);
        self.facing = facing;
        timers.arm(TimerKey::AttackCooldown, tuning.cooldown_ms);

        if tuning.windup_ms > 0.0 {
            self.phase = AttackPhase::Windup;
            timers.arm(TimerKey::AttackWindup, tuning.windup_ms);
        } else {
            self.open(timers, tuning, position);
        }
        debug!("Swing {:?} started facing {:?}", swing, facing);
        Some(swing)
    }

    /// Advance phases after the owner's timers have ticked and return the
    /// hitbox to submit this tick, re-anchored to `position`. The same hitbox
    /// is held as pending until [`Self::take_pending`] collects it.
    pub fn update(
        &mut self,
        timers: &mut TimerBank,
        tuning: &AttackTuning,
        position: Vec2,
    ) -> Option<OpenHitbox> {
        match self.phase {
            AttackPhase::Ready => {}
            AttackPhase::Windup => {
                if !timers.is_active(TimerKey::AttackWindup) {
                    self.open(timers, tuning, position);
                }
            }
            AttackPhase::Active => {
                if !timers.is_active(TimerKey::AttackActive) {
                    self.hitbox = None;
                    self.phase = AttackPhase::Recovery;
                    timers.arm(TimerKey::AttackRecovery, tuning.recovery_ms);
                }
            }
            AttackPhase::Recovery => {
                if !timers.is_active(TimerKey::AttackRecovery) {
                    self.phase = AttackPhase::Ready;
                }
            }
        }

        self.pending = None;
        if self.phase != AttackPhase::Active {
            return None;
        }
        let rect = hitbox_rect(tuning, position, self.facing);
        self.hitbox = Some(rect);
        self.pending = self.swing.map(|swing| OpenHitbox { rect, swing });
        self.pending
    }

    /// The hitbox produced by the last [`Self::update`], at most once.
    pub fn take_pending(&mut self) -> Option<OpenHitbox> {
        self.pending.take()
    }

    /// Drop any swing in progress without releasing the cooldown.
    pub fn cancel(&mut self, timers: &mut TimerBank) {
        self.phase = AttackPhase::Ready;
        self.hitbox = None;
        self.pending = None;
        timers.clear(TimerKey::AttackWindup);
        timers.clear(TimerKey::AttackActive);
        timers.clear(TimerKey::AttackRecovery);
    }

    fn open(&mut self, timers: &mut TimerBank, tuning: &AttackTuning, position: Vec2) {
        self.phase = AttackPhase::Active;
        timers.arm(TimerKey::AttackActive, tuning.active_ms);
        self.hitbox = Some(hitbox_rect(tuning, position, self.facing));
    }
}

/// Hitbox at a fixed offset in the facing direction.
pub fn hitbox_rect(tuning: &AttackTuning, position: Vec2, facing: Facing) -> Rect {
    let center = position + Vec2::new(facing.sign() * tuning.hitbox_offset, tuning.hitbox_offset_y);
    Rect::from_center_size(center, Vec2::new(tuning.hitbox_width, tuning.hitbox_height))
}
