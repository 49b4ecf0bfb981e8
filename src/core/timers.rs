//! Core domain: per-entity countdown timers.
//!
//! Every timed mechanic (coyote time, hitstun, telegraphs, cooldowns) lives in
//! one [`TimerBank`] per entity instead of loose fields, so pause, inspection and
//! snapshotting work the same way for the player and every enemy archetype.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Names of the timers any entity may arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerKey {
    // Player movement
    Coyote,
    JumpBuffer,
    DashBuffer,
    Dash,
    DashCooldown,
    WallJumpLock,
    WallStick,
    // Player attack
    AttackWindup,
    AttackActive,
    AttackRecovery,
    AttackCooldown,
    // Shared defense
    Invulnerable,
    Hitstun,
    // Enemy AI
    Telegraph,
    Commit,
    Recover,
    TurnCooldown,
    AttackCooldownAi,
    Stance,
    PhaseShift,
    Burrow,
    Strike,
}

/// Remaining milliseconds per timer.
///
/// Values are decremented only while positive, so an expired timer settles at a
/// small non-positive remainder. Only `remaining > 0` is meaningful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerBank {
    timers: HashMap<TimerKey, f32>,
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)arm `key` for `duration_ms`, replacing whatever was left.
    pub fn arm(&mut self, key: TimerKey, duration_ms: f32) {
        self.timers.insert(key, duration_ms);
    }

    /// Force `key` to read as inactive.
    pub fn clear(&mut self, key: TimerKey) {
        self.timers.insert(key, 0.0);
    }

    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, key: TimerKey) -> bool {
        self.remaining(key) > 0.0
    }

    /// Raw remaining time; may be negative after expiry.
    pub fn remaining(&self, key: TimerKey) -> f32 {
        self.timers.get(&key).copied().unwrap_or(0.0)
    }

    /// Advance every active timer by `dt_ms`.
    pub fn tick(&mut self, dt_ms: f32) {
        for remaining in self.timers.values_mut() {
            if *remaining > 0.0 {
                *remaining -= dt_ms;
            }
        }
    }

    /// Active timers sorted by key, for overlays and logs.
    pub fn active(&self) -> Vec<(TimerKey, f32)> {
        let mut active: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, remaining)| **remaining > 0.0)
            .map(|(key, remaining)| (*key, *remaining))
            .collect();
        active.sort_by_key(|(key, _)| *key);
        active
    }
}
