//! Core domain: the simulation clock multiplier and its hitstop window.

use bevy::prelude::*;

/// Outcome of asking the clock for hitstop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitstopRequest {
    /// A new window opened.
    Started,
    /// A window was already running; it was left untouched.
    AlreadyActive,
}

/// Global time-scale resource.
///
/// Only the hit resolution pipeline triggers hitstop. The window runs on real
/// (unscaled) time and is never extended by hits landing inside it, so exactly
/// one restore fires per window.
#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    hitstop_ms: f32,
    hitstop_scale: f32,
    remaining_ms: f32,
    scale: f32,
    windows_opened: u32,
    restores: u32,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(60.0, 0.05)
    }
}

impl SimClock {
    pub fn new(hitstop_ms: f32, hitstop_scale: f32) -> Self {
        Self {
            hitstop_ms,
            hitstop_scale,
            remaining_ms: 0.0,
            scale: 1.0,
            windows_opened: 0,
            restores: 0,
        }
    }

    pub(crate) fn trigger_hitstop(&mut self) -> HitstopRequest {
        if self.in_hitstop() {
            return HitstopRequest::AlreadyActive;
        }
        self.remaining_ms = self.hitstop_ms;
        self.scale = self.hitstop_scale;
        self.windows_opened += 1;
        HitstopRequest::Started
    }

    /// Advance by unscaled time. Returns true on the tick the scale is restored.
    pub fn tick_real(&mut self, real_dt_ms: f32) -> bool {
        if !self.in_hitstop() {
            return false;
        }
        self.remaining_ms -= real_dt_ms;
        if self.remaining_ms <= 0.0 {
            self.scale = 1.0;
            self.restores += 1;
            return true;
        }
        false
    }

    pub fn in_hitstop(&self) -> bool {
        self.remaining_ms > 0.0
    }

    pub fn time_scale(&self) -> f32 {
        self.scale
    }

    pub fn windows_opened(&self) -> u32 {
        self.windows_opened
    }

    pub fn restores(&self) -> u32 {
        self.restores
    }
}

pub(crate) fn drive_sim_clock(
    real: Res<Time<Real>>,
    mut clock: ResMut<SimClock>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    if clock.tick_real(real.delta_secs() * 1000.0) {
        debug!("Hitstop restored");
    }
    if (virtual_time.relative_speed() - clock.time_scale()).abs() > f32::EPSILON {
        virtual_time.set_relative_speed(clock.time_scale());
    }
}
