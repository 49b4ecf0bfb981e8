//! Movement domain: the player motor state machine.
//!
//! [`PlayerController`] is plain data driven once per tick by an input
//! snapshot and the contact flags reported by physics. It never touches the
//! ECS directly; the movement systems feed it and copy its velocity back.

use bevy::prelude::*;

use crate::combat::{
    DamageContext, DamageCore, DamageOutcome, Damageable, DefenseProfile, Hit, SwingId,
};
use crate::core::{Action, InputSnapshot, TimerBank, TimerKey};
use crate::movement::{ContactFlags, Facing, MovementState, MovementTuning};

/// Velocity and state the motor wants physics to apply this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorOutput {
    pub velocity: Vec2,
    pub state: MovementState,
}

#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    state: MovementState,
    facing: Facing,
    position: Vec2,
    velocity: Vec2,
    body_size: Vec2,
    contacts: ContactFlags,
    timers: TimerBank,
    damage: DamageCore,
    defense: DefenseProfile,
    air_dashes_used: u8,
    /// Set on landing while jump is still held, so key repeat cannot re-jump.
    awaiting_jump_release: bool,
    jump_cut_available: bool,
    dash_direction: f32,
    defeat_pending: bool,
}

impl PlayerController {
    pub fn new(
        position: Vec2,
        max_health: f32,
        tuning: &MovementTuning,
        defense: DefenseProfile,
    ) -> Self {
        Self {
            state: MovementState::Grounded,
            facing: Facing::Right,
            position,
            velocity: Vec2::ZERO,
            body_size: tuning.body_size(),
            contacts: ContactFlags::default(),
            timers: TimerBank::new(),
            damage: DamageCore::new(max_health),
            defense,
            air_dashes_used: 0,
            awaiting_jump_release: false,
            jump_cut_available: false,
            dash_direction: 1.0,
            defeat_pending: false,
        }
    }

    pub fn state(&self) -> MovementState {
        self.state
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

    /// Ground contact as of the last update.
    pub fn is_on_ground(&self) -> bool {
        self.contacts.blocked_down
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    /// The attack lifecycle shares this bank.
    pub fn timers_mut(&mut self) -> &mut TimerBank {
        &mut self.timers
    }

    pub fn health(&self) -> (f32, f32) {
        (self.damage.health.current, self.damage.health.max)
    }

    pub fn air_dashes_used(&self) -> u8 {
        self.air_dashes_used
    }

    pub fn is_awaiting_jump_release(&self) -> bool {
        self.awaiting_jump_release
    }

    /// Pull position and velocity from the physics body before updating.
    pub fn sync_body(&mut self, position: Vec2, velocity: Vec2) {
        self.position = position;
        self.velocity = velocity;
    }

    /// Lock the motor for `duration_ms`, ignoring input until it runs out.
    ///
    /// Nothing in the simulation calls this on its own; it exists for
    /// collaborators that want a knockback lock.
    pub fn lock_movement(&mut self, duration_ms: f32) {
        if duration_ms <= 0.0 || self.damage.is_dying() {
            return;
        }
        self.timers.arm(TimerKey::Hitstun, duration_ms);
        self.timers.clear(TimerKey::Dash);
        self.state = MovementState::Hitstun;
    }

    /// True exactly once after health reaches zero.
    pub fn take_defeat_signal(&mut self) -> bool {
        std::mem::take(&mut self.defeat_pending)
    }

    pub fn update(
        &mut self,
        input: &impl InputSnapshot,
        contacts: ContactFlags,
        dt_ms: f32,
        tuning: &MovementTuning,
    ) -> MotorOutput {
        let dt = dt_ms / 1000.0;
        self.timers.tick(dt_ms);

        let was_on_ground = self.contacts.blocked_down;
        self.contacts = contacts;
        let on_ground = contacts.blocked_down;
        let axis = f32::from(input.horizontal_axis());

        self.update_ground_state(input, was_on_ground, on_ground, tuning);

        if !input.is_down(Action::Jump) {
            self.awaiting_jump_release = false;
        }
        if input.just_pressed(Action::Jump) && !self.awaiting_jump_release {
            self.timers.arm(TimerKey::JumpBuffer, tuning.jump_buffer_ms);
        }
        if input.just_pressed(Action::Dash) {
            self.timers.arm(TimerKey::DashBuffer, tuning.dash_buffer_ms);
        }

        match self.state {
            MovementState::Hitstun => {
                if self.timers.is_active(TimerKey::Hitstun) {
                    self.apply_gravity(on_ground, dt, tuning, 1.0);
                    return self.output();
                }
                self.state = self.settled_state(on_ground);
            }
            MovementState::Dash => {
                if self.timers.is_active(TimerKey::Dash) {
                    self.velocity.x = self.dash_direction * tuning.dash_speed;
                    self.apply_gravity(on_ground, dt, tuning, tuning.dash_gravity_factor);
                    return self.output();
                }
                self.state = self.settled_state(on_ground);
                if self.state == MovementState::Grounded {
                    self.air_dashes_used = 0;
                }
                debug!("Dash ended: state={:?}", self.state);
            }
            _ => {}
        }

        if self.timers.is_active(TimerKey::DashBuffer) && self.try_start_dash(axis, tuning) {
            self.apply_gravity(on_ground, dt, tuning, tuning.dash_gravity_factor);
            return self.output();
        }

        if self.timers.is_active(TimerKey::JumpBuffer) {
            self.try_jump(on_ground, tuning);
        }

        if self.jump_cut_available {
            if self.velocity.y <= 0.0 {
                self.jump_cut_available = false;
            } else if !input.is_down(Action::Jump) {
                self.velocity.y *= tuning.jump_cut_multiplier;
                self.jump_cut_available = false;
            }
        }

        if !self.timers.is_active(TimerKey::WallJumpLock) {
            let target = axis * tuning.max_speed;
            let rate = match (on_ground, axis != 0.0) {
                (true, true) => tuning.ground_accel,
                (true, false) => tuning.ground_decel,
                (false, true) => tuning.air_accel(),
                (false, false) => tuning.air_decel(),
            };
            self.velocity.x = approach(self.velocity.x, target, rate * dt);
            if axis != 0.0 {
                self.facing = Facing::from_sign(axis);
            }
        }

        self.update_wall_slide(axis, on_ground, tuning);
        self.apply_gravity(on_ground, dt, tuning, 1.0);
        if self.state == MovementState::WallSlide {
            self.velocity.y = self.velocity.y.max(-tuning.wall_slide_speed);
        }

        self.output()
    }

    fn output(&self) -> MotorOutput {
        MotorOutput {
            velocity: self.velocity,
            state: self.state,
        }
    }

    fn settled_state(&self, on_ground: bool) -> MovementState {
        if on_ground {
            MovementState::Grounded
        } else {
            MovementState::Airborne
        }
    }

    fn update_ground_state(
        &mut self,
        input: &impl InputSnapshot,
        was_on_ground: bool,
        on_ground: bool,
        tuning: &MovementTuning,
    ) {
        match self.state {
            MovementState::Grounded => {
                if on_ground {
                    return;
                }
                if was_on_ground {
                    self.timers.arm(TimerKey::Coyote, tuning.coyote_ms);
                } else if !self.timers.is_active(TimerKey::Coyote) {
                    self.state = MovementState::Airborne;
                }
            }
            MovementState::Airborne | MovementState::WallSlide => {
                if on_ground && self.velocity.y <= 0.0 {
                    self.land(input);
                }
            }
            MovementState::Dash | MovementState::Hitstun => {}
        }
    }

    fn land(&mut self, input: &impl InputSnapshot) {
        self.state = MovementState::Grounded;
        self.air_dashes_used = 0;
        self.jump_cut_available = false;
        self.timers.clear(TimerKey::Coyote);
        self.timers.clear(TimerKey::WallStick);
        self.awaiting_jump_release = input.is_down(Action::Jump)
            && !input.just_pressed(Action::Jump)
            && !self.timers.is_active(TimerKey::JumpBuffer);
        debug!(
            "Landed: awaiting_jump_release={}",
            self.awaiting_jump_release
        );
    }

    fn try_start_dash(&mut self, axis: f32, tuning: &MovementTuning) -> bool {
        if self.timers.is_active(TimerKey::DashCooldown) {
            return false;
        }
        if !self.contacts.blocked_down {
            if tuning.air_dash_limit != 0 && self.air_dashes_used >= tuning.air_dash_limit {
                return false;
            }
            self.air_dashes_used += 1;
        }

        self.dash_direction = if axis != 0.0 { axis } else { self.facing.sign() };
        self.facing = Facing::from_sign(self.dash_direction);
        self.state = MovementState::Dash;
        self.timers.clear(TimerKey::DashBuffer);
        self.timers.clear(TimerKey::Coyote);
        self.timers.clear(TimerKey::WallStick);
        self.timers.arm(TimerKey::Dash, tuning.dash_ms);
        self.timers.arm(TimerKey::DashCooldown, tuning.dash_cooldown_ms);
        if tuning.dash_invulnerable && self.timers.remaining(TimerKey::Invulnerable) < tuning.dash_ms {
            self.timers.arm(TimerKey::Invulnerable, tuning.dash_ms);
        }
        self.jump_cut_available = false;
        self.velocity = Vec2::new(self.dash_direction * tuning.dash_speed, 0.0);
        debug!(
            "Dash: direction={}, air_dashes_used={}",
            self.dash_direction, self.air_dashes_used
        );
        true
    }

    fn try_jump(&mut self, on_ground: bool, tuning: &MovementTuning) {
        let can_ground_jump = self.state != MovementState::WallSlide
            && (on_ground || self.timers.is_active(TimerKey::Coyote));

        if can_ground_jump {
            self.velocity.y = tuning.jump_velocity;
            self.timers.clear(TimerKey::JumpBuffer);
            self.timers.clear(TimerKey::Coyote);
            self.state = MovementState::Airborne;
            self.jump_cut_available = true;
            debug!("Ground jump: on_ground={}", on_ground);
        } else if self.state == MovementState::WallSlide {
            let mut wall_side = self.contacts.wall_side();
            if wall_side == 0.0 {
                wall_side = self.facing.sign();
            }
            let away = -wall_side;
            self.velocity = Vec2::new(away * tuning.wall_jump_horizontal, tuning.wall_jump_vertical);
            self.facing = Facing::from_sign(away);
            self.timers.clear(TimerKey::JumpBuffer);
            self.timers.clear(TimerKey::WallStick);
            self.timers.arm(TimerKey::WallJumpLock, tuning.wall_jump_lock_ms);
            self.state = MovementState::Airborne;
            self.jump_cut_available = true;
            debug!("Wall jump: away={}", away);
        }
    }

    fn update_wall_slide(&mut self, axis: f32, on_ground: bool, tuning: &MovementTuning) {
        let wall_side = self.contacts.wall_side();
        let toward_wall = wall_side != 0.0 && axis == wall_side;

        match self.state {
            MovementState::Airborne => {
                let eligible = !on_ground
                    && self.contacts.touching_wall()
                    && !self.timers.is_active(TimerKey::WallJumpLock)
                    && self.velocity.y < 0.0
                    && (toward_wall || self.timers.is_active(TimerKey::WallStick));
                if eligible {
                    self.state = MovementState::WallSlide;
                    if toward_wall {
                        self.timers.arm(TimerKey::WallStick, tuning.wall_stick_ms);
                    }
                    debug!("Wall slide: side={}", wall_side);
                }
            }
            MovementState::WallSlide => {
                if on_ground || !self.contacts.touching_wall() {
                    self.state = self.settled_state(on_ground);
                    self.timers.clear(TimerKey::WallStick);
                } else if toward_wall {
                    self.timers.arm(TimerKey::WallStick, tuning.wall_stick_ms);
                } else if !self.timers.is_active(TimerKey::WallStick) {
                    self.state = MovementState::Airborne;
                }
            }
            _ => {}
        }
    }

    fn apply_gravity(&mut self, on_ground: bool, dt: f32, tuning: &MovementTuning, factor: f32) {
        if on_ground && self.velocity.y <= 0.0 {
            self.velocity.y = 0.0;
            return;
        }
        self.velocity.y -= tuning.gravity * factor * dt;
        self.velocity.y = self.velocity.y.max(-tuning.max_fall_speed);
    }
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    current + diff.signum() * diff.abs().min(max_delta)
}

impl Damageable for PlayerController {
    fn hit_rect(&self) -> Rect {
        Rect::from_center_size(self.position, self.body_size)
    }

    fn is_dying(&self) -> bool {
        self.damage.is_dying()
    }

    fn is_invulnerable(&self) -> bool {
        self.timers.is_active(TimerKey::Invulnerable)
    }

    fn last_hit_by(&self) -> Option<SwingId> {
        self.damage.last_swing()
    }

    fn record_swing(&mut self, swing: SwingId) {
        self.damage.record_swing(swing);
    }

    fn take_damage(&mut self, hit: Hit, _ctx: &mut DamageContext<'_>) -> bool {
        let outcome = self
            .damage
            .apply(&mut self.timers, hit, self.position.x, &self.defense);
        let DamageOutcome::Applied(applied) = outcome else {
            return false;
        };
        self.velocity = applied.knockback;
        self.jump_cut_available = false;
        if applied.killed {
            self.defeat_pending = true;
            info!("Player defeated");
        } else {
            debug!(
                "Player hit: dealt={}, hp={}",
                applied.dealt, self.damage.health.current
            );
        }
        true
    }
}
