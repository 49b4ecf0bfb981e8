//! Core domain: abstract per-tick input snapshot.

use bevy::prelude::*;

/// The fixed action set the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Dash,
    Attack,
    Interact,
    Down,
    Focus,
    Pause,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Dash,
        Action::Attack,
        Action::Interact,
        Action::Down,
        Action::Focus,
        Action::Pause,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// What the simulation may ask of an input source, once per tick.
pub trait InputSnapshot {
    fn is_down(&self, action: Action) -> bool;
    fn just_pressed(&self, action: Action) -> bool;
    fn just_released(&self, action: Action) -> bool;

    /// -1, 0 or 1. Opposing directions cancel.
    fn horizontal_axis(&self) -> i8 {
        let left = self.is_down(Action::Left);
        let right = self.is_down(Action::Right);
        match (left, right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Bitset snapshot of the action set for one tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSnapshot {
    down: u16,
    pressed: u16,
    released: u16,
}

impl ActionSnapshot {
    /// Mark `action` as held.
    pub fn hold(mut self, action: Action) -> Self {
        self.down |= action.bit();
        self
    }

    /// Mark `action` as pressed this tick (implies held).
    pub fn press(mut self, action: Action) -> Self {
        self.down |= action.bit();
        self.pressed |= action.bit();
        self
    }

    /// Mark `action` as released this tick (implies not held).
    pub fn release(mut self, action: Action) -> Self {
        self.down &= !action.bit();
        self.released |= action.bit();
        self
    }

    pub fn set(&mut self, action: Action, down: bool, pressed: bool, released: bool) {
        let bit = action.bit();
        self.down = if down { self.down | bit } else { self.down & !bit };
        self.pressed = if pressed {
            self.pressed | bit
        } else {
            self.pressed & !bit
        };
        self.released = if released {
            self.released | bit
        } else {
            self.released & !bit
        };
    }
}

impl InputSnapshot for ActionSnapshot {
    fn is_down(&self, action: Action) -> bool {
        self.down & action.bit() != 0
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.pressed & action.bit() != 0
    }

    fn just_released(&self, action: Action) -> bool {
        self.released & action.bit() != 0
    }
}

fn bindings(action: Action) -> &'static [KeyCode] {
    match action {
        Action::Left => &[KeyCode::KeyA, KeyCode::ArrowLeft],
        Action::Right => &[KeyCode::KeyD, KeyCode::ArrowRight],
        Action::Jump => &[KeyCode::Space, KeyCode::KeyK],
        Action::Dash => &[KeyCode::ShiftLeft, KeyCode::KeyL],
        Action::Attack => &[KeyCode::KeyJ, KeyCode::KeyZ],
        Action::Interact => &[KeyCode::KeyW, KeyCode::ArrowUp],
        Action::Down => &[KeyCode::KeyS, KeyCode::ArrowDown],
        Action::Focus => &[KeyCode::KeyF],
        Action::Pause => &[KeyCode::Escape],
    }
}

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut snapshot: ResMut<ActionSnapshot>) {
    for action in Action::ALL {
        let keys = bindings(action);
        snapshot.set(
            action,
            keyboard.any_pressed(keys.iter().copied()),
            keyboard.any_just_pressed(keys.iter().copied()),
            keyboard.any_just_released(keys.iter().copied()),
        );
    }
}
