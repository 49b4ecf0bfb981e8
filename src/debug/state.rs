//! Debug domain: overlay state and timer dump records.

use bevy::prelude::*;
use serde::Serialize;

use crate::core::{TimerBank, TimerKey};

/// Resource tracking debug overlay state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Whether hitbox gizmos are drawn
    pub show_hitboxes: bool,
    /// Whether the player is kept invulnerable
    pub invincible: bool,
}

/// One entity's timer bank, as written by the dump hotkey.
#[derive(Debug, Serialize)]
pub struct TimerDump {
    pub label: String,
    pub state: String,
    pub timers: Vec<(TimerKey, f32)>,
}

impl TimerDump {
    pub fn new(label: impl Into<String>, state: impl std::fmt::Debug, bank: &TimerBank) -> Self {
        Self {
            label: label.into(),
            state: format!("{:?}", state),
            timers: bank.active(),
        }
    }
}

pub fn dump_to_json(dumps: &[TimerDump]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(dumps)
}
