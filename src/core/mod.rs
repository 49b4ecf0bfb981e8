//! Core domain: timers, input, the simulation clock and tick ordering.

mod clock;
mod input;
mod resources;
mod timers;

pub use clock::{HitstopRequest, SimClock};
pub use input::{Action, ActionSnapshot, InputSnapshot};
pub use resources::{CombatRng, SpawnCounter, SpawnOrder};
pub use timers::{TimerBank, TimerKey};

use bevy::prelude::*;

use crate::core::clock::drive_sim_clock;
use crate::core::input::read_input;

/// Fixed per-tick ordering: player movement, player attack, enemy AI in spawn
/// order, hit resolution, then write-back and cleanup.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Input,
    Sense,
    Movement,
    Attack,
    Ai,
    Resolve,
    Writeback,
    Cleanup,
}

/// Milliseconds of scaled simulation time elapsed this frame.
pub fn delta_ms(time: &Time) -> f32 {
    time.delta_secs() * 1000.0
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionSnapshot>()
            .init_resource::<SimClock>()
            .init_resource::<CombatRng>()
            .init_resource::<SpawnCounter>()
            .configure_sets(
                Update,
                (
                    SimSet::Input,
                    SimSet::Sense,
                    SimSet::Movement,
                    SimSet::Attack,
                    SimSet::Ai,
                    SimSet::Resolve,
                    SimSet::Writeback,
                    SimSet::Cleanup,
                )
                    .chain(),
            )
            .add_systems(First, drive_sim_clock)
            .add_systems(Update, read_input.in_set(SimSet::Input));
    }
}
