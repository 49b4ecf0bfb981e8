//! Movement domain: player locomotion plugin wiring and public exports.

mod bootstrap;
mod components;
mod controller;
mod resources;
mod systems;

#[cfg(test)]
mod tests;

pub use bootstrap::spawn_player;
pub use components::{
    ContactFlags, ContactProbe, Facing, GameLayer, Ground, GroundAhead, MovementState, Player,
    Wall,
};
pub use controller::{MotorOutput, PlayerController, approach};
pub use resources::MovementTuning;

use bevy::prelude::*;

use crate::core::SimSet;
use crate::movement::systems::{drive_player, probe_contacts};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .add_systems(Update, probe_contacts.in_set(SimSet::Sense))
            .add_systems(Update, drive_player.in_set(SimSet::Movement));
    }
}
