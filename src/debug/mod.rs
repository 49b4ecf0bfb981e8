//! Debug overlay for tuning and testing, built with the `dev-tools` feature.
//!
//! Features:
//! - Hitbox, hurtbox, strike and projectile gizmos (F1)
//! - JSON dump of every timer bank (F2)
//! - Player invincibility toggle (Ctrl+I)

mod state;
mod systems;


pub use state::{DebugState, TimerDump, dump_to_json};

use bevy::prelude::*;

use crate::core::SimSet;
use crate::debug::systems::{
    apply_invincibility, draw_hitboxes, dump_timer_banks, handle_debug_hotkeys,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(
                Update,
                (handle_debug_hotkeys, dump_timer_banks, apply_invincibility)
                    .chain()
                    .in_set(SimSet::Input),
            )
            .add_systems(
                Update,
                draw_hitboxes
                    .after(SimSet::Cleanup)
                    .run_if(|state: Res<DebugState>| state.show_hitboxes),
            );
    }
}
