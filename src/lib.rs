//! Motion and combat core for a 2D action-platformer.

pub mod combat;
pub mod content;
pub mod core;
#[cfg(feature = "dev-tools")]
pub mod debug;
pub mod level;
pub mod movement;

use bevy::prelude::*;

/// Every gameplay plugin, in dependency order. Physics and windowing are left
/// to the host app.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            core::CorePlugin,
            content::ContentPlugin,
            movement::MovementPlugin,
            combat::CombatPlugin,
            level::LevelPlugin,
        ));

        #[cfg(feature = "dev-tools")]
        app.add_plugins(debug::DebugPlugin);
    }
}
