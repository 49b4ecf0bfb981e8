//! Level domain: layout data, static geometry, hazards and portals.

mod components;
mod data;
mod events;
mod systems;


pub use components::{ActiveLevel, Hazard, LevelGeometry, Portal, PortalCooldown};
pub use data::{HazardDef, LevelLayout, PlatformDef, PortalDef, RectDef, SpawnDef, SurfaceKind};
pub use events::PortalEntered;

use bevy::prelude::*;

use crate::core::SimSet;
use crate::level::systems::{apply_hazards, build_level, enter_portals};

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PortalCooldown>()
            .add_message::<PortalEntered>()
            .add_systems(Startup, build_level)
            .add_systems(Update, apply_hazards.in_set(SimSet::Resolve))
            .add_systems(Update, enter_portals.in_set(SimSet::Cleanup));
    }
}
