//! Level layout definitions, deserialized from `assets/data/levels/*.ron`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{ArchetypeOverride, EnemyKind};

/// Axis-aligned rectangle given by its centre and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectDef {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_center_size(self.center(), self.size())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Walkable from above.
    #[default]
    Ground,
    /// Slidable from the side.
    Wall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformDef {
    pub rect: RectDef,
    #[serde(default)]
    pub kind: SurfaceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardDef {
    pub rect: RectDef,
    pub damage: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalDef {
    pub rect: RectDef,
    /// Name of the level this portal leads to.
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDef {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    /// Stats layered over the archetype for this spawn only.
    #[serde(default)]
    pub config: ArchetypeOverride,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    pub player_spawn: (f32, f32),
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub portals: Vec<PortalDef>,
    #[serde(default)]
    pub spawns: Vec<SpawnDef>,
}

impl LevelLayout {
    /// Walled floor with two ledges, a spike strip and one of each archetype
    /// except the boss.
    pub fn test_room() -> Self {
        let ground = |x, y, w, h| PlatformDef {
            rect: RectDef::new(x, y, w, h),
            kind: SurfaceKind::Ground,
        };
        let wall = |x, y, w, h| PlatformDef {
            rect: RectDef::new(x, y, w, h),
            kind: SurfaceKind::Wall,
        };
        let spawn = |kind, x, y| SpawnDef {
            kind,
            x,
            y,
            config: ArchetypeOverride::default(),
        };

        Self {
            name: "test_room".to_string(),
            player_spawn: (-400.0, -100.0),
            platforms: vec![
                ground(0.0, -200.0, 1400.0, 40.0),
                wall(-720.0, 100.0, 40.0, 640.0),
                wall(720.0, 100.0, 40.0, 640.0),
                ground(-250.0, -40.0, 200.0, 20.0),
                ground(250.0, 60.0, 200.0, 20.0),
            ],
            hazards: vec![HazardDef {
                rect: RectDef::new(0.0, -172.0, 120.0, 16.0),
                damage: 1.0,
            }],
            portals: vec![PortalDef {
                rect: RectDef::new(640.0, -140.0, 40.0, 80.0),
                target: "warden_arena".to_string(),
            }],
            spawns: vec![
                spawn(EnemyKind::Charger, 200.0, -160.0),
                spawn(EnemyKind::Flyer, -100.0, 120.0),
                spawn(EnemyKind::Skirmisher, 450.0, -160.0),
                spawn(EnemyKind::Sentinel, 250.0, 100.0),
                spawn(EnemyKind::Lurker, -500.0, -156.0),
            ],
        }
    }
}
