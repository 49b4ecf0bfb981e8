//! Level domain: spawning the layout, hazards and portals.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::combat::{
    AiTuning, ArchetypeTable, CombatTuning, DamageContext, Damageable, Hit, HitLanded, NoLoot,
    rects_overlap, spawn_enemy,
};
use crate::core::{Action, ActionSnapshot, CombatRng, InputSnapshot, SpawnCounter, delta_ms};
use crate::level::components::{ActiveLevel, Hazard, LevelGeometry, Portal, PortalCooldown};
use crate::level::data::{LevelLayout, SurfaceKind};
use crate::level::events::PortalEntered;
use crate::movement::{GameLayer, Ground, MovementTuning, Player, PlayerController, Wall, spawn_player};

const GROUND_COLOR: Color = Color::srgb(0.35, 0.4, 0.35);
const WALL_COLOR: Color = Color::srgb(0.25, 0.25, 0.35);
const HAZARD_COLOR: Color = Color::srgb(0.8, 0.15, 0.2);
const PORTAL_COLOR: Color = Color::srgb(0.4, 0.6, 0.9);

pub(crate) fn build_level(
    mut commands: Commands,
    level: Option<Res<ActiveLevel>>,
    movement: Res<MovementTuning>,
    combat: Res<CombatTuning>,
    ai: Res<AiTuning>,
    archetypes: Res<ArchetypeTable>,
    mut counter: ResMut<SpawnCounter>,
) {
    let fallback;
    let layout = match level.as_deref() {
        Some(active) => &active.0,
        None => {
            warn!("No level loaded; building the test room");
            fallback = LevelLayout::test_room();
            &fallback
        }
    };
    info!(
        "Building level '{}': {} platforms, {} hazards, {} portals",
        layout.name,
        layout.platforms.len(),
        layout.hazards.len(),
        layout.portals.len()
    );

    spawn_geometry(&mut commands, layout);

    let (px, py) = layout.player_spawn;
    spawn_player(&mut commands, Vec2::new(px, py), &movement, &combat);

    for spawn in &layout.spawns {
        let order = counter.next();
        let stats = spawn.config.apply(archetypes.get(spawn.kind));
        if !spawn.config.is_empty() {
            debug!("{:?} spawn at ({}, {}) overrides its archetype", spawn.kind, spawn.x, spawn.y);
        }
        spawn_enemy(
            &mut commands,
            spawn.kind,
            &stats,
            &ai,
            Vec2::new(spawn.x, spawn.y),
            order,
        );
    }
}

fn spawn_geometry(commands: &mut Commands, layout: &LevelLayout) {
    let ground_layers =
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player, GameLayer::Enemy]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player, GameLayer::Enemy]);

    for platform in &layout.platforms {
        let rect = platform.rect;
        let mut entity = commands.spawn((
            LevelGeometry,
            Transform::from_xyz(rect.x, rect.y, 0.0),
            RigidBody::Static,
            Collider::rectangle(rect.w, rect.h),
        ));
        match platform.kind {
            SurfaceKind::Ground => {
                entity.insert((Ground, ground_layers, sprite(GROUND_COLOR, rect.size())));
            }
            SurfaceKind::Wall => {
                entity.insert((Wall, wall_layers, sprite(WALL_COLOR, rect.size())));
            }
        }
    }

    for hazard in &layout.hazards {
        commands.spawn((
            LevelGeometry,
            Hazard {
                rect: hazard.rect.to_rect(),
                damage: hazard.damage,
            },
            sprite(HAZARD_COLOR, hazard.rect.size()),
            Transform::from_xyz(hazard.rect.x, hazard.rect.y, 0.5),
        ));
    }

    for portal in &layout.portals {
        commands.spawn((
            LevelGeometry,
            Portal {
                rect: portal.rect.to_rect(),
                target: portal.target.clone(),
            },
            sprite(PORTAL_COLOR, portal.rect.size()),
            Transform::from_xyz(portal.rect.x, portal.rect.y, 0.5),
        ));
    }
}

fn sprite(color: Color, size: Vec2) -> Sprite {
    Sprite {
        color,
        custom_size: Some(size),
        ..default()
    }
}

/// Hazard damage carries no swing id, so only invulnerability limits it.
pub(crate) fn apply_hazards(
    mut rng: ResMut<CombatRng>,
    hazards: Query<&Hazard>,
    mut players: Query<(Entity, &mut PlayerController), With<Player>>,
    mut hits: MessageWriter<HitLanded>,
) {
    let Some((player_entity, mut controller)) = players.iter_mut().next() else {
        return;
    };

    let mut no_loot = NoLoot;
    let mut ctx = DamageContext {
        loot: &mut no_loot,
        rng: &mut rng.rng,
    };

    for hazard in &hazards {
        if !rects_overlap(hazard.rect, controller.hit_rect()) {
            continue;
        }
        let hit = Hit::untracked(hazard.damage, hazard.rect.center().x);
        if controller.take_damage(hit, &mut ctx) {
            hits.write(HitLanded {
                target: player_entity,
                swing: None,
                position: controller.position(),
            });
        }
    }
}

pub(crate) fn enter_portals(
    time: Res<Time>,
    input: Res<ActionSnapshot>,
    mut cooldown: ResMut<PortalCooldown>,
    portals: Query<&Portal>,
    players: Query<&PlayerController, With<Player>>,
    mut entered: MessageWriter<PortalEntered>,
) {
    cooldown.tick(delta_ms(&time));

    if !input.just_pressed(Action::Interact) || !cooldown.can_transition() {
        return;
    }
    let Some(controller) = players.iter().next() else {
        return;
    };
    if controller.is_dying() {
        return;
    }

    let body = controller.hit_rect();
    let Some(portal) = portals.iter().find(|p| rects_overlap(p.rect, body)) else {
        return;
    };

    info!("[PORTAL] Player entered portal to '{}'", portal.target);
    cooldown.reset();
    entered.write(PortalEntered {
        target: portal.target.clone(),
    });
}
