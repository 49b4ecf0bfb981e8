//! Debug domain: hotkeys, hitbox gizmos and timer dumps.

use bevy::prelude::*;

use crate::combat::{AttackLifecycle, Damageable, Enemy, Projectile};
use crate::combat::ai::EnemyUnit;
use crate::core::{SpawnOrder, TimerKey};
use crate::debug::state::{DebugState, TimerDump, dump_to_json};
use crate::movement::{Player, PlayerController};

const HURTBOX_COLOR: Color = Color::srgb(0.2, 0.8, 0.3);
const HITBOX_COLOR: Color = Color::srgb(1.0, 0.25, 0.2);
const STRIKE_COLOR: Color = Color::srgb(1.0, 0.6, 0.1);
const PROJECTILE_COLOR: Color = Color::srgb(1.0, 0.9, 0.2);
const INVULN_COLOR: Color = Color::srgb(0.5, 0.5, 0.9);

/// F1 or backtick toggles gizmos; Ctrl+I toggles invincibility.
pub(crate) fn handle_debug_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
) {
    if keyboard.just_pressed(KeyCode::F1) || keyboard.just_pressed(KeyCode::Backquote) {
        debug_state.show_hitboxes = !debug_state.show_hitboxes;
        info!("[DEBUG] Hitbox overlay: {}", debug_state.show_hitboxes);
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if ctrl && keyboard.just_pressed(KeyCode::KeyI) {
        debug_state.invincible = !debug_state.invincible;
        info!("[DEBUG] Invincibility: {}", debug_state.invincible);
    }
}

pub(crate) fn apply_invincibility(
    debug_state: Res<DebugState>,
    mut players: Query<&mut PlayerController, With<Player>>,
) {
    if !debug_state.invincible {
        return;
    }
    for mut controller in &mut players {
        if !controller.is_dying() {
            controller.timers_mut().arm(TimerKey::Invulnerable, 1000.0);
        }
    }
}

pub(crate) fn draw_hitboxes(
    mut gizmos: Gizmos,
    players: Query<(&PlayerController, &AttackLifecycle), With<Player>>,
    enemies: Query<&EnemyUnit, With<Enemy>>,
    projectiles: Query<&Projectile>,
) {
    let mut outline = |rect: Rect, color: Color| {
        gizmos.rect_2d(rect.center(), rect.size(), color);
    };

    for (controller, lifecycle) in &players {
        let color = if controller.is_invulnerable() {
            INVULN_COLOR
        } else {
            HURTBOX_COLOR
        };
        outline(controller.hit_rect(), color);
        if let Some(hitbox) = lifecycle.hitbox() {
            outline(hitbox, HITBOX_COLOR);
        }
    }

    for unit in &enemies {
        if unit.is_dying() {
            continue;
        }
        let color = if unit.is_invulnerable() {
            INVULN_COLOR
        } else {
            HURTBOX_COLOR
        };
        outline(unit.hit_rect(), color);
        if let Some(strike) = unit.pending_strike() {
            outline(strike.rect, STRIKE_COLOR);
        }
    }

    for projectile in &projectiles {
        outline(projectile.rect(), PROJECTILE_COLOR);
    }
}

/// F2 logs every timer bank as JSON.
pub(crate) fn dump_timer_banks(
    keyboard: Res<ButtonInput<KeyCode>>,
    players: Query<&PlayerController, With<Player>>,
    enemies: Query<(&SpawnOrder, &EnemyUnit), With<Enemy>>,
) {
    if !keyboard.just_pressed(KeyCode::F2) {
        return;
    }

    let mut dumps: Vec<TimerDump> = players
        .iter()
        .map(|c| TimerDump::new("player", c.state(), c.timers()))
        .collect();

    let mut ordered: Vec<_> = enemies.iter().collect();
    ordered.sort_by_key(|(order, _)| **order);
    dumps.extend(ordered.into_iter().map(|(order, unit)| {
        TimerDump::new(
            format!("{:?}#{}", unit.kind(), order.0),
            unit.ai_state(),
            unit.timers(),
        )
    }));

    match dump_to_json(&dumps) {
        Ok(json) => info!("[DEBUG] Timer banks:\n{}", json),
        Err(e) => warn!("[DEBUG] Failed to serialize timer banks: {}", e),
    }
}
