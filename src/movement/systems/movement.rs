//! Movement domain: drives the player motor from the input snapshot.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::Damageable;
use crate::core::{ActionSnapshot, delta_ms};
use crate::movement::{ContactFlags, MovementTuning, Player, PlayerController};

pub(crate) fn drive_player(
    time: Res<Time>,
    input: Res<ActionSnapshot>,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (&Transform, &LinearVelocity, &ContactFlags, &mut PlayerController),
        With<Player>,
    >,
) {
    let dt_ms = delta_ms(&time);
    if dt_ms <= 0.0 {
        return;
    }

    for (transform, velocity, contacts, mut controller) in &mut query {
        if controller.is_dying() {
            continue;
        }
        controller.sync_body(transform.translation.truncate(), velocity.0);
        controller.update(&*input, *contacts, dt_ms, &tuning);
    }
}
