//! Combat domain: hit resolution between an open hitbox and its defenders.

use bevy::prelude::*;

use crate::combat::damage::{DamageContext, Damageable, Hit, SwingId};
use crate::core::{HitstopRequest, SimClock};

/// Strict overlap; rectangles that only share an edge do not touch.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Apply one swing's hitbox to every candidate.
///
/// Each overlapping, living, vulnerable defender not yet hit by `swing` gets
/// one `take_damage` call and records the swing whether or not damage landed.
/// If anything was hit the global hitstop window opens; hits inside an already
/// open window leave it alone. Returns the indices of defenders that took
/// damage.
pub fn resolve_attack<'a, D, I>(
    hitbox: Rect,
    swing: SwingId,
    hit: Hit,
    candidates: I,
    ctx: &mut DamageContext<'_>,
    clock: &mut SimClock,
) -> Vec<usize>
where
    D: Damageable + ?Sized + 'a,
    I: IntoIterator<Item = &'a mut D>,
{
    let hit = Hit {
        swing: Some(swing),
        ..hit
    };
    let mut landed = Vec::new();

    for (index, defender) in candidates.into_iter().enumerate() {
        if defender.is_dying() || defender.is_invulnerable() {
            continue;
        }
        if !rects_overlap(hitbox, defender.hit_rect()) {
            continue;
        }
        if defender.last_hit_by() == Some(swing) {
            continue;
        }
        if defender.take_damage(hit, ctx) {
            landed.push(index);
        }
        defender.record_swing(swing);
    }

    if !landed.is_empty() && clock.trigger_hitstop() == HitstopRequest::Started {
        debug!("Hitstop started by swing {:?}", swing);
    }
    landed
}
