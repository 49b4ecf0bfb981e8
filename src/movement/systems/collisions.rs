//! Movement domain: contact probing against level geometry.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{ContactFlags, ContactProbe, GameLayer};

/// How far past the body edge a probe reaches.
const PROBE_REACH: f32 = 4.0;

/// Fill [`ContactFlags`] for every probed body with short raycasts.
///
/// Floors and ceilings count any solid; sides only count walls, so platform
/// edges cannot be wall-slid.
pub(crate) fn probe_contacts(
    spatial_query: SpatialQuery,
    mut query: Query<(&Transform, &ContactProbe, &mut ContactFlags)>,
) {
    let solid_filter = SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Wall]);
    let wall_filter = SpatialQueryFilter::from_mask(GameLayer::Wall);

    for (transform, probe, mut contacts) in &mut query {
        let center = transform.translation.truncate();
        let half = probe.half_extents;

        let cast = |origin: Vec2, direction: Dir2, distance: f32, filter: &SpatialQueryFilter| {
            spatial_query
                .cast_ray(origin, direction, distance, true, filter)
                .is_some()
        };

        let next = ContactFlags {
            blocked_down: cast(
                center - Vec2::new(0.0, half.y),
                Dir2::NEG_Y,
                PROBE_REACH,
                &solid_filter,
            ),
            blocked_up: cast(
                center + Vec2::new(0.0, half.y),
                Dir2::Y,
                PROBE_REACH,
                &solid_filter,
            ),
            blocked_left: cast(center, Dir2::NEG_X, half.x + PROBE_REACH, &wall_filter),
            blocked_right: cast(center, Dir2::X, half.x + PROBE_REACH, &wall_filter),
        };

        if next.blocked_down != contacts.blocked_down {
            debug!("Ground contact changed: blocked_down={}", next.blocked_down);
        }
        if *contacts != next {
            *contacts = next;
        }
    }
}
