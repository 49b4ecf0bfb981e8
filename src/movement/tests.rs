//! Movement domain: tests for the player motor state machine.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{
    ContactFlags, Facing, MovementState, MovementTuning, PlayerController, approach,
};
use crate::combat::{CombatTuning, DamageContext, Damageable, Hit, LootDrop, SwingId};
use crate::core::{Action, ActionSnapshot, TimerKey};

const DT: f32 = 10.0;

fn tuning() -> MovementTuning {
    MovementTuning::default()
}

fn player(tuning: &MovementTuning) -> PlayerController {
    PlayerController::new(
        Vec2::ZERO,
        5.0,
        tuning,
        CombatTuning::default().player_defense(),
    )
}

fn idle() -> ActionSnapshot {
    ActionSnapshot::default()
}

fn air() -> ContactFlags {
    ContactFlags::default()
}

fn ground() -> ContactFlags {
    ContactFlags::grounded()
}

fn right_wall() -> ContactFlags {
    ContactFlags {
        blocked_right: true,
        ..default()
    }
}

fn step(
    controller: &mut PlayerController,
    input: ActionSnapshot,
    contacts: ContactFlags,
    tuning: &MovementTuning,
) -> MovementState {
    controller.update(&input, contacts, DT, tuning).state
}

fn run(
    controller: &mut PlayerController,
    ticks: usize,
    input: ActionSnapshot,
    contacts: ContactFlags,
    tuning: &MovementTuning,
) {
    for _ in 0..ticks {
        controller.update(&input, contacts, DT, tuning);
    }
}

/// Ground the player, then step off a ledge. Returns after the first airborne tick.
fn walk_off_ledge(tuning: &MovementTuning) -> PlayerController {
    let mut controller = player(tuning);
    step(&mut controller, idle(), ground(), tuning);
    step(&mut controller, idle(), air(), tuning);
    controller
}

/// Airborne from the first tick, with no coyote window.
fn in_the_air(tuning: &MovementTuning) -> PlayerController {
    let mut controller = player(tuning);
    assert_eq!(step(&mut controller, idle(), air(), tuning), MovementState::Airborne);
    controller
}

fn ctx_parts() -> (Vec<LootDrop>, ChaCha8Rng) {
    (Vec::new(), ChaCha8Rng::seed_from_u64(1))
}

// -----------------------------------------------------------------------------
// Ground movement
// -----------------------------------------------------------------------------

#[test]
fn test_approach_clamps_to_target() {
    assert_eq!(approach(0.0, 100.0, 30.0), 30.0);
    assert_eq!(approach(90.0, 100.0, 30.0), 100.0);
    assert_eq!(approach(0.0, -100.0, 30.0), -30.0);
    assert_eq!(approach(5.0, 5.0, 30.0), 5.0);
}

#[test]
fn test_running_accelerates_and_faces_input() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    let left = idle().hold(Action::Left);

    step(&mut controller, left, ground(), &tuning);
    let expected = -tuning.ground_accel * DT / 1000.0;
    assert!((controller.velocity().x - expected).abs() < 1e-3);
    assert_eq!(controller.facing(), Facing::Left);

    run(&mut controller, 50, left, ground(), &tuning);
    assert_eq!(controller.velocity().x, -tuning.max_speed);
}

#[test]
fn test_grounded_player_has_no_vertical_velocity() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    run(&mut controller, 10, idle(), ground(), &tuning);
    assert_eq!(controller.velocity().y, 0.0);
    assert_eq!(controller.state(), MovementState::Grounded);
    assert!(controller.is_on_ground());
}

#[test]
fn test_ground_contact_tracks_landing() {
    let tuning = tuning();
    let mut controller = in_the_air(&tuning);
    assert!(!controller.is_on_ground());

    step(&mut controller, idle(), ground(), &tuning);
    assert!(controller.is_on_ground());
    assert_eq!(controller.state(), MovementState::Grounded);

    step(&mut controller, idle(), air(), &tuning);
    assert!(!controller.is_on_ground());
}

#[test]
fn test_fall_speed_is_capped() {
    let tuning = tuning();
    let mut controller = in_the_air(&tuning);
    run(&mut controller, 200, idle(), air(), &tuning);
    assert_eq!(controller.velocity().y, -tuning.max_fall_speed);
}

// -----------------------------------------------------------------------------
// Coyote time and jump buffer
// -----------------------------------------------------------------------------

#[test]
fn test_coyote_jump_inside_window() {
    let tuning = tuning();
    let mut controller = walk_off_ledge(&tuning);
    run(&mut controller, 8, idle(), air(), &tuning);

    // 90ms after leaving the ledge.
    step(&mut controller, idle().press(Action::Jump), air(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
    assert!(controller.velocity().y > tuning.jump_velocity * 0.9);
}

#[test]
fn test_coyote_window_closes_at_boundary() {
    let tuning = tuning();
    let mut controller = walk_off_ledge(&tuning);
    run(&mut controller, 9, idle(), air(), &tuning);

    // 100ms after leaving the ledge.
    step(&mut controller, idle().press(Action::Jump), air(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
    assert!(controller.velocity().y < 0.0);
}

#[test]
fn test_player_stays_grounded_during_coyote() {
    let tuning = tuning();
    let controller = walk_off_ledge(&tuning);
    assert_eq!(controller.state(), MovementState::Grounded);
    assert!(controller.timers().is_active(TimerKey::Coyote));
}

#[test]
fn test_buffered_jump_fires_on_landing() {
    let tuning = tuning();
    let mut controller = in_the_air(&tuning);
    step(&mut controller, idle().press(Action::Jump), air(), &tuning);
    assert!(controller.velocity().y < 0.0);

    let released = idle().release(Action::Jump);
    run(&mut controller, 10, released, air(), &tuning);

    // Lands 110ms after the press.
    step(&mut controller, idle(), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
    assert!(controller.velocity().y > 0.0);
}

#[test]
fn test_buffered_jump_expires_at_boundary() {
    let tuning = tuning();
    let mut controller = in_the_air(&tuning);
    step(&mut controller, idle().press(Action::Jump), air(), &tuning);
    run(&mut controller, 11, idle(), air(), &tuning);

    // Lands 120ms after the press.
    step(&mut controller, idle(), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Grounded);
    assert_eq!(controller.velocity().y, 0.0);
}

#[test]
fn test_held_jump_does_not_repeat_after_landing() {
    let tuning = tuning();
    let mut controller = in_the_air(&tuning);
    let held = idle().hold(Action::Jump);
    run(&mut controller, 5, held, air(), &tuning);

    step(&mut controller, held, ground(), &tuning);
    assert!(controller.is_awaiting_jump_release());

    // Key repeat reports a fresh press while the key never went up.
    step(&mut controller, idle().press(Action::Jump), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Grounded);
    assert_eq!(controller.velocity().y, 0.0);

    step(&mut controller, idle().release(Action::Jump), ground(), &tuning);
    assert!(!controller.is_awaiting_jump_release());

    step(&mut controller, idle().press(Action::Jump), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
    assert!(controller.velocity().y > 0.0);
}

// -----------------------------------------------------------------------------
// Variable jump height
// -----------------------------------------------------------------------------

#[test]
fn test_releasing_jump_cuts_velocity_once() {
    let tuning = tuning();
    let gravity_step = tuning.gravity * DT / 1000.0;
    let mut controller = player(&tuning);

    step(&mut controller, idle().press(Action::Jump), ground(), &tuning);
    step(&mut controller, idle().hold(Action::Jump), air(), &tuning);
    let before = controller.velocity().y;

    step(&mut controller, idle().release(Action::Jump), air(), &tuning);
    let cut = before * tuning.jump_cut_multiplier - gravity_step;
    assert!((controller.velocity().y - cut).abs() < 1e-3);

    step(&mut controller, idle().hold(Action::Jump), air(), &tuning);
    step(&mut controller, idle().release(Action::Jump), air(), &tuning);
    let expected = cut - 2.0 * gravity_step;
    assert!((controller.velocity().y - expected).abs() < 1e-3);
}

#[test]
fn test_full_jump_when_held() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    step(&mut controller, idle().press(Action::Jump), ground(), &tuning);
    let held = idle().hold(Action::Jump);

    let mut previous = controller.velocity().y;
    for _ in 0..10 {
        step(&mut controller, held, air(), &tuning);
        let drop = previous - controller.velocity().y;
        assert!((drop - tuning.gravity * DT / 1000.0).abs() < 1e-3);
        previous = controller.velocity().y;
    }
}

// -----------------------------------------------------------------------------
// Dash
// -----------------------------------------------------------------------------

#[test]
fn test_ground_dash_moves_at_dash_speed_then_ends() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    step(&mut controller, idle().press(Action::Dash), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Dash);
    assert_eq!(controller.velocity().x, tuning.dash_speed);
    assert_eq!(controller.air_dashes_used(), 0);

    run(&mut controller, 15, idle(), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Dash);
    step(&mut controller, idle(), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Grounded);
}

#[test]
fn test_dash_uses_facing_without_input() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    step(&mut controller, idle().hold(Action::Left), ground(), &tuning);
    step(&mut controller, idle().press(Action::Dash), ground(), &tuning);
    assert_eq!(controller.velocity().x, -tuning.dash_speed);
}

#[test]
fn test_dash_grants_invulnerability() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    step(&mut controller, idle().press(Action::Dash), ground(), &tuning);
    assert!(controller.is_invulnerable());

    let (mut loot, mut rng) = ctx_parts();
    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };
    assert!(!controller.take_damage(Hit::untracked(1.0, 50.0), &mut ctx));
    assert_eq!(controller.health().0, 5.0);
}

#[test]
fn test_air_dash_limit_is_enforced_until_landing() {
    let tuning = tuning();
    let mut controller = in_the_air(&tuning);

    step(&mut controller, idle().press(Action::Dash), air(), &tuning);
    assert_eq!(controller.state(), MovementState::Dash);
    assert_eq!(controller.air_dashes_used(), 1);

    // Past the dash and its cooldown.
    run(&mut controller, 40, idle(), air(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);

    step(&mut controller, idle().press(Action::Dash), air(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
    assert_eq!(controller.air_dashes_used(), 1);

    // Let the refused press fall out of the dash buffer before touching down.
    run(&mut controller, 8, idle(), air(), &tuning);
    run(&mut controller, 10, idle(), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Grounded);
    assert_eq!(controller.air_dashes_used(), 0);
}

#[test]
fn test_coyote_dash_counts_against_air_limit() {
    let tuning = tuning();
    let mut controller = walk_off_ledge(&tuning);
    assert_eq!(controller.state(), MovementState::Grounded);

    step(&mut controller, idle().press(Action::Dash), air(), &tuning);
    assert_eq!(controller.state(), MovementState::Dash);
    assert_eq!(controller.air_dashes_used(), 1);

    run(&mut controller, 40, idle(), air(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);

    step(&mut controller, idle().press(Action::Dash), air(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
    assert_eq!(controller.air_dashes_used(), 1);
}

#[test]
fn test_ground_dash_is_free() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    step(&mut controller, idle().press(Action::Dash), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Dash);
    assert_eq!(controller.air_dashes_used(), 0);
}

#[test]
fn test_air_dash_limit_zero_is_unlimited() {
    let tuning = MovementTuning {
        air_dash_limit: 0,
        ..tuning()
    };
    let mut controller = in_the_air(&tuning);

    for expected in 1..=3 {
        step(&mut controller, idle().press(Action::Dash), air(), &tuning);
        assert_eq!(controller.state(), MovementState::Dash);
        assert_eq!(controller.air_dashes_used(), expected);
        run(&mut controller, 40, idle(), air(), &tuning);
    }
}

#[test]
fn test_dash_press_is_buffered_through_cooldown() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    step(&mut controller, idle().press(Action::Dash), ground(), &tuning);
    run(&mut controller, 29, idle(), ground(), &tuning);

    // 300ms in; cooldown has 50ms left.
    step(&mut controller, idle().press(Action::Dash), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Grounded);

    run(&mut controller, 4, idle(), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Grounded);
    step(&mut controller, idle(), ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Dash);
}

// -----------------------------------------------------------------------------
// Wall slide and wall jump
// -----------------------------------------------------------------------------

fn wall_sliding(tuning: &MovementTuning) -> PlayerController {
    let mut controller = in_the_air(tuning);
    let toward = idle().hold(Action::Right);
    step(&mut controller, toward, right_wall(), tuning);
    assert_eq!(controller.state(), MovementState::WallSlide);
    controller
}

#[test]
fn test_wall_slide_caps_fall_speed() {
    let tuning = tuning();
    let mut controller = wall_sliding(&tuning);
    run(&mut controller, 100, idle().hold(Action::Right), right_wall(), &tuning);
    assert_eq!(controller.state(), MovementState::WallSlide);
    assert_eq!(controller.velocity().y, -tuning.wall_slide_speed);
}

#[test]
fn test_wall_slide_needs_input_toward_wall() {
    let tuning = tuning();
    let mut controller = in_the_air(&tuning);
    step(&mut controller, idle(), right_wall(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
}

#[test]
fn test_wall_stick_holds_slide_briefly_after_letting_go() {
    let tuning = tuning();
    let mut controller = wall_sliding(&tuning);
    run(&mut controller, 14, idle(), right_wall(), &tuning);
    assert_eq!(controller.state(), MovementState::WallSlide);
    step(&mut controller, idle(), right_wall(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
}

#[test]
fn test_wall_jump_pushes_away_and_locks_input() {
    let tuning = tuning();
    let mut controller = wall_sliding(&tuning);

    let jump = idle().hold(Action::Right).press(Action::Jump);
    step(&mut controller, jump, right_wall(), &tuning);
    assert_eq!(controller.state(), MovementState::Airborne);
    assert_eq!(controller.facing(), Facing::Left);
    assert_eq!(controller.velocity().x, -tuning.wall_jump_horizontal);
    assert!(controller.velocity().y > 0.0);

    // Holding toward the wall does nothing while the lock runs.
    let toward = idle().hold(Action::Right).hold(Action::Jump);
    run(&mut controller, 13, toward, air(), &tuning);
    assert_eq!(controller.velocity().x, -tuning.wall_jump_horizontal);

    run(&mut controller, 2, toward, air(), &tuning);
    assert!(controller.velocity().x > -tuning.wall_jump_horizontal);
}

#[test]
fn test_wall_slide_ends_on_landing() {
    let tuning = tuning();
    let mut controller = wall_sliding(&tuning);
    let corner = ContactFlags {
        blocked_down: true,
        blocked_right: true,
        ..default()
    };
    step(&mut controller, idle().hold(Action::Right), corner, &tuning);
    assert_eq!(controller.state(), MovementState::Grounded);
}

// -----------------------------------------------------------------------------
// Player damage
// -----------------------------------------------------------------------------

#[test]
fn test_player_knockback_points_away_from_source() {
    let tuning = tuning();
    let combat = CombatTuning::default();
    let mut controller = player(&tuning);
    let (mut loot, mut rng) = ctx_parts();
    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };

    assert!(controller.take_damage(Hit::untracked(1.0, 40.0), &mut ctx));
    assert_eq!(
        controller.velocity(),
        Vec2::new(-combat.player_knockback_x, combat.player_knockback_y)
    );
    assert_eq!(controller.health(), (4.0, 5.0));
}

#[test]
fn test_player_invulnerability_blocks_then_expires() {
    let tuning = tuning();
    let combat = CombatTuning::default();
    let mut controller = player(&tuning);
    let (mut loot, mut rng) = ctx_parts();

    {
        let mut ctx = DamageContext {
            loot: &mut loot,
            rng: &mut rng,
        };
        assert!(controller.take_damage(Hit::untracked(1.0, -10.0), &mut ctx));
        assert!(!controller.take_damage(Hit::swing(1.0, -10.0, SwingId(9)), &mut ctx));
    }

    let ticks = (combat.player_invuln_ms / DT) as usize;
    run(&mut controller, ticks, idle(), ground(), &tuning);
    assert!(!controller.is_invulnerable());

    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };
    assert!(controller.take_damage(Hit::untracked(1.0, -10.0), &mut ctx));
    assert_eq!(controller.health().0, 3.0);
}

#[test]
fn test_defeat_signal_fires_once() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    let (mut loot, mut rng) = ctx_parts();
    let mut ctx = DamageContext {
        loot: &mut loot,
        rng: &mut rng,
    };

    assert!(controller.take_damage(Hit::untracked(10.0, 0.0), &mut ctx));
    assert!(controller.is_dying());
    assert!(!controller.take_damage(Hit::untracked(10.0, 0.0), &mut ctx));

    assert!(controller.take_defeat_signal());
    assert!(!controller.take_defeat_signal());
}

#[test]
fn test_lock_movement_ignores_input_until_expiry() {
    let tuning = tuning();
    let mut controller = player(&tuning);
    step(&mut controller, idle(), ground(), &tuning);
    controller.lock_movement(50.0);

    let right = idle().hold(Action::Right);
    run(&mut controller, 4, right, ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Hitstun);
    assert_eq!(controller.velocity().x, 0.0);

    step(&mut controller, right, ground(), &tuning);
    assert_eq!(controller.state(), MovementState::Grounded);
    assert!(controller.velocity().x > 0.0);
}
