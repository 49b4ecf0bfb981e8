//! Validation for tuning values and level layouts.

use super::data::TuningFile;
use crate::combat::ArchetypeStats;
use crate::level::LevelLayout;

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub section: String,
    pub field: &'static str,
    pub message: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.section, self.field, self.message)
    }
}

/// Helper macro for recording a failed rule
macro_rules! check_rule {
    ($errors:expr, $ok:expr, $section:expr, $field:expr, $message:expr) => {
        if !$ok {
            $errors.push(ValidationError {
                section: $section.to_string(),
                field: $field,
                message: $message,
            });
        }
    };
}

macro_rules! check_durations {
    ($errors:expr, $section:expr, $source:expr, [$($field:ident),+ $(,)?]) => {
        $(
            check_rule!(
                $errors,
                $source.$field >= 0.0,
                $section,
                stringify!($field),
                "duration must not be negative"
            );
        )+
    };
}

/// Validate every section of the tuning file.
/// Returns a list of validation errors, empty if the file is usable.
pub fn validate_tuning(tuning: &TuningFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let movement = &tuning.movement;
    check_durations!(
        errors,
        "movement",
        movement,
        [
            coyote_ms,
            jump_buffer_ms,
            dash_ms,
            dash_cooldown_ms,
            dash_buffer_ms,
            wall_stick_ms,
            wall_jump_lock_ms,
        ]
    );
    check_rule!(
        errors,
        movement.gravity > 0.0,
        "movement",
        "gravity",
        "must be positive"
    );
    check_rule!(
        errors,
        movement.max_speed > 0.0,
        "movement",
        "max_speed",
        "must be positive"
    );
    check_rule!(
        errors,
        (0.0..=1.0).contains(&movement.jump_cut_multiplier),
        "movement",
        "jump_cut_multiplier",
        "must be within 0..=1"
    );

    let attack = &tuning.attack;
    check_durations!(
        errors,
        "attack",
        attack,
        [windup_ms, active_ms, recovery_ms, cooldown_ms]
    );
    check_rule!(
        errors,
        attack.hitbox_width > 0.0 && attack.hitbox_height > 0.0,
        "attack",
        "hitbox",
        "hitbox must have a positive size"
    );

    let combat = &tuning.combat;
    check_durations!(
        errors,
        "combat",
        combat,
        [hitstop_ms, player_invuln_ms, corpse_grace_ms]
    );
    check_rule!(
        errors,
        combat.hitstop_scale > 0.0 && combat.hitstop_scale <= 1.0,
        "combat",
        "hitstop_scale",
        "must be within (0, 1]"
    );
    check_rule!(
        errors,
        combat.player_max_health > 0.0,
        "combat",
        "player_max_health",
        "must be positive"
    );

    let ai = &tuning.ai;
    check_durations!(errors, "ai", ai, [turn_cooldown_ms]);
    check_rule!(
        errors,
        ai.deaggro_multiplier >= 1.0,
        "ai",
        "deaggro_multiplier",
        "must be at least 1"
    );

    for (kind, stats) in tuning.archetypes.iter() {
        let section = format!("archetypes.{:?}", kind).to_lowercase();
        validate_archetype(&mut errors, &section, stats, ai.deaggro_multiplier);
    }

    errors
}

fn validate_archetype(
    errors: &mut Vec<ValidationError>,
    section: &str,
    stats: &ArchetypeStats,
    deaggro_multiplier: f32,
) {
    check_durations!(
        errors,
        section,
        stats,
        [
            telegraph_ms,
            commit_ms,
            recover_ms,
            attack_cooldown_ms,
            hitstun_ms,
            invuln_ms,
            stance_ms,
            projectile_lifetime_ms,
            emerge_ms,
            phase_shift_ms,
        ]
    );
    check_rule!(
        errors,
        stats.max_health > 0.0,
        section,
        "max_health",
        "must be positive"
    );
    check_rule!(
        errors,
        stats.mask_health >= 0.0,
        section,
        "mask_health",
        "must not be negative"
    );

    let deaggro = if stats.deaggro_radius > 0.0 {
        stats.deaggro_radius
    } else {
        stats.aggro_radius * deaggro_multiplier
    };
    check_rule!(
        errors,
        stats.aggro_radius <= deaggro,
        section,
        "deaggro_radius",
        "must not be smaller than aggro_radius"
    );
    check_rule!(
        errors,
        stats.drops.min <= stats.drops.max,
        section,
        "drops",
        "min must not exceed max"
    );
    check_rule!(
        errors,
        stats.hitstun_multiplier > 0.0,
        section,
        "hitstun_multiplier",
        "must be positive"
    );
    check_rule!(
        errors,
        stats.enraged_speed_multiplier > 0.0 && stats.phase_speed_step > 0.0,
        section,
        "speed_multiplier",
        "speed multipliers must be positive"
    );
    check_rule!(
        errors,
        (0.0..=1.0).contains(&stats.stance_damage_scale),
        section,
        "stance_damage_scale",
        "must be within 0..=1"
    );

    let in_range = stats
        .phase_thresholds
        .iter()
        .all(|t| *t > 0.0 && *t < 1.0);
    let descending = stats.phase_thresholds.windows(2).all(|w| w[0] > w[1]);
    check_rule!(
        errors,
        in_range && descending,
        section,
        "phase_thresholds",
        "must be strictly descending fractions within (0, 1)"
    );
}

/// Validate geometry and spawns of a level layout.
pub fn validate_level(level: &LevelLayout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let section = format!("level.{}", level.name);

    for platform in &level.platforms {
        check_rule!(
            errors,
            platform.rect.w > 0.0 && platform.rect.h > 0.0,
            section,
            "platforms",
            "platform must have a positive size"
        );
    }
    for hazard in &level.hazards {
        check_rule!(
            errors,
            hazard.rect.w > 0.0 && hazard.rect.h > 0.0,
            section,
            "hazards",
            "hazard must have a positive size"
        );
        check_rule!(
            errors,
            hazard.damage > 0.0,
            section,
            "hazards",
            "hazard damage must be positive"
        );
    }
    for spawn in &level.spawns {
        let config = &spawn.config;
        check_rule!(
            errors,
            config.max_health.is_none_or(|hp| hp > 0.0),
            section,
            "spawns",
            "max_health override must be positive"
        );
        check_rule!(
            errors,
            config.drops.is_none_or(|drops| drops.min <= drops.max),
            section,
            "spawns",
            "drops override min must not exceed max"
        );
    }
    for portal in &level.portals {
        check_rule!(
            errors,
            !portal.target.is_empty(),
            section,
            "portals",
            "portal needs a target"
        );
    }

    errors
}
