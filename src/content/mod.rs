//! Content domain: tuning and level data loaded from RON at startup.

mod data;
mod loader;
mod validation;

pub use data::{TUNING_SCHEMA_VERSION, TuningFile};
pub use loader::{ContentLoadError, load_level, load_tuning, parse_single};
pub use validation::{ValidationError, validate_level, validate_tuning};

use avian2d::prelude::Gravity;
use bevy::prelude::*;
use std::path::PathBuf;

use crate::combat::{AiTuning, ArchetypeTable, AttackTuning, CombatTuning};
use crate::core::{CombatRng, SimClock};
use crate::level::{ActiveLevel, LevelLayout};
use crate::movement::MovementTuning;

/// Where startup content is read from.
#[derive(Resource, Debug, Clone)]
pub struct ContentPaths {
    pub data_dir: PathBuf,
    pub level: String,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
            level: "test_room".to_string(),
        }
    }
}

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentPaths>()
            .add_systems(PreStartup, load_content);
    }
}

/// Resolve the tuning file, falling back to defaults on any error.
pub fn resolve_tuning(loaded: Result<TuningFile, ContentLoadError>) -> TuningFile {
    let tuning = match loaded {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("{}; using default tuning", e);
            return TuningFile::default();
        }
    };

    if tuning.schema_version != TUNING_SCHEMA_VERSION {
        warn!(
            "Tuning schema version {} does not match {}",
            tuning.schema_version, TUNING_SCHEMA_VERSION
        );
    }

    let errors = validate_tuning(&tuning);
    if errors.is_empty() {
        return tuning;
    }
    for error in &errors {
        error!("Tuning validation: {}", error);
    }
    warn!("{} tuning errors; using default tuning", errors.len());
    TuningFile::default()
}

/// Resolve the level layout, falling back to the built-in test room.
pub fn resolve_level(loaded: Result<LevelLayout, ContentLoadError>) -> LevelLayout {
    let level = match loaded {
        Ok(level) => level,
        Err(e) => {
            warn!("{}; using built-in test room", e);
            return LevelLayout::test_room();
        }
    };

    let errors = validate_level(&level);
    if errors.is_empty() {
        return level;
    }
    for error in &errors {
        error!("Level validation: {}", error);
    }
    LevelLayout::test_room()
}

fn load_content(mut commands: Commands, paths: Res<ContentPaths>) {
    let tuning = resolve_tuning(load_tuning(&paths.data_dir));
    let level = resolve_level(load_level(&paths.data_dir, &paths.level));

    let TuningFile {
        movement,
        attack,
        combat,
        ai,
        archetypes,
        ..
    } = tuning;

    commands.insert_resource(SimClock::new(combat.hitstop_ms, combat.hitstop_scale));
    let rng = match combat.rng_seed {
        Some(seed) => CombatRng::new(seed),
        None => CombatRng::default(),
    };
    info!(
        "Content loaded: level '{}' ({} spawns), rng seed {}",
        level.name,
        level.spawns.len(),
        rng.seed
    );

    // Enemies fall through avian; the player motor integrates the same value itself.
    commands.insert_resource(Gravity(Vec2::NEG_Y * movement.gravity));
    commands.insert_resource(rng);
    commands.insert_resource::<MovementTuning>(movement);
    commands.insert_resource::<AttackTuning>(attack);
    commands.insert_resource::<CombatTuning>(combat);
    commands.insert_resource::<AiTuning>(ai);
    commands.insert_resource::<ArchetypeTable>(archetypes);
    commands.insert_resource(ActiveLevel(level));
}
