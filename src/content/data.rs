//! Data definitions for the RON tuning file.
//!
//! Mirrors assets/data/tuning.ron. Every section falls back to its documented
//! defaults, so a file only needs the values it changes.

use serde::{Deserialize, Serialize};

use crate::combat::{AiTuning, ArchetypeTable, AttackTuning, CombatTuning};
use crate::movement::MovementTuning;

pub const TUNING_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TuningFile {
    pub schema_version: u32,
    pub movement: MovementTuning,
    pub attack: AttackTuning,
    pub combat: CombatTuning,
    pub ai: AiTuning,
    pub archetypes: ArchetypeTable,
}

impl Default for TuningFile {
    fn default() -> Self {
        Self {
            schema_version: TUNING_SCHEMA_VERSION,
            movement: MovementTuning::default(),
            attack: AttackTuning::default(),
            combat: CombatTuning::default(),
            ai: AiTuning::default(),
            archetypes: ArchetypeTable::default(),
        }
    }
}
