//! Combat domain: enemy AI framework and archetypes.

mod flyer;
mod lurker;
mod skirmisher;
mod unit;
mod walker;
mod warden;

pub use unit::{
    AiEvent, AiState, BossPattern, EnemyStrike, EnemyUnit, Senses, ThinkContext, strike_rect,
};
pub use warden::pattern_table;
