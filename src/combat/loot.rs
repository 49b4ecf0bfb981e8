//! Combat domain: handing death drops to whoever spawns pickups.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::resources::DropRange;

/// One pickup the spawner should create.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootDrop {
    pub position: Vec2,
    pub value: u32,
}

/// Receives drops; called once per drop.
pub trait LootSink {
    fn spawn_drop(&mut self, x: f32, y: f32, value: u32);
}

impl LootSink for Vec<LootDrop> {
    fn spawn_drop(&mut self, x: f32, y: f32, value: u32) {
        self.push(LootDrop {
            position: Vec2::new(x, y),
            value,
        });
    }
}

/// Sink that drops everything, for defenders that never carry loot.
pub struct NoLoot;

impl LootSink for NoLoot {
    fn spawn_drop(&mut self, _x: f32, _y: f32, _value: u32) {}
}

/// Roll a drop count from `range` and hand each drop to `sink`.
pub fn hand_off_loot(
    sink: &mut dyn LootSink,
    rng: &mut impl Rng,
    position: Vec2,
    range: DropRange,
    value: u32,
) -> u32 {
    let count = range.roll(rng);
    for _ in 0..count {
        sink.spawn_drop(position.x, position.y, value);
    }
    count
}
