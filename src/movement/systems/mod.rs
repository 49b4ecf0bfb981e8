//! Movement domain: system modules for locomotion updates.

pub(crate) mod collisions;
pub(crate) mod movement;

pub(crate) use collisions::probe_contacts;
pub(crate) use movement::drive_player;
