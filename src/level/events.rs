//! Level domain: messages.

use bevy::ecs::message::Message;

/// The player confirmed a portal. Loading the target is left to the host.
#[derive(Debug)]
pub struct PortalEntered {
    pub target: String,
}

impl Message for PortalEntered {}
