// Use-case level outputs fanned out to connections.

use crate::domain::PlayerState;

#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    /// A player joined; snapshot includes its id.
    Joined(PlayerState),
    /// Partial state from a player, with its id folded in.
    Updated(PlayerState),
    /// Free-form shot payload, with the shooter's id folded in.
    Shot(PlayerState),
    Left { player_id: u64 },
}

/// One relay event plus the connection that must not receive it (the sender).
#[derive(Debug, Clone, PartialEq)]
pub struct Broadcast {
    pub skip: Option<u64>,
    pub event: RelayEvent,
}
