// Last-known state of every joined player. The relay never interprets the state; it only
// merges and hands it back out.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Opaque player fields as the client sent them (`x`, `y`, `health`, ...).
pub type PlayerState = Map<String, Value>;

/// Reserved for the relay's own player id; clients cannot overwrite it.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub id: u64,
    pub state: PlayerState,
    pub last_update_ms: u64,
}

impl PlayerRecord {
    /// State with the player's id folded in, as peers see it.
    pub fn snapshot(&self) -> PlayerState {
        with_id(self.id, &self.state)
    }
}

/// Copies `state` and sets the id field. Ids go out as strings so JavaScript clients keep
/// every digit.
pub fn with_id(id: u64, state: &PlayerState) -> PlayerState {
    let mut out = PlayerState::with_capacity(state.len() + 1);
    out.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    for (key, value) in state {
        if key != ID_FIELD {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}

#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<u64, PlayerRecord>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or re-registers) a player with a fresh state.
    pub fn join(&mut self, id: u64, mut state: PlayerState, now_ms: u64) -> &PlayerRecord {
        state.remove(ID_FIELD);
        self.players.insert(
            id,
            PlayerRecord {
                id,
                state,
                last_update_ms: now_ms,
            },
        );
        &self.players[&id]
    }

    /// Merges `patch` over the stored state. Unknown players are ignored (returns false).
    pub fn update(&mut self, id: u64, patch: &PlayerState, now_ms: u64) -> bool {
        let Some(record) = self.players.get_mut(&id) else {
            return false;
        };
        for (key, value) in patch {
            if key != ID_FIELD {
                record.state.insert(key.clone(), value.clone());
            }
        }
        record.last_update_ms = now_ms;
        true
    }

    pub fn remove(&mut self, id: u64) -> Option<PlayerRecord> {
        self.players.remove(&id)
    }

    /// Drops every player not refreshed within `stale_after_ms`. Returns their ids.
    pub fn evict_stale(&mut self, now_ms: u64, stale_after_ms: u64) -> Vec<u64> {
        let stale: Vec<u64> = self
            .players
            .values()
            .filter(|p| now_ms.saturating_sub(p.last_update_ms) > stale_after_ms)
            .map(|p| p.id)
            .collect();
        for id in &stale {
            self.players.remove(id);
        }
        stale
    }

    pub fn contains(&self, id: u64) -> bool {
        self.players.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&PlayerRecord> {
        self.players.get(&id)
    }

    pub fn snapshots(&self) -> Vec<PlayerState> {
        self.players.values().map(PlayerRecord::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
