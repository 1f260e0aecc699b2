// Wire protocol DTOs and conversions for relay messages.

use crate::domain::PlayerState;
use crate::use_cases::RelayEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Assigned identity for the connection, sent right after the upgrade.
    Identity { player_id: String },
    // Every registered player, the joiner included. Sent only to the joiner.
    ExistingPlayers(Vec<PlayerState>),
    PlayerJoined(PlayerState),
    PlayerUpdate(PlayerState),
    ShootEvent(PlayerState),
    PlayerLeave { id: String },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    PlayerJoin(PlayerJoinPayload),
    // Any subset of the player's fields; merged over the stored state.
    PlayerUpdate(PlayerState),
    // Free-form; relayed as-is.
    ShootEvent(#[serde(default)] Value),
}

/// Initial transform reported on join.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerJoinPayload {
    pub x: f64,
    pub y: f64,
    pub health: f64,
}

impl From<PlayerJoinPayload> for PlayerState {
    fn from(join: PlayerJoinPayload) -> Self {
        let mut state = PlayerState::new();
        state.insert("x".to_string(), Value::from(join.x));
        state.insert("y".to_string(), Value::from(join.y));
        state.insert("health".to_string(), Value::from(join.health));
        state
    }
}

/// Shot payloads that are not JSON objects carry nothing worth relaying.
pub fn shot_fields(data: Value) -> PlayerState {
    match data {
        Value::Object(map) => map,
        _ => PlayerState::new(),
    }
}

impl From<RelayEvent> for ServerMessage {
    fn from(event: RelayEvent) -> Self {
        match event {
            RelayEvent::Joined(player) => ServerMessage::PlayerJoined(player),
            RelayEvent::Updated(patch) => ServerMessage::PlayerUpdate(patch),
            RelayEvent::Shot(data) => ServerMessage::ShootEvent(data),
            RelayEvent::Left { player_id } => ServerMessage::PlayerLeave {
                id: player_id.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_join_arrives_then_it_parses_into_a_typed_payload() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "PlayerJoin",
            "data": {"x": 400, "y": 550, "health": 100}
        }))
        .expect("valid join");

        let ClientMessage::PlayerJoin(join) = msg else {
            panic!("expected a join");
        };
        assert_eq!(
            Value::Object(PlayerState::from(join)),
            json!({"x": 400.0, "y": 550.0, "health": 100.0})
        );
    }

    #[test]
    fn when_join_misses_a_field_then_it_is_rejected() {
        let parsed = serde_json::from_value::<ClientMessage>(json!({
            "type": "PlayerJoin",
            "data": {"x": 1, "y": 2}
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn when_shot_is_not_an_object_then_no_fields_are_kept() {
        assert!(shot_fields(json!(42)).is_empty());
        assert_eq!(shot_fields(json!({"angle": 0.5})).len(), 1);
    }

    #[test]
    fn when_leave_is_serialized_then_id_goes_out_as_a_string() {
        let msg = ServerMessage::from(RelayEvent::Left { player_id: 12 });
        assert_eq!(
            serde_json::to_value(&msg).expect("serializable"),
            json!({"type": "PlayerLeave", "data": {"id": "12"}})
        );
    }
}
