use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const CANVAS_WIDTH: u32 = 350;
pub const CANVAS_HEIGHT: u32 = 350;
pub const TILE_SIZE: u32 = 5;
pub const COUNTDOWN_START: u32 = 3;
pub const COUNTDOWN_TICK_MS: u64 = 1000;
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8080/";

/// Query parameter carrying the player name on the connect URL.
pub const PLAYER_NAME_PARAM: &str = "playerName";

pub const MSG_GAME_START: &str = "GameStart";
pub const MSG_PLAYER_CHANGED: &str = "PlayerChanged";
pub const MSG_PLAYER_READY: &str = "PlayerReady";
pub const MSG_PLAYER_MOVE_REQUEST: &str = "PlayerMoveRequest";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("frame is not a valid envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed {msg_type} payload: {reason}")]
    MalformedPayload { msg_type: String, reason: String },
}

/// Wire wrapper around every message, `{"msgType": ..., "obj": ...}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Envelope {
    #[serde(rename = "msgType")]
    pub msg_type: String,
    #[serde(default)]
    pub obj: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One player as reported by the server in a `PlayerChanged` snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub color: String,
    pub position: Position,
    #[serde(default)]
    pub is_ready: bool,
    #[serde(default)]
    pub can_start: bool,
}

impl Player {
    pub fn new(name: &str, color: &str, x: i32, y: i32) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            position: Position::new(x, y),
            is_ready: false,
            can_start: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "LEFT",
            Direction::Up => "UP",
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
        }
    }
}

/// Commands the client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    PlayerReady { player: String },
    PlayerMoveRequest { direction: Direction },
}

impl OutboundMessage {
    pub fn msg_type(&self) -> &'static str {
        match self {
            OutboundMessage::PlayerReady { .. } => MSG_PLAYER_READY,
            OutboundMessage::PlayerMoveRequest { .. } => MSG_PLAYER_MOVE_REQUEST,
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        let obj = match self {
            OutboundMessage::PlayerReady { player } => json!({ "player": player }),
            OutboundMessage::PlayerMoveRequest { direction } => {
                json!({ "direction": direction })
            }
        };

        Envelope {
            msg_type: self.msg_type().to_string(),
            obj,
        }
    }

    pub fn encode(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.to_envelope())?)
    }
}

/// Messages the server sends to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Lobby is starting. The payload is only logged.
    GameStart(Value),
    PlayerChanged(Vec<Player>),
    /// Any other `msgType`; kept so callers can log it and move on.
    Unknown(String),
}

impl InboundMessage {
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        Self::from_envelope(decode_envelope(raw)?)
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Self, CodecError> {
        match envelope.msg_type.as_str() {
            MSG_GAME_START => Ok(InboundMessage::GameStart(envelope.obj)),
            MSG_PLAYER_CHANGED => decode_players(&envelope.obj).map(InboundMessage::PlayerChanged),
            _ => Ok(InboundMessage::Unknown(envelope.msg_type)),
        }
    }
}

pub fn decode_envelope(raw: &str) -> Result<Envelope, CodecError> {
    Ok(serde_json::from_str(raw)?)
}

/// The `PlayerChanged` payload is itself a JSON document carried as a string.
fn decode_players(obj: &Value) -> Result<Vec<Player>, CodecError> {
    let nested = obj.as_str().ok_or_else(|| CodecError::MalformedPayload {
        msg_type: MSG_PLAYER_CHANGED.to_string(),
        reason: "expected a JSON-encoded string".to_string(),
    })?;

    serde_json::from_str(nested).map_err(|e| CodecError::MalformedPayload {
        msg_type: MSG_PLAYER_CHANGED.to_string(),
        reason: e.to_string(),
    })
}

/// Wraps a roster the way the server does, for tests and tooling.
pub fn encode_player_changed(players: &[Player]) -> Result<String, CodecError> {
    let nested = serde_json::to_string(players)?;
    let envelope = Envelope {
        msg_type: MSG_PLAYER_CHANGED.to_string(),
        obj: Value::String(nested),
    };
    Ok(serde_json::to_string(&envelope)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new("alice", "red", 1, -2);
        assert_eq!(player.name, "alice");
        assert_eq!(player.color, "red");
        assert_eq!(player.position, Position::new(1, -2));
        assert!(!player.is_ready);
        assert!(!player.can_start);
    }

    #[test]
    fn test_player_ready_wire_shape() {
        let message = OutboundMessage::PlayerReady {
            player: "alice".to_string(),
        };
        let encoded: Value = serde_json::from_str(&message.encode().unwrap()).unwrap();

        assert_eq!(
            encoded,
            json!({ "msgType": "PlayerReady", "obj": { "player": "alice" } })
        );
    }

    #[test]
    fn test_move_request_wire_shape() {
        let message = OutboundMessage::PlayerMoveRequest {
            direction: Direction::Down,
        };
        let encoded: Value = serde_json::from_str(&message.encode().unwrap()).unwrap();

        assert_eq!(
            encoded,
            json!({ "msgType": "PlayerMoveRequest", "obj": { "direction": "DOWN" } })
        );
    }

    #[test]
    fn test_direction_names() {
        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            let encoded = serde_json::to_value(direction).unwrap();
            assert_eq!(encoded, Value::String(direction.as_str().to_string()));
        }
    }

    #[test]
    fn test_decode_player_changed_double_encoded() {
        let raw = r#"{"msgType":"PlayerChanged","obj":"[{\"name\":\"alice\",\"color\":\"red\",\"position\":{\"x\":1,\"y\":1},\"isReady\":true,\"canStart\":false}]"}"#;

        match InboundMessage::decode(raw).unwrap() {
            InboundMessage::PlayerChanged(players) => {
                assert_eq!(players.len(), 1);
                assert_eq!(players[0].name, "alice");
                assert_eq!(players[0].color, "red");
                assert_eq!(players[0].position, Position::new(1, 1));
                assert!(players[0].is_ready);
                assert!(!players[0].can_start);
            }
            other => panic!("Wrong message type after decoding: {:?}", other),
        }
    }

    #[test]
    fn test_decode_player_changed_defaults_flags() {
        let raw = encode_player_changed(&[Player::new("bob", "#00ff00", 0, 0)]).unwrap();
        let raw = raw.replace(r#",\"isReady\":false,\"canStart\":false"#, "");

        match InboundMessage::decode(&raw).unwrap() {
            InboundMessage::PlayerChanged(players) => {
                assert!(!players[0].is_ready);
                assert!(!players[0].can_start);
            }
            other => panic!("Wrong message type after decoding: {:?}", other),
        }
    }

    #[test]
    fn test_player_changed_flat_array_is_rejected() {
        let raw = r#"{"msgType":"PlayerChanged","obj":[{"name":"a","color":"red","position":{"x":0,"y":0}}]}"#;
        let err = InboundMessage::decode(raw).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload { .. }));
    }

    #[test]
    fn test_player_changed_nested_garbage_is_rejected() {
        let raw = r#"{"msgType":"PlayerChanged","obj":"not json"}"#;
        let err = InboundMessage::decode(raw).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload { .. }));
    }

    #[test]
    fn test_decode_game_start_keeps_payload() {
        let raw = r#"{"msgType":"GameStart","obj":{"players":2}}"#;
        assert_eq!(
            InboundMessage::decode(raw).unwrap(),
            InboundMessage::GameStart(json!({ "players": 2 }))
        );
    }

    #[test]
    fn test_decode_game_start_without_obj() {
        let raw = r#"{"msgType":"GameStart"}"#;
        assert_eq!(
            InboundMessage::decode(raw).unwrap(),
            InboundMessage::GameStart(Value::Null)
        );
    }

    #[test]
    fn test_decode_unknown_type() {
        let raw = r#"{"msgType":"Scoreboard","obj":{"top":"alice"}}"#;
        assert_eq!(
            InboundMessage::decode(raw).unwrap(),
            InboundMessage::Unknown("Scoreboard".to_string())
        );
    }

    #[test]
    fn test_decode_non_json_frame() {
        let err = InboundMessage::decode("hello").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn test_decode_missing_msg_type() {
        let err = decode_envelope(r#"{"obj":{}}"#).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }
}
