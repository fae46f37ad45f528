use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

pub const IDLE_ANIMATION: &str = "IdleFront";
pub const ATTACK_ANIMATION_PREFIX: &str = "Attack_";

/// Opaque per-connection identifier assigned by the transport layer.
pub type SessionId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub email: String,
    pub player_name: String,
    pub character_id: String,
    pub character_name: String,
    pub character_class: String,
    pub position_x: f32,
    pub position_y: f32,
    pub movement_animation: String,
}

impl Player {
    /// A freshly joined player: origin position, idle animation.
    pub fn new(
        email: String,
        player_name: String,
        character_id: String,
        character_name: String,
        character_class: String,
    ) -> Self {
        Self {
            email,
            player_name,
            character_id,
            character_name,
            character_class,
            position_x: 0.0,
            position_y: 0.0,
            movement_animation: IDLE_ANIMATION.to_string(),
        }
    }
}

/// A client-issued request for a state change, decoded from one wire message.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Join {
        email: String,
        player_name: String,
        character_id: String,
        character_name: String,
        character_class: String,
    },
    Move {
        x: f32,
        y: f32,
        anim: String,
    },
    Attack {
        direction: String,
    },
    Leave,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message is not a json object")]
    NotAnObject,
    #[error("message has no \"type\" field")]
    MissingType,
    #[error("unknown message type {0:?}")]
    UnknownType(String),
}

/// Decodes one inbound message.
///
/// Payload fields are read through an allow-list with typed defaults:
/// missing or wrong-typed fields fall back to `""` / `0.0`, unknown fields
/// are ignored. Only a broken envelope (no `type`) rejects the message.
pub fn parse_intent(text: &str) -> Result<Intent, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    let fields = value.as_object().ok_or(ParseError::NotAnObject)?;
    let kind = fields
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingType)?;

    match kind {
        "join" => Ok(Intent::Join {
            email: string_field(fields, "email"),
            player_name: string_field(fields, "playerName"),
            character_id: string_field(fields, "characterId"),
            character_name: string_field(fields, "characterName"),
            character_class: string_field(fields, "characterClass"),
        }),
        "move" => Ok(Intent::Move {
            x: number_field(fields, "x"),
            y: number_field(fields, "y"),
            anim: string_field(fields, "anim"),
        }),
        "attack" => Ok(Intent::Attack {
            direction: string_field(fields, "direction"),
        }),
        "leave" => Ok(Intent::Leave),
        other => Err(ParseError::UnknownType(other.to_string())),
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn number_field(fields: &Map<String, Value>, key: &str) -> f32 {
    fields.get(key).and_then(Value::as_f64).unwrap_or(0.0) as f32
}

/// Outbound state transmission, one JSON line per packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyncPacket {
    /// Full room state, sent once to a newly opened session.
    Snapshot {
        players: HashMap<SessionId, Player>,
    },
    /// Incremental change against the previously transmitted state.
    Diff {
        entered: HashMap<SessionId, Player>,
        updated: HashMap<SessionId, Player>,
        left: Vec<SessionId>,
    },
    /// Connection turned away before a session opened.
    Refused { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Player {
        Player::new(
            "ada@example.com".to_string(),
            "Ada".to_string(),
            "c-1".to_string(),
            "Lovelace".to_string(),
            "Mage".to_string(),
        )
    }

    #[test]
    fn test_new_player_defaults() {
        let player = ada();

        assert_eq!(player.email, "ada@example.com");
        assert_eq!(player.player_name, "Ada");
        assert_eq!(player.character_id, "c-1");
        assert_eq!(player.character_name, "Lovelace");
        assert_eq!(player.character_class, "Mage");
        assert_eq!(player.position_x, 0.0);
        assert_eq!(player.position_y, 0.0);
        assert_eq!(player.movement_animation, IDLE_ANIMATION);
    }

    #[test]
    fn test_player_wire_field_names() {
        let json = serde_json::to_value(ada()).unwrap();

        assert_eq!(json["playerName"], "Ada");
        assert_eq!(json["characterId"], "c-1");
        assert_eq!(json["characterName"], "Lovelace");
        assert_eq!(json["characterClass"], "Mage");
        assert_eq!(json["positionX"], 0.0);
        assert_eq!(json["positionY"], 0.0);
        assert_eq!(json["movementAnimation"], "IdleFront");
    }

    #[test]
    fn test_parse_join() {
        let intent = parse_intent(
            r#"{"type":"join","email":"ada@example.com","playerName":"Ada","characterId":"c-1","characterName":"Lovelace","characterClass":"Mage"}"#,
        )
        .unwrap();

        assert_eq!(
            intent,
            Intent::Join {
                email: "ada@example.com".to_string(),
                player_name: "Ada".to_string(),
                character_id: "c-1".to_string(),
                character_name: "Lovelace".to_string(),
                character_class: "Mage".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_join_missing_fields_default_to_empty() {
        let intent = parse_intent(r#"{"type":"join","playerName":"Ada"}"#).unwrap();

        match intent {
            Intent::Join {
                email,
                player_name,
                character_class,
                ..
            } => {
                assert_eq!(email, "");
                assert_eq!(player_name, "Ada");
                assert_eq!(character_class, "");
            }
            _ => panic!("expected join intent"),
        }
    }

    #[test]
    fn test_parse_join_ignores_unknown_fields() {
        let intent =
            parse_intent(r#"{"type":"join","playerName":"Ada","isAdmin":true,"hp":9999}"#)
                .unwrap();

        match intent {
            Intent::Join { player_name, .. } => assert_eq!(player_name, "Ada"),
            _ => panic!("expected join intent"),
        }
    }

    #[test]
    fn test_parse_move() {
        let intent = parse_intent(r#"{"type":"move","x":5,"y":-3.5,"anim":"WalkLeft"}"#).unwrap();

        assert_eq!(
            intent,
            Intent::Move {
                x: 5.0,
                y: -3.5,
                anim: "WalkLeft".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_move_wrong_typed_fields_degrade_to_defaults() {
        let intent = parse_intent(r#"{"type":"move","x":"fast","y":true,"anim":7}"#).unwrap();

        assert_eq!(
            intent,
            Intent::Move {
                x: 0.0,
                y: 0.0,
                anim: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_attack() {
        let intent = parse_intent(r#"{"type":"attack","direction":"Right"}"#).unwrap();

        assert_eq!(
            intent,
            Intent::Attack {
                direction: "Right".to_string()
            }
        );
    }

    #[test]
    fn test_parse_leave() {
        let intent = parse_intent(r#"{"type":"leave"}"#).unwrap();
        assert_eq!(intent, Intent::Leave);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(parse_intent("not json"), Err(ParseError::Json(_))));
        assert!(matches!(parse_intent(""), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            parse_intent("[1, 2, 3]"),
            Err(ParseError::NotAnObject)
        ));
    }

    #[test]
    fn test_parse_rejects_missing_or_invalid_type() {
        assert!(matches!(
            parse_intent(r#"{"x":1}"#),
            Err(ParseError::MissingType)
        ));
        assert!(matches!(
            parse_intent(r#"{"type":42}"#),
            Err(ParseError::MissingType)
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        match parse_intent(r#"{"type":"teleport","x":1,"y":2}"#) {
            Err(ParseError::UnknownType(kind)) => assert_eq!(kind, "teleport"),
            other => panic!("expected unknown type error, got {:?}", other),
        }
    }

    #[test]
    fn test_sync_packet_snapshot_wire_format() {
        let mut players = HashMap::new();
        players.insert("s1".to_string(), ada());

        let json = serde_json::to_value(SyncPacket::Snapshot { players }).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["players"]["s1"]["playerName"], "Ada");
    }

    #[test]
    fn test_sync_packet_diff_roundtrip() {
        let mut updated = HashMap::new();
        let mut player = ada();
        player.position_x = 5.0;
        player.position_y = -3.0;
        player.movement_animation = "WalkLeft".to_string();
        updated.insert("s1".to_string(), player);

        let packet = SyncPacket::Diff {
            entered: HashMap::new(),
            updated,
            left: vec!["s2".to_string()],
        };

        let text = serde_json::to_string(&packet).unwrap();
        let decoded: SyncPacket = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, packet);
    }
}
