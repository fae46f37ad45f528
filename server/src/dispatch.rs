//! Routes decoded intents to the player state store.
//!
//! Every handler is a synchronous, non-blocking transformation; the room's
//! event loop guarantees no two intents for the same room interleave. A
//! returned error means the intent was dropped without touching any state.
//! Callers log it and move on; nothing reaches the client.

use crate::error::IntentError;
use crate::store::PlayerStore;
use shared::{Intent, Player, ATTACK_ANIMATION_PREFIX};

/// Applies one intent. `Ok` means a mutation was committed and must be
/// broadcast; `Err` means the intent was dropped.
pub fn apply(store: &mut PlayerStore, session_id: &str, intent: Intent) -> Result<(), IntentError> {
    match intent {
        Intent::Join {
            email,
            player_name,
            character_id,
            character_name,
            character_class,
        } => {
            let player = Player::new(
                email,
                player_name,
                character_id,
                character_name,
                character_class,
            );
            store
                .create(session_id, player)
                .map_err(|_| IntentError::AlreadyJoined(session_id.to_string()))
        }
        Intent::Move { x, y, anim } => store
            .update(session_id, |player| {
                // Coordinates are accepted verbatim; gameplay validation
                // happens upstream of the room.
                player.position_x = x;
                player.position_y = y;
                player.movement_animation = anim;
            })
            .map_err(|_| IntentError::UnknownSession {
                intent: "move",
                session: session_id.to_string(),
            }),
        Intent::Attack { direction } => store
            .update(session_id, |player| {
                player.movement_animation = format!("{}{}", ATTACK_ANIMATION_PREFIX, direction);
            })
            .map_err(|_| IntentError::UnknownSession {
                intent: "attack",
                session: session_id.to_string(),
            }),
        // Leave is a session lifecycle event; the room intercepts it before
        // dispatch ever sees it.
        Intent::Leave => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::IDLE_ANIMATION;

    fn join_intent(name: &str) -> Intent {
        Intent::Join {
            email: format!("{}@example.com", name.to_lowercase()),
            player_name: name.to_string(),
            character_id: "c-1".to_string(),
            character_name: name.to_string(),
            character_class: "Knight".to_string(),
        }
    }

    #[test]
    fn test_join_creates_record_with_defaults() {
        let mut store = PlayerStore::new();

        apply(&mut store, "s1", join_intent("Ada")).unwrap();

        let record = &store.snapshot()["s1"];
        assert_eq!(record.player_name, "Ada");
        assert_eq!((record.position_x, record.position_y), (0.0, 0.0));
        assert_eq!(record.movement_animation, IDLE_ANIMATION);
    }

    #[test]
    fn test_second_join_is_dropped() {
        let mut store = PlayerStore::new();
        apply(&mut store, "s1", join_intent("Ada")).unwrap();

        let err = apply(&mut store, "s1", join_intent("Eve")).unwrap_err();

        assert!(matches!(err, IntentError::AlreadyJoined(id) if id == "s1"));
        assert_eq!(store.snapshot()["s1"].player_name, "Ada");
    }

    #[test]
    fn test_move_updates_position_and_animation() {
        let mut store = PlayerStore::new();
        apply(&mut store, "s1", join_intent("Ada")).unwrap();

        apply(
            &mut store,
            "s1",
            Intent::Move {
                x: 5.0,
                y: -3.0,
                anim: "WalkLeft".to_string(),
            },
        )
        .unwrap();

        let record = &store.snapshot()["s1"];
        assert_eq!((record.position_x, record.position_y), (5.0, -3.0));
        assert_eq!(record.movement_animation, "WalkLeft");
    }

    #[test]
    fn test_move_accepts_out_of_range_coordinates() {
        let mut store = PlayerStore::new();
        apply(&mut store, "s1", join_intent("Ada")).unwrap();

        apply(
            &mut store,
            "s1",
            Intent::Move {
                x: -1.0e9,
                y: f32::MAX,
                anim: "WalkRight".to_string(),
            },
        )
        .unwrap();

        let record = &store.snapshot()["s1"];
        assert_eq!(record.position_x, -1.0e9);
        assert_eq!(record.position_y, f32::MAX);
    }

    #[test]
    fn test_move_is_idempotent() {
        let mut store = PlayerStore::new();
        apply(&mut store, "s1", join_intent("Ada")).unwrap();
        let mv = Intent::Move {
            x: 5.0,
            y: -3.0,
            anim: "WalkLeft".to_string(),
        };

        apply(&mut store, "s1", mv.clone()).unwrap();
        let once = store.snapshot()["s1"].clone();

        apply(&mut store, "s1", mv).unwrap();
        assert_eq!(store.snapshot()["s1"], once);
    }

    #[test]
    fn test_move_without_join_never_creates_record() {
        let mut store = PlayerStore::new();

        let err = apply(
            &mut store,
            "s2",
            Intent::Move {
                x: 1.0,
                y: 1.0,
                anim: IDLE_ANIMATION.to_string(),
            },
        )
        .unwrap_err();

        assert!(matches!(
            err,
            IntentError::UnknownSession { intent: "move", .. }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_attack_composes_animation_and_keeps_position() {
        let mut store = PlayerStore::new();
        apply(&mut store, "s1", join_intent("Ada")).unwrap();
        apply(
            &mut store,
            "s1",
            Intent::Move {
                x: 5.0,
                y: -3.0,
                anim: "WalkLeft".to_string(),
            },
        )
        .unwrap();

        apply(
            &mut store,
            "s1",
            Intent::Attack {
                direction: "Right".to_string(),
            },
        )
        .unwrap();

        let record = &store.snapshot()["s1"];
        assert_eq!(record.movement_animation, "Attack_Right");
        assert_eq!((record.position_x, record.position_y), (5.0, -3.0));
    }

    #[test]
    fn test_attack_without_join_is_dropped() {
        let mut store = PlayerStore::new();

        let err = apply(
            &mut store,
            "s2",
            Intent::Attack {
                direction: "Left".to_string(),
            },
        )
        .unwrap_err();

        assert!(matches!(
            err,
            IntentError::UnknownSession {
                intent: "attack",
                ..
            }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_intent_only_touches_its_own_record() {
        let mut store = PlayerStore::new();
        apply(&mut store, "s1", join_intent("Ada")).unwrap();
        apply(&mut store, "s2", join_intent("Bob")).unwrap();

        apply(
            &mut store,
            "s1",
            Intent::Move {
                x: 9.0,
                y: 9.0,
                anim: "WalkUp".to_string(),
            },
        )
        .unwrap();

        let other = &store.snapshot()["s2"];
        assert_eq!((other.position_x, other.position_y), (0.0, 0.0));
        assert_eq!(other.movement_animation, IDLE_ANIMATION);
    }
}
