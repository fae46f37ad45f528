//! Error types for the room core.
//!
//! None of these surface to clients: every variant is a diagnostic for the
//! silent-drop policy. A hostile or buggy client must never be able to crash
//! the room or corrupt another player's record, so invalid intents are
//! logged and discarded rather than answered or propagated.

use shared::ParseError;
use thiserror::Error;

/// Failures of the player state store's existence invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A record already exists for the session (first join wins).
    #[error("player record already exists for session {0}")]
    AlreadyExists(String),

    /// No record exists for the session; mutations never create one.
    #[error("no player record for session {0}")]
    NotFound(String),
}

/// Reasons an inbound intent was dropped.
#[derive(Debug, Error)]
pub enum IntentError {
    /// A second join from an already-joined session.
    #[error("duplicate join from session {0}")]
    AlreadyJoined(String),

    /// A move/attack from a session with no player record.
    #[error("{intent} from session {session} with no player record")]
    UnknownSession {
        intent: &'static str,
        session: String,
    },

    /// The message could not be decoded at all.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] ParseError),
}
