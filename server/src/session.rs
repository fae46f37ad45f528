//! Session bookkeeping for the room.
//!
//! The registry tracks which connections are live and holds the outbound
//! channel for each, so committed state changes can be fanned out. It does
//! not touch player state: opening a session is bookkeeping only, and a
//! player record appears only once that session sends a join intent.
//!
//! Session ids are assigned by the transport layer, unique and stable for
//! the connection's lifetime; the registry never recycles them itself.

use log::{debug, info};
use shared::{SessionId, SyncPacket};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;

/// One live connection: its outbound packet channel and open time.
#[derive(Debug)]
pub struct Session {
    pub outbound: UnboundedSender<SyncPacket>,
    pub opened_at: Instant,
}

/// Tracks live sessions and enforces the room's capacity limit.
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            max_sessions,
        }
    }

    /// Records a newly opened session. Returns false without side effects
    /// if the id is already registered (first open wins); opening is
    /// idempotent bookkeeping, never an error.
    pub fn open(&mut self, session_id: SessionId, outbound: UnboundedSender<SyncPacket>) -> bool {
        if self.sessions.contains_key(&session_id) {
            debug!("session {} already open, keeping first entry", session_id);
            return false;
        }

        info!("session {} opened", session_id);
        self.sessions.insert(
            session_id,
            Session {
                outbound,
                opened_at: Instant::now(),
            },
        );
        true
    }

    /// Retires a session. Returns true if it was present; a repeated close
    /// is a no-op.
    pub fn close(&mut self, session_id: &str) -> bool {
        match self.sessions.remove(session_id) {
            Some(session) => {
                info!(
                    "session {} closed after {:?}",
                    session_id,
                    session.opened_at.elapsed()
                );
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Outbound channel for one session, if it is still open.
    pub fn sender(&self, session_id: &str) -> Option<&UnboundedSender<SyncPacket>> {
        self.sessions.get(session_id).map(|session| &session.outbound)
    }

    /// All open sessions and their outbound channels, for broadcasting.
    pub fn channels(&self) -> impl Iterator<Item = (&SessionId, &UnboundedSender<SyncPacket>)> {
        self.sessions
            .iter()
            .map(|(id, session)| (id, &session.outbound))
    }

    pub fn is_full(&self) -> bool {
        self.sessions.len() >= self.max_sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
