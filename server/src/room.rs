//! Room lifecycle: wires the session registry, player store, dispatcher and
//! broadcaster together. The room owns no state of its own beyond that
//! wiring; the hosting layer drives it through the three hooks
//! (`on_session_open`, `on_session_close`, `on_message`) one event at a
//! time, which is what serializes all mutation of this room's state.

use crate::dispatch;
use crate::error::IntentError;
use crate::session::SessionRegistry;
use crate::store::PlayerStore;
use crate::sync::Broadcaster;
use log::{debug, info, warn};
use shared::{parse_intent, Intent, SessionId, SyncPacket};
use tokio::sync::mpsc::UnboundedSender;

pub const DEFAULT_MAX_SESSIONS: usize = 16;

#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub max_sessions: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

pub struct Room {
    registry: SessionRegistry,
    store: PlayerStore,
    broadcaster: Broadcaster,
}

impl Room {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            registry: SessionRegistry::new(config.max_sessions),
            store: PlayerStore::new(),
            broadcaster: Broadcaster::new(),
        }
    }

    /// Admits a connection. A session over capacity is refused and its
    /// channel dropped; an admitted session gets a full state snapshot as
    /// the base for subsequent diffs. No player record is created here.
    pub fn on_session_open(
        &mut self,
        session_id: SessionId,
        outbound: UnboundedSender<SyncPacket>,
    ) {
        if self.registry.is_full() {
            warn!("room full, refusing session {}", session_id);
            let _ = outbound.send(SyncPacket::Refused {
                reason: "room is full".to_string(),
            });
            return;
        }

        if !self.registry.open(session_id.clone(), outbound) {
            return;
        }

        if let Some(outbound) = self.registry.sender(&session_id) {
            let _ = outbound.send(self.broadcaster.snapshot(self.store.snapshot()));
        }
    }

    /// Retires a session and deletes its player record if one exists. Both
    /// consented and unconsented disconnects clean up identically; repeated
    /// closes are no-ops.
    pub fn on_session_close(&mut self, session_id: &str, consented: bool) {
        if self.registry.close(session_id) {
            debug!(
                "session {} disconnected (consented: {})",
                session_id, consented
            );
        }

        if self.store.remove(session_id).is_some() {
            self.broadcaster
                .broadcast(self.store.snapshot(), &self.registry);
        }
    }

    /// Decodes and applies one inbound message. Committed mutations are
    /// broadcast; dropped messages are logged and otherwise invisible.
    pub fn on_message(&mut self, session_id: &str, message: &str) {
        let intent = match parse_intent(message) {
            Ok(intent) => intent,
            Err(err) => {
                warn!("session {}: {}", session_id, IntentError::from(err));
                return;
            }
        };

        // A consented leave: the session's channel is dropped with its
        // registry entry, which closes the connection.
        if intent == Intent::Leave {
            self.on_session_close(session_id, true);
            return;
        }

        match dispatch::apply(&mut self.store, session_id, intent) {
            Ok(()) => {
                self.broadcaster
                    .broadcast(self.store.snapshot(), &self.registry);
            }
            Err(err) => debug!("session {}: intent dropped: {}", session_id, err),
        }
    }

    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    pub fn player_count(&self) -> usize {
        self.store.len()
    }

    /// True when no sessions are connected; the hosting layer uses this for
    /// its idle-room disposal policy.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Read-only view of the canonical player records.
    pub fn players(&self) -> &std::collections::HashMap<SessionId, shared::Player> {
        self.store.snapshot()
    }
}

impl Drop for Room {
    fn drop(&mut self) {
        info!(
            "room disposed ({} sessions, {} players)",
            self.registry.len(),
            self.store.len()
        );
    }
}
