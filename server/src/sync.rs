//! State synchronization to connected sessions.
//!
//! After every committed mutation the broadcaster compares the store against
//! the last transmitted state and pushes the difference to every open
//! session's outbound channel. A session that just opened receives one full
//! snapshot as its base, so the diffs that follow always apply cleanly.
//!
//! Ordering: the room processes one event at a time and each outbound
//! channel is FIFO, so no session ever observes a later commit before an
//! earlier one.

use crate::session::SessionRegistry;
use log::debug;
use shared::{Player, SessionId, SyncPacket};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Broadcaster {
    /// State as of the last transmitted diff.
    last: HashMap<SessionId, Player>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            last: HashMap::new(),
        }
    }

    /// Full state for a newly opened session.
    pub fn snapshot(&self, players: &HashMap<SessionId, Player>) -> SyncPacket {
        SyncPacket::Snapshot {
            players: players.clone(),
        }
    }

    /// Change between the last transmitted state and `players`, or `None`
    /// when nothing observable changed.
    pub fn diff(&self, players: &HashMap<SessionId, Player>) -> Option<SyncPacket> {
        let mut entered = HashMap::new();
        let mut updated = HashMap::new();

        for (id, player) in players {
            match self.last.get(id) {
                None => {
                    entered.insert(id.clone(), player.clone());
                }
                Some(previous) if previous != player => {
                    updated.insert(id.clone(), player.clone());
                }
                Some(_) => {}
            }
        }

        let left: Vec<SessionId> = self
            .last
            .keys()
            .filter(|id| !players.contains_key(*id))
            .cloned()
            .collect();

        if entered.is_empty() && updated.is_empty() && left.is_empty() {
            return None;
        }

        Some(SyncPacket::Diff {
            entered,
            updated,
            left,
        })
    }

    /// Transmits the pending diff to every open session and records the
    /// transmitted state. Returns true if anything was sent.
    pub fn broadcast(
        &mut self,
        players: &HashMap<SessionId, Player>,
        registry: &SessionRegistry,
    ) -> bool {
        let Some(packet) = self.diff(players) else {
            return false;
        };

        for (session_id, outbound) in registry.channels() {
            if outbound.send(packet.clone()).is_err() {
                debug!("session {}: outbound channel closed", session_id);
            }
        }

        self.last = players.clone();
        true
    }
}
