//! Canonical player state, one record per joined session.
//!
//! The store is the single source of truth for the room: an owned,
//! single-writer table indexed by session id. All writes go through the
//! explicit `create`/`update`/`remove` operations, which enforce the
//! existence invariants. A record only ever comes from a committed join;
//! mutations require an existing record and never create one implicitly.

use crate::error::StoreError;
use log::info;
use shared::{Player, SessionId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PlayerStore {
    players: HashMap<SessionId, Player>,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
        }
    }

    /// Commits a new player record. First join wins: an existing record is
    /// left untouched and the call fails.
    pub fn create(&mut self, session_id: &str, player: Player) -> Result<(), StoreError> {
        if self.players.contains_key(session_id) {
            return Err(StoreError::AlreadyExists(session_id.to_string()));
        }

        info!(
            "player {:?} joined as session {}",
            player.player_name, session_id
        );
        self.players.insert(session_id.to_string(), player);
        Ok(())
    }

    /// Mutates an existing record in place. Fails without side effects when
    /// no record exists; a mutation never creates one.
    pub fn update(
        &mut self,
        session_id: &str,
        mutate: impl FnOnce(&mut Player),
    ) -> Result<(), StoreError> {
        match self.players.get_mut(session_id) {
            Some(player) => {
                mutate(player);
                Ok(())
            }
            None => Err(StoreError::NotFound(session_id.to_string())),
        }
    }

    /// Deletes the record for a session, returning it if one existed.
    /// Removing an absent record is a no-op.
    pub fn remove(&mut self, session_id: &str) -> Option<Player> {
        let removed = self.players.remove(session_id);
        if let Some(player) = &removed {
            info!(
                "player {:?} removed with session {}",
                player.player_name, session_id
            );
        }
        removed
    }

    /// Read-only view of all records.
    pub fn snapshot(&self) -> &HashMap<SessionId, Player> {
        &self.players
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.players.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
