//! # Room Server Library
//!
//! Authoritative server core for a real-time multiplayer world. One room
//! instance holds the canonical player state and applies client-issued
//! intents as state transitions, streaming the resulting changes to every
//! connected session so all clients render a consistent view.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! The room owns the only copy of the players table. Clients never mutate
//! state directly: they send intents (`join`, `move`, `attack`) and receive
//! the committed result back, the same as everyone else.
//!
//! ### Session Lifecycle
//! The transport layer assigns each connection an opaque session id and
//! reports `open` and `close` events. Opening a session is bookkeeping only;
//! a player record exists exactly between a committed join intent and the
//! session's disconnect.
//!
//! ### Defensive Intent Handling
//! A hostile or buggy client cannot crash the room or corrupt another
//! player's record. Invalid traffic (a duplicate join, a mutation from an
//! unjoined session, a malformed payload) is dropped with a diagnostic log
//! line, and payload fields are read through an allow-list with typed
//! defaults rather than copied blindly.
//!
//! ### State Broadcasting
//! Every committed mutation is pushed to all connected sessions as an
//! incremental diff against the last transmitted state; a newly opened
//! session receives one full snapshot as its base. Per-session channels are
//! FIFO, so observers see commits in commit order.
//!
//! ## Architecture
//!
//! All room events (session open, session close, inbound message) funnel
//! through one channel into a single event loop that owns the [`room::Room`].
//! That loop processes one event at a time, which serializes all mutation of
//! the room's state without locks. Connection I/O runs in separate tasks and
//! only ever communicates through channels. Handlers themselves never block
//! or suspend; intents either apply instantly or are dropped.
//!
//! Multiple rooms hosted in one process would be fully independent: each is
//! its own event loop with no shared state.
//!
//! ## Module Organization
//!
//! - [`session`]: registry of live connections and their outbound channels
//! - [`store`]: canonical player records, keyed by session id
//! - [`dispatch`]: routes decoded intents to store mutations
//! - [`sync`]: diff/snapshot computation and fan-out
//! - [`room`]: lifecycle wiring of the four components above
//! - [`network`]: TCP listener, per-connection tasks, the room event loop
//! - [`error`]: internal drop-reason and store-invariant error types
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//! use server::room::RoomConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new("127.0.0.1:9000", RoomConfig::default()).await?;
//!
//!     // Runs the accept loop and the room event loop until shutdown:
//!     // - assigns a session id per connection and opens the session
//!     // - decodes and applies inbound intents, one at a time
//!     // - broadcasts each committed change to all sessions
//!     // - cleans up player records on disconnect
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod network;
pub mod room;
pub mod session;
pub mod store;
pub mod sync;
