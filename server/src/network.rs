//! Server network layer: accepts connections and funnels their events into
//! the room.
//!
//! One reliable, ordered message channel per client: TCP with one JSON
//! message per line. Each connection gets a generated session id, a reader
//! half that forwards inbound lines, and a writer half that drains the
//! session's outbound packet queue. Every open/close/message event goes
//! through a single mpsc channel into the loop that owns the [`Room`], so
//! all mutation of the room's state is serialized without locks.

use crate::room::{Room, RoomConfig};
use log::{debug, error, info};
use rand::distributions::Alphanumeric;
use rand::Rng;
use shared::{SessionId, SyncPacket};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Session id length, enough to never collide within a room's lifetime.
const SESSION_ID_LEN: usize = 9;

/// Events delivered from connection tasks to the room loop.
#[derive(Debug)]
pub enum RoomEvent {
    SessionOpen {
        session_id: SessionId,
        outbound: UnboundedSender<SyncPacket>,
    },
    SessionClose {
        session_id: SessionId,
        consented: bool,
    },
    Message {
        session_id: SessionId,
        message: String,
    },
}

/// Hosts one room behind a TCP listener.
pub struct Server {
    listener: TcpListener,
    room: Room,
    events_tx: UnboundedSender<RoomEvent>,
    events_rx: UnboundedReceiver<RoomEvent>,
}

impl Server {
    pub async fn new(addr: &str, config: RoomConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        info!("server listening on {}", listener.local_addr()?);

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            room: Room::new(config),
            events_tx,
            events_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop and room loop in one task. Connection I/O runs in
    /// spawned tasks; the room itself is only ever touched here.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let events = self.events_tx.clone();
                            tokio::spawn(async move {
                                handle_connection(stream, peer, events).await;
                            });
                        }
                        Err(e) => {
                            error!("accept failed: {}", e);
                        }
                    }
                },

                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        // All senders gone; nothing can reach the room anymore.
                        None => break,
                    }
                },
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::SessionOpen {
                session_id,
                outbound,
            } => self.room.on_session_open(session_id, outbound),
            RoomEvent::SessionClose {
                session_id,
                consented,
            } => self.room.on_session_close(&session_id, consented),
            RoomEvent::Message {
                session_id,
                message,
            } => self.room.on_message(&session_id, &message),
        }
    }
}

/// Drives one connection: forwards inbound lines to the room and writes
/// queued outbound packets, until either side goes away. The room signals
/// that it is done with this session (refusal or consented leave) by
/// dropping the outbound channel.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    events: UnboundedSender<RoomEvent>,
) {
    let session_id = generate_session_id();
    debug!("connection from {} as session {}", peer, session_id);

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    if events
        .send(RoomEvent::SessionOpen {
            session_id: session_id.clone(),
            outbound: outbound_tx,
        })
        .is_err()
    {
        return;
    }

    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(packet) => {
                        if write_packet(&mut writer, &packet).await.is_err() {
                            break;
                        }
                    }
                    // Session retired by the room; flushing is done.
                    None => break,
                }
            },

            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if events
                            .send(RoomEvent::Message {
                                session_id: session_id.clone(),
                                message: line,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        debug!("session {} ({}): read failed: {}", session_id, peer, e);
                        break;
                    }
                }
            },
        }
    }

    let _ = events.send(RoomEvent::SessionClose {
        session_id,
        consented: false,
    });
}

async fn write_packet(writer: &mut OwnedWriteHalf, packet: &SyncPacket) -> std::io::Result<()> {
    let mut text = serde_json::to_string(packet)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    text.push('\n');
    writer.write_all(text.as_bytes()).await
}

fn generate_session_id() -> SessionId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
