//! In-process relay connecting peers of the same session

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use super::address::SessionId;
use super::protocol::Channel;
use super::transport::{Connection, Connector, Envelope, Transport, TransportError};

struct Peer {
    id: u64,
    tx: mpsc::UnboundedSender<Envelope>,
}

/// Relays each outbound event to every other peer in the same session room
#[derive(Clone, Default)]
pub struct LoopbackRelay {
    rooms: Arc<DashMap<SessionId, Vec<Peer>>>,
    next_peer: Arc<AtomicU64>,
}

impl LoopbackRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open connections in a session
    pub fn peer_count(&self, session: SessionId) -> usize {
        self.rooms.get(&session).map(|room| room.len()).unwrap_or(0)
    }

    fn leave(&self, session: SessionId, peer_id: u64) {
        if let Some(mut room) = self.rooms.get_mut(&session) {
            room.retain(|p| p.id != peer_id);
        }
        self.rooms.remove_if(&session, |_, room| room.is_empty());
    }
}

impl Connector for LoopbackRelay {
    fn connect(&self, session: SessionId) -> Result<Connection, TransportError> {
        let (tx, inbound) = mpsc::unbounded_channel();
        let peer_id = self.next_peer.fetch_add(1, Ordering::Relaxed);

        self.rooms
            .entry(session)
            .or_default()
            .push(Peer { id: peer_id, tx });

        debug!(session_id = %session, peer_id, query = %session.query(), "Loopback peer connected");

        Ok(Connection {
            transport: Box::new(LoopbackTransport {
                relay: self.clone(),
                session,
                peer_id,
                closed: false,
            }),
            inbound,
        })
    }
}

/// One peer's handle on the loopback relay
pub struct LoopbackTransport {
    relay: LoopbackRelay,
    session: SessionId,
    peer_id: u64,
    closed: bool,
}

impl Transport for LoopbackTransport {
    fn emit(&self, channel: Channel, text: String) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let relayed = channel.relayed().ok_or(TransportError::NotOutbound(channel))?;

        if let Some(room) = self.relay.rooms.get(&self.session) {
            for peer in room.iter().filter(|p| p.id != self.peer_id) {
                // A peer whose queue is gone is simply not listening any more
                let _ = peer.tx.send(Envelope {
                    channel: relayed,
                    text: text.clone(),
                });
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.relay.leave(self.session, self.peer_id);
            debug!(session_id = %self.session, peer_id = self.peer_id, "Loopback peer closed");
        }
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        self.close();
    }
}
