//! Transport boundary: emit on a named channel, receive into a queue

use tokio::sync::mpsc;

use super::address::SessionId;
use super::protocol::Channel;

/// One received relay event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub channel: Channel,
    pub text: String,
}

/// Transport errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,

    #[error("cannot emit on inbound channel {0:?}")]
    NotOutbound(Channel),

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("send failed: {0}")]
    Send(String),
}

/// Outbound half of a relay connection.
///
/// Sends are fire-and-forget: callers log a failure and move on.
pub trait Transport: Send {
    fn emit(&self, channel: Channel, text: String) -> Result<(), TransportError>;

    /// Stop sending and stop delivering to the inbound queue
    fn close(&mut self);
}

/// An open connection: the sender plus the queue the relay fills
pub struct Connection {
    pub transport: Box<dyn Transport>,
    pub inbound: mpsc::UnboundedReceiver<Envelope>,
}

/// Opens connections bound to a session id
pub trait Connector: Send + Sync {
    fn connect(&self, session: SessionId) -> Result<Connection, TransportError>;
}
