//! Multiplayer networking: addressing, wire protocol, transports, session flows

pub mod address;
pub mod loopback;
pub mod protocol;
pub mod session;
pub mod transport;

pub use address::{SessionId, SessionIdError};
pub use loopback::LoopbackRelay;
pub use session::ActiveSession;
pub use transport::{Connection, Connector, Envelope, Transport, TransportError};
