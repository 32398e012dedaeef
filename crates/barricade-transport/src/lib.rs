//! Push-channel abstraction for Barricade.
//!
//! A client opens a persistent connection, names the game it wants to
//! follow, and from then on only ever *receives*: every mutation of that
//! game is pushed down the channel as rendered text. [`ClientSink`] is
//! that push side, abstracted so the registry and broadcast layers never
//! see a socket.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket channels via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::SinkError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketListener, WebSocketReceiver, WebSocketSink};

use std::fmt;

use async_trait::async_trait;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// The push side of one live client channel.
///
/// The transport layer owns the sink; everything above it holds
/// non-owning references and treats any send failure as "this client is
/// gone". The trait is dyn-compatible (`async_trait`) because the
/// registry stores type-erased sinks for mixed transports.
#[async_trait]
pub trait ClientSink: Send + Sync + 'static {
    /// Pushes rendered text to the remote client.
    ///
    /// # Errors
    /// Returns [`SinkError`] when the channel is closed or the write
    /// fails; callers treat either as a dead connection.
    async fn send(&self, payload: &str) -> Result<(), SinkError>;

    /// Whether the channel is still believed open.
    ///
    /// Best-effort: a sink can die between this check and the next
    /// `send`, which is why `send` failures are the real signal.
    fn is_open(&self) -> bool;

    /// The unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "alice");
        map.insert(ConnectionId::new(2), "bob");
        assert_eq!(map[&ConnectionId::new(1)], "alice");
    }
}
