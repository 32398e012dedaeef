//! WebSocket push channels using `tokio-tungstenite`.
//!
//! Each accepted connection is split in two: a [`WebSocketSink`] (the
//! push half handed to the registry) and a [`WebSocketReceiver`] (the
//! read half the server drains for the subscribe frame and close
//! detection). The halves share an open flag so a close seen by the
//! reader immediately marks the sink dead.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

use crate::{ClientSink, ConnectionId, SinkError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

/// Listens for incoming WebSocket connections.
pub struct WebSocketListener {
    listener: TcpListener,
}

impl WebSocketListener {
    /// Binds a new listener to the given address.
    pub async fn bind(addr: &str) -> Result<Self, SinkError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(SinkError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket listener bound");
        Ok(Self { listener })
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts the next connection and splits it into push and read halves.
    pub async fn accept(
        &self,
    ) -> Result<(Arc<WebSocketSink>, WebSocketReceiver), SinkError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(SinkError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
            SinkError::AcceptFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;

        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        let (writer, reader) = ws.split();
        let open = Arc::new(AtomicBool::new(true));

        let sink = Arc::new(WebSocketSink {
            id,
            writer: Mutex::new(writer),
            open: Arc::clone(&open),
        });
        let receiver = WebSocketReceiver { id, reader, open };

        Ok((sink, receiver))
    }
}

/// The push half of a WebSocket connection.
pub struct WebSocketSink {
    id: ConnectionId,
    writer: Mutex<SplitSink<WsStream, Message>>,
    open: Arc<AtomicBool>,
}

#[async_trait]
impl ClientSink for WebSocketSink {
    async fn send(&self, payload: &str) -> Result<(), SinkError> {
        if !self.is_open() {
            return Err(SinkError::Closed);
        }
        let msg = Message::Text(payload.to_owned().into());
        self.writer.lock().await.send(msg).await.map_err(|e| {
            self.open.store(false, Ordering::Relaxed);
            SinkError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// The read half of a WebSocket connection.
///
/// The server only ever expects one meaningful inbound frame (the
/// subscribe message); after that this half exists to notice the close.
pub struct WebSocketReceiver {
    id: ConnectionId,
    reader: SplitStream<WsStream>,
    open: Arc<AtomicBool>,
}

impl WebSocketReceiver {
    /// Waits for the next text frame from the client.
    ///
    /// Returns `Ok(None)` on a clean close. Ping/pong and non-UTF-8
    /// binary frames are skipped.
    pub async fn next_text(&mut self) -> Result<Option<String>, SinkError> {
        loop {
            match self.reader.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.to_string()));
                }
                Some(Ok(Message::Binary(data))) => {
                    match String::from_utf8(Vec::from(data)) {
                        Ok(text) => return Ok(Some(text)),
                        Err(_) => continue,
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    self.open.store(false, Ordering::Relaxed);
                    return Ok(None);
                }
                Some(Ok(_)) => continue, // ping/pong/frame
                Some(Err(e)) => {
                    self.open.store(false, Ordering::Relaxed);
                    return Err(SinkError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    /// The identifier shared with the matching sink.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}
