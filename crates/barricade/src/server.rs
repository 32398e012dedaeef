//! `BarricadeServer` builder and accept loop.
//!
//! Connections here are push channels, not request channels: a client
//! sends exactly one meaningful frame (the id of the game it wants to
//! watch) and from then on only receives. Mutations arrive through the
//! [`GameHub`] handle, which the embedding application drives.

use std::sync::Arc;
use std::time::Duration;

use barricade_protocol::{Codec, GameId, JsonCodec};
use barricade_transport::{
    ClientSink, WebSocketListener, WebSocketReceiver, WebSocketSink,
};
use serde::Serialize;

use crate::{BarricadeError, GameHub};

/// How long a freshly accepted connection gets to name its game.
const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Reply to a successful subscribe frame.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeAck {
    subscribed: bool,
    game_id: GameId,
}

/// Error frame sent before giving up on a connection.
#[derive(Serialize)]
struct WireError {
    error: String,
}

/// Builder for configuring and starting a Barricade server.
///
/// # Example
///
/// ```rust,ignore
/// let server = BarricadeServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// let hub = server.hub();
/// server.run().await
/// ```
pub struct BarricadeServerBuilder {
    bind_addr: String,
    send_timeout: Option<Duration>,
}

impl BarricadeServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            send_timeout: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the per-send broadcast timeout.
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<BarricadeServer, BarricadeError> {
        let listener = WebSocketListener::bind(&self.bind_addr).await?;

        let mut hub = GameHub::new();
        if let Some(timeout) = self.send_timeout {
            hub = hub.with_send_timeout(timeout);
        }

        Ok(BarricadeServer {
            listener,
            hub: Arc::new(hub),
        })
    }
}

impl Default for BarricadeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Barricade server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct BarricadeServer {
    listener: WebSocketListener,
    hub: Arc<GameHub>,
}

impl BarricadeServer {
    /// Creates a new builder.
    pub fn builder() -> BarricadeServerBuilder {
        BarricadeServerBuilder::new()
    }

    /// A handle for driving mutations while the server runs.
    pub fn hub(&self) -> Arc<GameHub> {
        Arc::clone(&self.hub)
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Each accepted connection gets its own task that performs the
    /// subscribe handshake and then idles until the client goes away.
    /// Runs until the process is terminated.
    pub async fn run(self) -> Result<(), BarricadeError> {
        tracing::info!("Barricade server running");

        loop {
            match self.listener.accept().await {
                Ok((sink, receiver)) => {
                    let hub = Arc::clone(&self.hub);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(hub, sink, receiver).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Handles a single connection from accept to close.
async fn handle_connection(
    hub: Arc<GameHub>,
    sink: Arc<WebSocketSink>,
    mut receiver: WebSocketReceiver,
) -> Result<(), BarricadeError> {
    let conn_id = sink.id();
    tracing::debug!(connection = %conn_id, "handling new connection");

    let codec = JsonCodec;

    // --- Step 1: subscribe frame ---
    let frame = match tokio::time::timeout(
        SUBSCRIBE_TIMEOUT,
        receiver.next_text(),
    )
    .await
    {
        Ok(Ok(Some(text))) => text,
        Ok(Ok(None)) => {
            tracing::debug!(connection = %conn_id, "closed before subscribing");
            return Ok(());
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            send_error(&*sink, &codec, "subscribe timed out").await?;
            return Ok(());
        }
    };

    let game = match frame.trim().parse::<u64>() {
        Ok(id) => GameId(id),
        Err(_) => {
            send_error(&*sink, &codec, "expected a game id").await?;
            return Ok(());
        }
    };

    let as_sink: Arc<dyn ClientSink> = Arc::clone(&sink) as Arc<dyn ClientSink>;
    let view = match hub.attach(game, &as_sink).await {
        Ok(view) => view,
        Err(e) => {
            send_error(&*sink, &codec, &e.to_string()).await?;
            return Ok(());
        }
    };

    tracing::info!(connection = %conn_id, %game, "connection subscribed");

    // Ack first, then the baseline view; every later frame the client
    // receives comes from the broadcast path.
    let ack = codec.encode(&SubscribeAck {
        subscribed: true,
        game_id: game,
    })?;
    sink.send(&ack).await?;
    let baseline = codec.encode(&view)?;
    sink.send(&baseline).await?;

    // --- Step 2: drain until close ---
    loop {
        match receiver.next_text().await {
            Ok(Some(_)) => {
                tracing::trace!(connection = %conn_id, "ignoring client frame");
            }
            Ok(None) => {
                tracing::debug!(connection = %conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(connection = %conn_id, error = %e, "receive error");
                break;
            }
        }
    }

    hub.detach(conn_id).await;
    Ok(())
}

/// Sends a `WireError` frame; best effort before the handler returns.
async fn send_error(
    sink: &dyn ClientSink,
    codec: &JsonCodec,
    message: &str,
) -> Result<(), BarricadeError> {
    let text = codec.encode(&WireError {
        error: message.to_string(),
    })?;
    sink.send(&text).await?;
    Ok(())
}
