//! Broadcast fan-out: push the current view to every subscriber.

use std::sync::Arc;
use std::time::Duration;

use barricade_protocol::GameId;
use barricade_transport::ConnectionId;

use crate::RoomRegistry;

/// Upper bound on one send before the connection is declared dead.
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Fans a rendered view out to every connection watching a game.
///
/// Broadcast is a side effect of a mutation, never part of its success
/// contract: every failure here is swallowed after pruning the dead
/// connection, and the mutation that triggered the notify never sees
/// it.
pub struct BroadcastCoordinator {
    registry: Arc<RoomRegistry>,
    send_timeout: Duration,
}

impl BroadcastCoordinator {
    /// Creates a coordinator over the given registry.
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self {
            registry,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Overrides the per-send timeout.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// The registry this coordinator consults and prunes.
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Pushes `payload` (the already-rendered current view) to every
    /// subscriber of `game`.
    ///
    /// Each connection gets its own task with a bounded send, so one
    /// slow or dead client never delays the rest of the room. Sends
    /// that fail, time out, or hit a closed sink get the connection
    /// unsubscribed. Zero subscribers is a normal, silent case.
    pub async fn notify(&self, game: GameId, payload: &str) {
        let sinks = self.registry.connections_for(game).await;
        if sinks.is_empty() {
            tracing::trace!(%game, "no subscribers, skipping broadcast");
            return;
        }

        let payload: Arc<str> = Arc::from(payload);
        let mut tasks = Vec::with_capacity(sinks.len());

        for sink in sinks {
            let payload = Arc::clone(&payload);
            let timeout = self.send_timeout;
            tasks.push(tokio::spawn(async move {
                deliver(&*sink, &payload, timeout).await
            }));
        }

        // The sends themselves already ran concurrently; this loop only
        // collects their verdicts and prunes the casualties.
        for task in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(dead)) => self.registry.unsubscribe(game, dead).await,
                Err(e) => {
                    tracing::error!(%game, error = %e, "broadcast task failed")
                }
            }
        }
    }
}

/// One bounded send. `Err` carries the id of a connection to prune.
async fn deliver(
    sink: &dyn barricade_transport::ClientSink,
    payload: &str,
    timeout: Duration,
) -> Result<(), ConnectionId> {
    let id = sink.id();
    if !sink.is_open() {
        tracing::debug!(connection = %id, "sink already closed, pruning");
        return Err(id);
    }

    match tokio::time::timeout(timeout, sink.send(payload)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            tracing::warn!(connection = %id, error = %e, "send failed, pruning");
            Err(id)
        }
        Err(_) => {
            tracing::warn!(connection = %id, "send timed out, pruning");
            Err(id)
        }
    }
}
