//! Room registry: tracks which connections are subscribed to which game.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use barricade_protocol::GameId;
use barricade_transport::{ClientSink, ConnectionId};
use tokio::sync::RwLock;

/// Game id → set of live connections, plus the reverse index.
///
/// A connection belongs to at most one game's set at a time (a client
/// subscribes to exactly one game per session); subscribing it to a
/// second game re-homes it. Duplicate subscribes are idempotent and
/// unsubscribing an absent connection is a no-op.
///
/// Sinks are stored as `Weak` references — the transport owns them, and
/// a sink dropped by the transport simply stops appearing in snapshots.
/// All locking is internal and never held across a send: readers get a
/// point-in-time snapshot that may be stale by the time it is iterated.
pub struct RoomRegistry {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    rooms: HashMap<GameId, HashMap<ConnectionId, Weak<dyn ClientSink>>>,
    /// Reverse index enforcing the one-game-per-connection invariant.
    memberships: HashMap<ConnectionId, GameId>,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Adds a connection to a game's subscriber set.
    ///
    /// Idempotent for a connection already watching `game`; a
    /// connection currently watching a *different* game is moved.
    pub async fn subscribe(&self, game: GameId, sink: &Arc<dyn ClientSink>) {
        let id = sink.id();
        let mut inner = self.inner.write().await;

        if let Some(previous) = inner.memberships.get(&id).copied() {
            if previous == game {
                // Refresh the weak ref in place; nothing else to do.
                inner
                    .rooms
                    .entry(game)
                    .or_default()
                    .insert(id, Arc::downgrade(sink));
                return;
            }
            remove_from_room(&mut inner, previous, id);
            tracing::debug!(%id, from = %previous, to = %game, "connection re-homed");
        }

        inner
            .rooms
            .entry(game)
            .or_default()
            .insert(id, Arc::downgrade(sink));
        inner.memberships.insert(id, game);
        tracing::info!(%game, connection = %id, "connection subscribed");
    }

    /// Removes a connection from a game's subscriber set.
    ///
    /// No-op when the connection is not subscribed there. Called by the
    /// transport on disconnect/error/timeout and by the coordinator
    /// when a send fails — the registry never detects liveness itself.
    pub async fn unsubscribe(&self, game: GameId, id: ConnectionId) {
        let mut inner = self.inner.write().await;
        if inner.memberships.get(&id) != Some(&game) {
            return;
        }
        remove_from_room(&mut inner, game, id);
        inner.memberships.remove(&id);
        tracing::info!(%game, connection = %id, "connection unsubscribed");
    }

    /// Removes a connection wherever it is subscribed, if anywhere.
    ///
    /// Convenience for the transport close path, which knows the
    /// connection but not the game.
    pub async fn remove(&self, id: ConnectionId) {
        let game = { self.inner.read().await.memberships.get(&id).copied() };
        if let Some(game) = game {
            self.unsubscribe(game, id).await;
        }
    }

    /// Snapshot of the live connections currently watching `game`.
    ///
    /// Unknown games yield an empty vec, never an error. Sinks whose
    /// owner has dropped them are skipped and their entries pruned.
    pub async fn connections_for(
        &self,
        game: GameId,
    ) -> Vec<Arc<dyn ClientSink>> {
        let (sinks, dead) = {
            let inner = self.inner.read().await;
            let Some(room) = inner.rooms.get(&game) else {
                return Vec::new();
            };

            let mut sinks = Vec::with_capacity(room.len());
            let mut dead = Vec::new();
            for (id, weak) in room {
                match weak.upgrade() {
                    Some(sink) => sinks.push(sink),
                    None => dead.push(*id),
                }
            }
            (sinks, dead)
        };

        for id in dead {
            self.unsubscribe(game, id).await;
        }
        sinks
    }

    /// The game a connection is currently subscribed to, if any.
    pub async fn game_of(&self, id: ConnectionId) -> Option<GameId> {
        self.inner.read().await.memberships.get(&id).copied()
    }

    /// Number of connections currently subscribed to `game`.
    pub async fn connection_count(&self, game: GameId) -> usize {
        self.inner
            .read()
            .await
            .rooms
            .get(&game)
            .map_or(0, HashMap::len)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops `id` from `game`'s set and the set itself once empty.
fn remove_from_room(inner: &mut Inner, game: GameId, id: ConnectionId) {
    if let Some(room) = inner.rooms.get_mut(&game) {
        room.remove(&id);
        if room.is_empty() {
            inner.rooms.remove(&game);
        }
    }
}
