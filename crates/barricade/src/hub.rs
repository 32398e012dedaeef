//! `GameHub`: the store wired to the broadcast fan-out.
//!
//! Every mutating operation follows the same shape: apply the change to
//! the store, render the full view once, and push it to everyone
//! watching the game. The mutation's result never depends on the
//! broadcast; a room full of dead connections still takes votes.

use std::sync::Arc;
use std::time::Duration;

use barricade_game::{GameStore, PlayerProfile};
use barricade_protocol::{
    Codec, FlagColor, GameId, GameView, JsonCodec, PlayerId, Role, UserId,
};
use barricade_registry::{BroadcastCoordinator, RoomRegistry};
use barricade_transport::{ClientSink, ConnectionId};

use crate::BarricadeError;

/// The store plus the fan-out, behind one surface.
pub struct GameHub {
    store: GameStore,
    coordinator: BroadcastCoordinator,
    codec: JsonCodec,
}

impl GameHub {
    pub fn new() -> Self {
        let registry = Arc::new(RoomRegistry::new());
        Self {
            store: GameStore::new(),
            coordinator: BroadcastCoordinator::new(registry),
            codec: JsonCodec,
        }
    }

    /// Overrides the per-send broadcast timeout.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.coordinator = self.coordinator.with_send_timeout(timeout);
        self
    }

    /// The registry of live connections.
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        self.coordinator.registry()
    }

    /// The game store itself, for read paths that bypass broadcasting.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Subscribes a connection to a game's broadcasts and returns the
    /// current view, so the caller can send it as the baseline.
    pub async fn attach(
        &self,
        game: GameId,
        sink: &Arc<dyn ClientSink>,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.view(game, None).await?;
        self.registry().subscribe(game, sink).await;
        Ok(view)
    }

    /// Drops a connection from whichever game it watches.
    pub async fn detach(&self, connection: ConnectionId) {
        self.registry().remove(connection).await;
    }

    pub async fn create(
        &self,
        user: UserId,
        profile: &PlayerProfile,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.create(user, profile).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn join(
        &self,
        code: &str,
        user: UserId,
        profile: &PlayerProfile,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.join(code, user, profile).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn quit(
        &self,
        game: GameId,
        user: UserId,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.quit(game, user).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn close(&self, game: GameId) -> Result<GameView, BarricadeError> {
        let view = self.store.close(game).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn add_vote(
        &self,
        game: GameId,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.add_vote(game).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn reset_votes(
        &self,
        game: GameId,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.reset_votes(game).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn give_token(
        &self,
        game: GameId,
        from_user: UserId,
        to_player: PlayerId,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.give_token(game, from_user, to_player).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn plant_flag(
        &self,
        game: GameId,
        user: UserId,
        color: FlagColor,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.plant_flag(game, user, color).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn save_ranking(
        &self,
        game: GameId,
        user: UserId,
        ranking: Vec<Role>,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.save_ranking(game, user, ranking).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn change_color(
        &self,
        game: GameId,
        user: UserId,
        color: String,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.change_color(game, user, color).await?;
        self.publish(&view).await;
        Ok(view)
    }

    pub async fn assign_roles(
        &self,
        game: GameId,
    ) -> Result<GameView, BarricadeError> {
        let view = self.store.assign_roles(game).await?;
        self.publish(&view).await;
        Ok(view)
    }

    /// Encodes the view once and fans it out to the game's room.
    async fn publish(&self, view: &GameView) {
        match self.codec.encode(view) {
            Ok(text) => self.coordinator.notify(view.id, &text).await,
            Err(e) => {
                tracing::error!(game = %view.id, error = %e, "failed to encode view")
            }
        }
    }
}

impl Default for GameHub {
    fn default() -> Self {
        Self::new()
    }
}
