//! Process-wide store of running games.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use tokio::sync::RwLock;

use barricade_protocol::{
    FlagColor, GameId, GamePhase, GameView, PlayerId, Role, UserId,
};

use crate::game::{Game, PlayerProfile};
use crate::GameError;

static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

/// All running games, keyed by id.
///
/// Every mutation renders and returns the full [`GameView`] so the
/// caller can broadcast it to the room without taking the lock again.
#[derive(Debug, Default)]
pub struct GameStore {
    games: RwLock<HashMap<GameId, Game>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new table and seats the creator at it.
    ///
    /// A user with an unfinished game cannot open another one.
    pub async fn create(
        &self,
        user: UserId,
        profile: &PlayerProfile,
    ) -> Result<GameView, GameError> {
        let mut games = self.games.write().await;

        let already_playing = games.values().any(|g| {
            g.phase() != GamePhase::Done && g.player_of(user).is_some()
        });
        if already_playing {
            return Err(GameError::AlreadyInGame(user));
        }

        let id = GameId(NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed));
        let code = fresh_join_code(&games);
        let mut game = Game::new(id, code);
        game.seat(user, profile);

        tracing::info!(game = %id, code = game.join_code(), "game created");
        let view = game.render(None);
        games.insert(id, game);
        Ok(view)
    }

    /// Seats the user at the table carrying `code`. Joining a game the
    /// user already sits at returns the current view unchanged.
    pub async fn join(
        &self,
        code: &str,
        user: UserId,
        profile: &PlayerProfile,
    ) -> Result<GameView, GameError> {
        let mut games = self.games.write().await;
        let game = games
            .values_mut()
            .find(|g| g.join_code() == code)
            .ok_or_else(|| GameError::UnknownJoinCode(code.to_owned()))?;
        if game.phase() == GamePhase::Done {
            return Err(GameError::GameOver(game.id()));
        }

        game.seat(user, profile);
        Ok(game.render(None))
    }

    /// Removes the user's seat from the game.
    pub async fn quit(
        &self,
        game: GameId,
        user: UserId,
    ) -> Result<GameView, GameError> {
        self.mutate(game, |g| g.remove_player(user)).await
    }

    /// Ends the game. Idempotent.
    pub async fn close(&self, game: GameId) -> Result<GameView, GameError> {
        let mut games = self.games.write().await;
        let g = games.get_mut(&game).ok_or(GameError::NotFound(game))?;
        g.close();
        Ok(g.render(None))
    }

    pub async fn add_vote(&self, game: GameId) -> Result<GameView, GameError> {
        self.mutate(game, |g| {
            g.add_vote();
            Ok(())
        })
        .await
    }

    pub async fn reset_votes(
        &self,
        game: GameId,
    ) -> Result<GameView, GameError> {
        self.mutate(game, |g| {
            g.reset_votes();
            Ok(())
        })
        .await
    }

    pub async fn give_token(
        &self,
        game: GameId,
        from_user: UserId,
        to_player: PlayerId,
    ) -> Result<GameView, GameError> {
        self.mutate(game, |g| g.give_token(from_user, to_player)).await
    }

    pub async fn plant_flag(
        &self,
        game: GameId,
        user: UserId,
        color: FlagColor,
    ) -> Result<GameView, GameError> {
        self.mutate(game, |g| g.plant_flag(user, color)).await
    }

    pub async fn save_ranking(
        &self,
        game: GameId,
        user: UserId,
        ranking: Vec<Role>,
    ) -> Result<GameView, GameError> {
        self.mutate(game, |g| g.save_ranking(user, ranking)).await
    }

    pub async fn change_color(
        &self,
        game: GameId,
        user: UserId,
        color: String,
    ) -> Result<GameView, GameError> {
        self.mutate(game, |g| g.change_color(user, color)).await
    }

    /// Runs the role optimizer and moves the game into play.
    pub async fn assign_roles(
        &self,
        game: GameId,
    ) -> Result<GameView, GameError> {
        self.mutate(game, Game::assign_roles).await
    }

    /// Renders the current view, optionally marking the viewer's seat.
    pub async fn view(
        &self,
        game: GameId,
        viewer: Option<UserId>,
    ) -> Result<GameView, GameError> {
        let games = self.games.read().await;
        let g = games.get(&game).ok_or(GameError::NotFound(game))?;
        Ok(g.render(viewer))
    }

    /// The unfinished game the user currently sits at, if any.
    pub async fn current_game_of(&self, user: UserId) -> Option<GameId> {
        let games = self.games.read().await;
        games
            .values()
            .find(|g| {
                g.phase() != GamePhase::Done && g.player_of(user).is_some()
            })
            .map(Game::id)
    }

    /// Resolves a join code to a game id.
    pub async fn game_by_code(&self, code: &str) -> Option<GameId> {
        let games = self.games.read().await;
        games
            .values()
            .find(|g| g.join_code() == code)
            .map(Game::id)
    }

    async fn mutate<F>(&self, game: GameId, f: F) -> Result<GameView, GameError>
    where
        F: FnOnce(&mut Game) -> Result<(), GameError>,
    {
        let mut games = self.games.write().await;
        let g = games.get_mut(&game).ok_or(GameError::NotFound(game))?;
        if g.phase() == GamePhase::Done {
            return Err(GameError::GameOver(game));
        }
        f(g)?;
        Ok(g.render(None))
    }
}

/// An eight-hex-digit code not carried by any existing game.
fn fresh_join_code(games: &HashMap<GameId, Game>) -> String {
    let mut rng = rand::rng();
    loop {
        let bytes: [u8; 4] = rng.random();
        let code = bytes.iter().fold(String::new(), |mut acc, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        });
        if !games.values().any(|g| g.join_code() == code) {
            return code;
        }
    }
}
