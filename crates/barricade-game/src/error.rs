//! Error types for the game layer.

use barricade_assign::AssignError;
use barricade_protocol::{GameId, UserId};

/// Errors that can occur while mutating or reading a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The game does not exist.
    #[error("game {0} not found")]
    NotFound(GameId),

    /// No game carries this join code.
    #[error("no game with join code {0:?}")]
    UnknownJoinCode(String),

    /// The user already has a game that is not finished.
    #[error("user {0} already has a running game")]
    AlreadyInGame(UserId),

    /// The user has no seat in this game.
    #[error("user {0} has no player in game {1}")]
    NotInGame(UserId, GameId),

    /// The referenced player is not seated in this game.
    #[error("player not found in game {0}")]
    NoSuchPlayer(GameId),

    /// The giver holds no influence token that could be passed.
    #[error("no influence token available to give")]
    NoTokenToGive,

    /// The game is finished and rejects further mutations.
    #[error("game {0} is over")]
    GameOver(GameId),

    /// A submitted preference ranking is malformed.
    #[error("invalid ranking: {0}")]
    InvalidRanking(String),

    /// Role assignment failed; surfaced to the caller as a
    /// client-visible validation error.
    #[error(transparent)]
    Assign(#[from] AssignError),
}
