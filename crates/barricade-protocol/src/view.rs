//! Rendered game views — what clients actually receive.
//!
//! Every broadcast carries the *full* current view of the game, rendered
//! fresh from the store. There is no diffing and no per-client delta;
//! the only personalization is the `is_me` flag on each player, set for
//! the viewer the render was made for.
//!
//! Field names are camelCase on the wire to match the web client.

use serde::{Deserialize, Serialize};

use crate::{FlagColor, GameId, GamePhase, PlayerId, Role, TokenKind, UserId};

/// The complete, client-facing state of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: GameId,
    /// Shareable code other users present to join this game.
    pub join_code: String,
    pub phase: GamePhase,
    pub nb_votes: u32,
    /// Shard tokens still in the common pool.
    pub nb_available_shard_tokens: u32,
    pub players: Vec<PlayerView>,
    /// Every flag planted in this game, across all players.
    pub flags: Vec<FlagView>,
}

/// One seated player as seen by a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub user_id: UserId,
    pub name: String,
    pub color: String,
    /// Assigned role, once the engine has run. `None` while ranking.
    pub role: Option<Role>,
    /// The player's own most-to-least preference ranking.
    pub ranking: Vec<Role>,
    /// Tokens this player currently holds and may play.
    pub playable_tokens: Vec<TokenView>,
    /// Tokens this player owns, wherever they currently sit.
    pub my_tokens: Vec<TokenView>,
    pub flags: Vec<FlagView>,
    /// True when this entry is the viewer's own player.
    pub is_me: bool,
}

/// A token, identified by its original owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenView {
    pub id: u64,
    pub kind: TokenKind,
    pub owner: PlayerId,
}

/// A planted flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagView {
    pub id: u64,
    pub player: PlayerId,
    pub color: FlagColor,
    /// Unix timestamp in milliseconds.
    pub planted_at: u64,
}
