//! Game state and rules for Barricade.
//!
//! This crate is the "game-state provider" the synchronization layer
//! consults: it owns every running game, applies mutations (joins,
//! votes, token passes, flags, rankings, role assignment), and renders
//! the full [`GameView`](barricade_protocol::GameView) the broadcast
//! layer pushes to clients.
//!
//! State is held in memory for the process lifetime. Nothing in the
//! rules needs durability across restarts, and the in-memory form keeps
//! every mutation a plain `&mut Game`.
//!
//! # Key types
//!
//! - [`GameStore`] — process-wide map of running games
//! - [`Game`] / [`Player`] — one table and its seats
//! - [`PlayerProfile`] — name + color a user picks when sitting down
//! - [`GameError`] — everything that can go wrong

mod error;
mod game;
mod store;

pub use error::GameError;
pub use game::{Flag, Game, Player, PlayerProfile, Token};
pub use store::GameStore;

/// Total shard tokens the game box ships with.
pub const SHARD_TOKENS_MAX: u32 = 28;

/// Shard tokens already distributed when a table opens.
pub const SHARD_TOKENS_START: u32 = 0;

/// Influence tokens every player brings to the table.
pub const INFLUENCE_TOKENS_START: usize = 3;
