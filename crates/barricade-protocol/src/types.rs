//! Identity newtypes and the game's closed enums.
//!
//! Ids are newtype wrappers over `u64` so a `GameId` can never be passed
//! where a `PlayerId` is expected. `#[serde(transparent)]` keeps them as
//! plain numbers on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for a game (one running room).
///
/// The game id doubles as the broadcast key: clients subscribe to a
/// game id and every mutation of that game fans out to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// A unique identifier for a player seated in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The account behind a player.
///
/// Identity resolution (login, tokens) happens upstream; the operations
/// in this workspace only ever receive an already-resolved `UserId`.
/// A user has at most one non-finished game at a time, which is how
/// "my current game" lookups work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// Number of roles in the pool. The assignment engine brute-forces all
/// `8! = 40320` role permutations, which is only viable because this is
/// small and fixed.
pub const ROLE_COUNT: usize = 8;

/// The fixed, ordered role pool.
///
/// The declaration order is canonical: it defines the columns of the
/// assignment cost matrix and the slot order of role permutations.
/// Serialized in SCREAMING_SNAKE_CASE to match the client contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Pouvoir,
    Ordre,
    Echo,
    Peuple,
    Pamphlet,
    Molotov,
    Ecusson,
    Etoile,
}

impl Role {
    /// All roles in canonical order.
    pub const ALL: [Role; ROLE_COUNT] = [
        Role::Pouvoir,
        Role::Ordre,
        Role::Echo,
        Role::Peuple,
        Role::Pamphlet,
        Role::Molotov,
        Role::Ecusson,
        Role::Etoile,
    ];

    /// Position of this role in the canonical order.
    pub fn index(self) -> usize {
        match self {
            Role::Pouvoir => 0,
            Role::Ordre => 1,
            Role::Echo => 2,
            Role::Peuple => 3,
            Role::Pamphlet => 4,
            Role::Molotov => 5,
            Role::Ecusson => 6,
            Role::Etoile => 7,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Pouvoir => "POUVOIR",
            Role::Ordre => "ORDRE",
            Role::Echo => "ECHO",
            Role::Peuple => "PEUPLE",
            Role::Pamphlet => "PAMPHLET",
            Role::Molotov => "MOLOTOV",
            Role::Ecusson => "ECUSSON",
            Role::Etoile => "ETOILE",
        };
        write!(f, "{name}")
    }
}

/// Lifecycle of a game.
///
/// `Start` — seats are open, players rank roles. `OnGoing` — roles are
/// assigned and the table is playing. `Done` — closed; a user with only
/// `Done` games is free to create or join a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Start,
    OnGoing,
    Done,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Start => write!(f, "START"),
            GamePhase::OnGoing => write!(f, "ON_GOING"),
            GamePhase::Done => write!(f, "DONE"),
        }
    }
}

/// The two kinds of table tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Influence,
    Shard,
}

/// Flag colors a player can plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagColor {
    Red,
    Black,
}
