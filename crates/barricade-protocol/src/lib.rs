//! Shared vocabulary for the Barricade backend.
//!
//! This crate defines everything the other layers talk about:
//!
//! - **Identity** ([`GameId`], [`PlayerId`], [`UserId`]) — newtype ids
//!   for the things that outlive a single request.
//! - **The role set** ([`Role`], [`ROLE_COUNT`]) — the fixed, ordered
//!   pool of eight roles the assignment engine optimizes over.
//! - **Views** ([`GameView`], [`PlayerView`], …) — the fully-rendered
//!   representation of a game that gets pushed to every subscribed
//!   client after a mutation.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how a view becomes wire text.
//!
//! The protocol layer knows nothing about connections, locks, or game
//! rules — it is plain data plus serialization.

mod codec;
mod error;
mod types;
mod view;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    FlagColor, GameId, GamePhase, PlayerId, Role, TokenKind, UserId,
    ROLE_COUNT,
};
pub use view::{FlagView, GameView, PlayerView, TokenView};
