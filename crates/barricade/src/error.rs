//! Unified error type for the Barricade backend.

use barricade_game::GameError;
use barricade_protocol::ProtocolError;
use barricade_transport::SinkError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `barricade` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BarricadeError {
    /// A transport-level error (accept, send, receive).
    #[error(transparent)]
    Transport(#[from] SinkError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game-rule error (unknown game, bad ranking, no token, ...).
    #[error(transparent)]
    Game(#[from] GameError),
}
