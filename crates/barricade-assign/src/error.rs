//! Error types for the assignment engine.

use barricade_protocol::ROLE_COUNT;

/// Errors that can occur during role assignment.
#[derive(Debug, thiserror::Error)]
pub enum AssignError {
    /// More players than roles: the extra players have no slot to
    /// receive and must never be silently truncated.
    #[error("cannot assign roles to {players} players, pool has {ROLE_COUNT}")]
    TooManyPlayers {
        /// Number of rankings the caller supplied.
        players: usize,
    },
}
