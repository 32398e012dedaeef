//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire text.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a view into wire text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (malformed or mismatched wire text).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates the protocol contract —
    /// e.g. a subscribe frame whose body is not a game id.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
