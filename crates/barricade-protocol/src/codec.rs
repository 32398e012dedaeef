//! Codec trait and the JSON implementation.
//!
//! The broadcast channel carries text frames, so a codec here turns a
//! serializable value into wire text and back. Only JSON exists today;
//! the trait keeps the door open for a compact binary codec without
//! touching the layers above.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts values to and from wire text.
///
/// `Send + Sync + 'static` because codecs are shared across connection
/// handler tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into wire text.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Parses wire text back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] for malformed or mismatched input.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// Human-readable, which is what the web client and browser DevTools
/// expect. Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
