/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The channel is closed; the client is gone.
    #[error("connection closed")]
    Closed,

    /// Writing to the channel failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading from the channel failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting connections failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
