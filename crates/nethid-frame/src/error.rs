use nethid_transport::TransportError;

/// Errors that can occur while framing requests and responses.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The underlying channel failed, closed or was interrupted.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The header names a request kind this side does not know.
    #[error("unknown message kind {0}")]
    UnknownKind(u32),

    /// The peer closed the channel after a header or length prefix but
    /// before the payload it announced.
    #[error("channel closed after {received} of {expected} payload bytes")]
    Truncated { received: usize, expected: usize },

    /// A payload does not fit where it has to go.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

impl FrameError {
    /// Whether this error is a clean shutdown rather than a failure.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, FrameError::Transport(err) if err.is_shutdown())
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
