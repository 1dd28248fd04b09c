/// Errors that can occur on a nethid channel or working buffer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the channel.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking call was interrupted by a signal.
    ///
    /// Treated as a request to stop, never as a failure.
    #[error("interrupted by signal")]
    Interrupted,

    /// The peer closed the channel before the transfer completed.
    #[error("channel closed after {transferred} of {expected} bytes")]
    Closed { transferred: usize, expected: usize },

    /// The working buffer could not grow to the requested capacity.
    #[error("out of memory growing buffer to {requested} bytes")]
    OutOfMemory { requested: usize },

    /// A raw descriptor handed to the channel is not open.
    #[error("descriptor {fd} is not open: {source}")]
    BadDescriptor { fd: i32, source: std::io::Error },
}

impl TransportError {
    /// Whether this error is a clean shutdown rather than a failure.
    ///
    /// Interruption always is. A close is clean only when nothing of the
    /// transfer had arrived yet; a close part way through is truncation.
    /// The frame layer reclassifies a close before a payload, since the
    /// header that announced it already went through.
    pub fn is_shutdown(&self) -> bool {
        match self {
            TransportError::Interrupted => true,
            TransportError::Closed { transferred, .. } => *transferred == 0,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
