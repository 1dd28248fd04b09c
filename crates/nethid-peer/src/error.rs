use nethid_device::DeviceError;
use nethid_frame::FrameError;
use nethid_transport::TransportError;

/// Errors that end a remoting session.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Device-level error.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Output reports are not remoted.
    #[error("output reports are not supported ({len} byte payload)")]
    UnsupportedOutput { len: usize },

    /// A feature report request must carry exactly one report number byte.
    #[error("feature report request carries {len} bytes, expected 1")]
    BadFeatureRequest { len: usize },

    /// A response does not have the fixed size its kind requires.
    #[error("{what} response is {actual} bytes, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A response does not fit where it has to go.
    #[error("{what} is {size} bytes, max {max}")]
    Oversized {
        what: &'static str,
        size: usize,
        max: usize,
    },

    /// A queued report filled the whole working buffer and may be cut short.
    #[error("queued report filled the {capacity} byte buffer and may be truncated")]
    TruncatedReport { capacity: usize },

    /// The real device signalled hangup or error instead of data.
    #[error("device not readable (revents {revents:#x})")]
    DeviceHangup { revents: i16 },

    /// The kernel sent an event the emulator does not handle.
    #[error("unexpected kernel event {0}")]
    UnexpectedEvent(&'static str),
}

impl PeerError {
    /// Whether this error is a clean shutdown (signal or peer closed at a
    /// message boundary) rather than a failure.
    pub fn is_shutdown(&self) -> bool {
        match self {
            PeerError::Transport(err) => err.is_shutdown(),
            PeerError::Frame(err) => err.is_shutdown(),
            PeerError::Device(err) => err.is_shutdown(),
            _ => false,
        }
    }

    /// Whether the peer closed the channel.
    pub fn is_closed(&self) -> bool {
        matches!(
            self.transport(),
            Some(TransportError::Closed { .. })
        )
    }

    fn transport(&self) -> Option<&TransportError> {
        match self {
            PeerError::Transport(err)
            | PeerError::Frame(FrameError::Transport(err))
            | PeerError::Device(DeviceError::Transport(err)) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PeerError>;
