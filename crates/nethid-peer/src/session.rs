use crate::error::{PeerError, Result};

/// How a session ended without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The other side closed the channel between messages.
    Closed,
    /// A blocking call was interrupted by a shutdown signal.
    Interrupted,
    /// The stop flag was raised between iterations.
    Stopped,
}

impl SessionEnd {
    /// Classify an error that ended a session loop: clean ends become a
    /// `SessionEnd`, everything else is passed through.
    pub fn from_error(err: PeerError) -> Result<Self> {
        if !err.is_shutdown() {
            return Err(err);
        }
        if err.is_closed() {
            Ok(SessionEnd::Closed)
        } else {
            Ok(SessionEnd::Interrupted)
        }
    }
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEnd::Closed => f.write_str("channel closed"),
            SessionEnd::Interrupted => f.write_str("interrupted"),
            SessionEnd::Stopped => f.write_str("stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use nethid_frame::FrameError;
    use nethid_transport::TransportError;

    use super::*;

    #[test]
    fn classifies_clean_ends() {
        let closed = PeerError::from(TransportError::Closed {
            transferred: 0,
            expected: 4,
        });
        assert_eq!(SessionEnd::from_error(closed).unwrap(), SessionEnd::Closed);

        let interrupted = PeerError::from(FrameError::from(TransportError::Interrupted));
        assert_eq!(
            SessionEnd::from_error(interrupted).unwrap(),
            SessionEnd::Interrupted
        );
    }

    #[test]
    fn failures_pass_through() {
        let err = SessionEnd::from_error(PeerError::UnsupportedOutput { len: 0 }).unwrap_err();
        assert!(matches!(err, PeerError::UnsupportedOutput { len: 0 }));
    }
}
