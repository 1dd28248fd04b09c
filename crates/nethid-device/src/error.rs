use std::path::PathBuf;

use nethid_transport::TransportError;

/// Errors that can occur talking to a real or virtual HID device.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The device node could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A driver query (ioctl) failed.
    #[error("{op} failed: {source}")]
    Query {
        op: &'static str,
        source: std::io::Error,
    },

    /// Reading from the device failed.
    #[error("device read failed: {0}")]
    Read(std::io::Error),

    /// A blocking device call was interrupted by a signal.
    #[error("interrupted by signal")]
    Interrupted,

    /// Readiness check or event write failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The kernel handed back fewer bytes than an event header.
    #[error("short event ({0} bytes)")]
    ShortEvent(usize),

    /// A value does not fit the field the device subsystem provides for it.
    #[error("{what} too large ({size} bytes, max {max})")]
    TooLarge {
        what: &'static str,
        size: usize,
        max: usize,
    },
}

impl DeviceError {
    /// Whether this error is a clean shutdown rather than a failure.
    pub fn is_shutdown(&self) -> bool {
        match self {
            DeviceError::Interrupted => true,
            DeviceError::Transport(err) => err.is_shutdown(),
            _ => false,
        }
    }

    pub(crate) fn read(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::Interrupted {
            DeviceError::Interrupted
        } else {
            DeviceError::Read(err)
        }
    }

    pub(crate) fn query(op: &'static str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::Interrupted {
            DeviceError::Interrupted
        } else {
            DeviceError::Query { op, source: err }
        }
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;
