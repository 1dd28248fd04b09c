use std::os::fd::{AsRawFd, BorrowedFd};

use crate::error::{Result, TransportError};

/// Outcome of a zero-timeout readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Nothing pending.
    Idle,
    /// Data can be read without blocking.
    Readable,
    /// Some condition other than readable data is flagged (error, hangup,
    /// invalid descriptor). Carries the raw `revents` bits.
    Exceptional(i16),
}

/// Check whether `fd` has data to read, without blocking.
pub fn poll_readable(fd: BorrowedFd<'_>) -> Result<Readiness> {
    let mut fds = [libc::pollfd {
        fd: fd.as_raw_fd(),
        events: libc::POLLIN,
        revents: 0,
    }];

    // SAFETY: `fds` is a valid array of one `pollfd` that lives for the
    // duration of the call, and the timeout of zero never blocks.
    let rc = unsafe { libc::poll(fds.as_mut_ptr(), 1, 0) };
    if rc < 0 {
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            return Err(TransportError::Interrupted);
        }
        return Err(TransportError::Io(err));
    }

    Ok(classify(rc, fds[0].revents))
}

fn classify(rc: libc::c_int, revents: libc::c_short) -> Readiness {
    if revents & libc::POLLIN != 0 {
        Readiness::Readable
    } else if rc > 0 {
        Readiness::Exceptional(revents)
    } else {
        Readiness::Idle
    }
}
