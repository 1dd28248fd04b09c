use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{FromRawFd, RawFd};

use tracing::debug;

use crate::error::{Result, TransportError};

/// Conventional descriptor the front side reads responses from.
pub const FRONT_FD_IN: RawFd = 6;
/// Conventional descriptor the front side writes requests to.
pub const FRONT_FD_OUT: RawFd = 7;

/// An already-connected duplex byte channel: one inbound, one outbound half.
///
/// The channel owns both descriptors and closes them on drop.
pub struct Channel {
    inbound: File,
    outbound: File,
}

impl Channel {
    /// Take ownership of two inherited descriptors.
    ///
    /// Both must be open; the same descriptor may be passed twice (e.g. a
    /// socket), in which case it is duplicated so each half owns its own.
    pub fn from_raw_fds(fd_in: RawFd, fd_out: RawFd) -> Result<Self> {
        ensure_open(fd_in)?;
        ensure_open(fd_out)?;

        let fd_out = if fd_in == fd_out {
            // SAFETY: `fd_in` was just verified to be an open descriptor.
            let dup = unsafe { libc::fcntl(fd_in, libc::F_DUPFD_CLOEXEC, 0) };
            if dup < 0 {
                return Err(TransportError::Io(std::io::Error::last_os_error()));
            }
            dup
        } else {
            fd_out
        };

        debug!(fd_in, fd_out, "adopting channel descriptors");
        // SAFETY: both descriptors are open, distinct, and ownership passes to
        // the returned `File`s; nothing else in the process closes them.
        let (inbound, outbound) = unsafe { (File::from_raw_fd(fd_in), File::from_raw_fd(fd_out)) };
        Ok(Self { inbound, outbound })
    }

    /// The process's standard input and output as a channel.
    pub fn stdio() -> Result<Self> {
        Self::from_raw_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO)
    }

    /// Split into the inbound and outbound halves.
    pub fn into_split(self) -> (File, File) {
        (self.inbound, self.outbound)
    }
}

impl Read for Channel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inbound.read(buf)
    }
}

impl Write for Channel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.outbound.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.outbound.flush()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").field("type", &"fd-pair").finish()
    }
}

fn ensure_open(fd: RawFd) -> Result<()> {
    // SAFETY: F_GETFD only inspects the descriptor table; it is safe to call
    // with any integer.
    let rc = unsafe { libc::fcntl(fd, libc::F_GETFD) };
    if rc < 0 {
        return Err(TransportError::BadDescriptor {
            fd,
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(())
}
