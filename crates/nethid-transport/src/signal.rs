//! Signal-driven shutdown.
//!
//! Handlers are installed without `SA_RESTART`, so a signal that arrives
//! while a read or write is blocked makes that call fail with `EINTR`; the
//! exact-length primitives turn that into [`TransportError::Interrupted`].
//! The flag covers signals that land between calls.
//!
//! [`TransportError::Interrupted`]: crate::TransportError::Interrupted

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::error::{Result, TransportError};

static REQUESTED: AtomicBool = AtomicBool::new(false);

const SHUTDOWN_SIGNALS: [libc::c_int; 3] = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP];

extern "C" fn on_signal(_signum: libc::c_int) {
    REQUESTED.store(true, Ordering::SeqCst);
}

/// Install the shutdown handlers for SIGINT, SIGTERM and SIGHUP.
pub fn install() -> Result<()> {
    for signum in SHUTDOWN_SIGNALS {
        // SAFETY: `action` is fully initialised before use, the handler only
        // touches an atomic (async-signal-safe), and `sigaction` receives
        // valid pointers for the duration of the call.
        let rc = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
            action.sa_flags = 0;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(signum, &action, std::ptr::null_mut())
        };
        if rc < 0 {
            return Err(TransportError::Io(std::io::Error::last_os_error()));
        }
    }
    debug!("installed shutdown signal handlers");
    Ok(())
}

/// The process-wide shutdown flag, for loops that take a stop flag.
pub fn flag() -> &'static AtomicBool {
    &REQUESTED
}
