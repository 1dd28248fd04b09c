//! Channel plumbing for nethid.
//!
//! The lowest layer of the stack:
//! - exact-length reads and writes that stop cleanly on signal interruption
//! - the growable per-session [`WorkingBuffer`]
//! - zero-timeout readiness checks on raw descriptors
//! - adoption of inherited descriptors as a duplex [`Channel`]
//!
//! Everything above (framing, devices, sessions) builds on these.

pub mod buffer;
pub mod channel;
pub mod error;
pub mod exact;
pub mod readiness;
pub mod signal;

pub use buffer::{WorkingBuffer, DEFAULT_BUFFER_CAPACITY};
pub use channel::{Channel, FRONT_FD_IN, FRONT_FD_OUT};
pub use error::{Result, TransportError};
pub use exact::{read_exact, write_exact};
pub use readiness::{poll_readable, Readiness};
