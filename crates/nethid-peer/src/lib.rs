//! Remoting sessions for a HID device.
//!
//! The back side runs a [`Mediator`] over a real device: it answers one
//! framed request at a time. The front side runs an [`Emulator`] over a
//! virtual device: it creates the device from the remote's identity, name
//! and descriptor, then loops, servicing kernel events first and otherwise
//! pulling the next input report through a [`RemoteDevice`].

pub mod client;
pub mod emulator;
pub mod error;
pub mod mediator;
pub mod select;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use client::RemoteDevice;
pub use emulator::{Emulator, EmulatorConfig};
pub use error::{PeerError, Result};
pub use mediator::{drain_queued_report, Mediator, MediatorConfig};
pub use select::{select_next, Next};
pub use session::SessionEnd;
