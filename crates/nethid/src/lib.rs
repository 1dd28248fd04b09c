//! Remote a Linux HID device over a length-framed byte channel.
//!
//! The back side (`nethid back`) owns the real device through `hidraw` and
//! answers requests on stdin/stdout. The front side (`nethid front`) owns a
//! virtual `uhid` device and drives the exchange over two inherited
//! descriptors. Whatever connects the two (pipe, socket, ssh) is up to the
//! caller.
//!
//! # Crate Structure
//!
//! - [`transport`]: exact-length I/O, working buffer, readiness, signals
//! - [`frame`]: request headers and length-prefixed responses
//! - [`device`]: `hidraw` and `uhid` access
//! - [`peer`]: the back-side mediator and front-side emulator

/// Re-export transport types.
pub mod transport {
    pub use nethid_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use nethid_frame::*;
}

/// Re-export device types.
pub mod device {
    pub use nethid_device::*;
}

/// Re-export session types.
pub mod peer {
    pub use nethid_peer::*;
}
