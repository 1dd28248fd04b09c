//! Linux HID device access for nethid.
//!
//! The back side talks to a real device through `hidraw`; the front side
//! presents a virtual one through `uhid`. Both sit behind traits
//! ([`RawHidDevice`], [`VirtualHidDevice`]) so the session logic can run
//! against scripted devices in tests.

pub mod error;
pub mod hidraw;
pub mod identity;
mod ioctl;
pub mod uhid;

pub use error::{DeviceError, Result};
pub use hidraw::{HidrawDevice, RawHidDevice};
pub use identity::{
    display_name, DeviceIdentity, HID_MAX_DESCRIPTOR_SIZE, IDENTITY_WIRE_SIZE,
    NAME_CAPACITY, UHID_DATA_MAX,
};
pub use uhid::{
    CreateParams, UhidDevice, UhidEvent, UhidRequest, VirtualHidDevice, DEFAULT_UHID_PATH,
    UHID_EVENT_SIZE,
};
