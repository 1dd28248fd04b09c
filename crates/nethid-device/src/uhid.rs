//! The Linux `uhid` character device: event codec and device handle.
//!
//! Every event is a packed `struct uhid_event`: a 4-byte type tag followed
//! by a union whose largest member (`uhid_create2_req`) fixes the total
//! size. The kernel reads and writes whole events, so each read and write
//! here is a single full-size transfer.

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::os::fd::AsFd;
use std::path::Path;

use bytes::{Buf, BufMut};
use nethid_transport::{poll_readable, write_exact, Readiness};
use tracing::{debug, info, trace};

use crate::error::{DeviceError, Result};
use crate::identity::{HID_MAX_DESCRIPTOR_SIZE, NAME_CAPACITY, UHID_DATA_MAX};

/// Default path of the uhid control node.
pub const DEFAULT_UHID_PATH: &str = "/dev/uhid";

/// Size of `struct uhid_event`.
pub const UHID_EVENT_SIZE: usize = TYPE_SIZE + CREATE2_SIZE;

const TYPE_SIZE: usize = 4;
const PHYS_CAPACITY: usize = 64;
const UNIQ_CAPACITY: usize = 64;
const CREATE2_SIZE: usize =
    NAME_CAPACITY + PHYS_CAPACITY + UNIQ_CAPACITY + 2 + 2 + 4 + 4 + 4 + 4 + HID_MAX_DESCRIPTOR_SIZE;

// enum uhid_event_type
const UHID_START: u32 = 2;
const UHID_STOP: u32 = 3;
const UHID_OPEN: u32 = 4;
const UHID_CLOSE: u32 = 5;
const UHID_OUTPUT: u32 = 6;
const UHID_GET_REPORT: u32 = 9;
const UHID_GET_REPORT_REPLY: u32 = 10;
const UHID_CREATE2: u32 = 11;
const UHID_INPUT2: u32 = 12;
const UHID_SET_REPORT: u32 = 13;

/// Everything the kernel needs to instantiate a virtual HID device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    /// Raw name bytes, at most 128; copied verbatim and zero-padded.
    pub name: Vec<u8>,
    pub phys: Vec<u8>,
    pub uniq: Vec<u8>,
    pub bus: u16,
    pub vendor: u32,
    pub product: u32,
    pub version: u32,
    pub country: u32,
    pub report_descriptor: Vec<u8>,
}

/// Kernel-originated events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UhidEvent {
    Start { dev_flags: u64 },
    Stop,
    Open,
    Close,
    Output { size: u16, report_type: u8 },
    GetReport { id: u32, report_number: u8, report_type: u8 },
    SetReport { id: u32, report_number: u8, report_type: u8, size: u16 },
    Unknown(u32),
}

impl UhidEvent {
    /// Decode one event as read from the uhid node.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let mut tag = raw
            .get(..TYPE_SIZE)
            .ok_or(DeviceError::ShortEvent(raw.len()))?;
        let event_type = tag.get_u32_ne();

        let event = match event_type {
            UHID_START => {
                let mut body = event_body(raw, 8)?;
                UhidEvent::Start {
                    dev_flags: body.get_u64_ne(),
                }
            }
            UHID_STOP => UhidEvent::Stop,
            UHID_OPEN => UhidEvent::Open,
            UHID_CLOSE => UhidEvent::Close,
            UHID_OUTPUT => {
                let mut body = event_body(raw, UHID_DATA_MAX + 3)?;
                body.advance(UHID_DATA_MAX);
                UhidEvent::Output {
                    size: body.get_u16_ne(),
                    report_type: body.get_u8(),
                }
            }
            UHID_GET_REPORT => {
                let mut body = event_body(raw, 6)?;
                UhidEvent::GetReport {
                    id: body.get_u32_ne(),
                    report_number: body.get_u8(),
                    report_type: body.get_u8(),
                }
            }
            UHID_SET_REPORT => {
                let mut body = event_body(raw, 8)?;
                UhidEvent::SetReport {
                    id: body.get_u32_ne(),
                    report_number: body.get_u8(),
                    report_type: body.get_u8(),
                    size: body.get_u16_ne(),
                }
            }
            other => UhidEvent::Unknown(other),
        };
        Ok(event)
    }

    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            UhidEvent::Start { .. } => "START",
            UhidEvent::Stop => "STOP",
            UhidEvent::Open => "OPEN",
            UhidEvent::Close => "CLOSE",
            UhidEvent::Output { .. } => "OUTPUT",
            UhidEvent::GetReport { .. } => "GET_REPORT",
            UhidEvent::SetReport { .. } => "SET_REPORT",
            UhidEvent::Unknown(_) => "UNKNOWN",
        }
    }
}

fn event_body(raw: &[u8], len: usize) -> Result<&[u8]> {
    raw.get(TYPE_SIZE..TYPE_SIZE + len)
        .ok_or(DeviceError::ShortEvent(raw.len()))
}

/// Userspace-originated events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UhidRequest<'a> {
    Create2(&'a CreateParams),
    Input2 { data: &'a [u8] },
    GetReportReply { id: u32, err: u16, data: &'a [u8] },
}

impl UhidRequest<'_> {
    /// Encode into a full-size event, zeroing everything not written.
    ///
    /// Fails without touching the kernel if a field exceeds its capacity.
    pub fn encode_into(&self, dst: &mut [u8; UHID_EVENT_SIZE]) -> Result<()> {
        dst.fill(0);
        let mut out = &mut dst[..];

        match self {
            UhidRequest::Create2(params) => {
                check_len("device name", params.name.len(), NAME_CAPACITY)?;
                check_len("physical path", params.phys.len(), PHYS_CAPACITY)?;
                check_len("unique id", params.uniq.len(), UNIQ_CAPACITY)?;
                check_len(
                    "report descriptor",
                    params.report_descriptor.len(),
                    HID_MAX_DESCRIPTOR_SIZE,
                )?;

                out.put_u32_ne(UHID_CREATE2);
                put_padded(&mut out, &params.name, NAME_CAPACITY);
                put_padded(&mut out, &params.phys, PHYS_CAPACITY);
                put_padded(&mut out, &params.uniq, UNIQ_CAPACITY);
                out.put_u16_ne(params.report_descriptor.len() as u16);
                out.put_u16_ne(params.bus);
                out.put_u32_ne(params.vendor);
                out.put_u32_ne(params.product);
                out.put_u32_ne(params.version);
                out.put_u32_ne(params.country);
                out.put_slice(&params.report_descriptor);
            }
            UhidRequest::Input2 { data } => {
                check_len("input report", data.len(), UHID_DATA_MAX)?;
                out.put_u32_ne(UHID_INPUT2);
                out.put_u16_ne(data.len() as u16);
                out.put_slice(data);
            }
            UhidRequest::GetReportReply { id, err, data } => {
                check_len("feature report reply", data.len(), UHID_DATA_MAX)?;
                out.put_u32_ne(UHID_GET_REPORT_REPLY);
                out.put_u32_ne(*id);
                out.put_u16_ne(*err);
                out.put_u16_ne(data.len() as u16);
                out.put_slice(data);
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        match self {
            UhidRequest::Create2(_) => "CREATE2",
            UhidRequest::Input2 { .. } => "INPUT2",
            UhidRequest::GetReportReply { .. } => "GET_REPORT_REPLY",
        }
    }
}

fn check_len(what: &'static str, size: usize, max: usize) -> Result<()> {
    if size > max {
        return Err(DeviceError::TooLarge { what, size, max });
    }
    Ok(())
}

fn put_padded(out: &mut &mut [u8], src: &[u8], width: usize) {
    out.put_slice(src);
    out.put_bytes(0, width - src.len());
}

/// The operations the front side performs on its virtual device.
pub trait VirtualHidDevice {
    /// Instantiate the device. Called once, before any other request.
    fn create(&mut self, params: &CreateParams) -> Result<()>;

    /// Zero-timeout check for a pending kernel event.
    fn poll_event(&mut self) -> Result<Readiness>;

    /// Read one kernel event (blocking).
    fn read_event(&mut self) -> Result<UhidEvent>;

    /// Submit one event to the kernel.
    fn send(&mut self, request: &UhidRequest<'_>) -> Result<()>;
}

/// An open `/dev/uhid` handle.
pub struct UhidDevice {
    file: File,
    scratch: Box<[u8; UHID_EVENT_SIZE]>,
}

impl UhidDevice {
    /// Open the uhid control node read-write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| DeviceError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "opened uhid");
        Ok(Self {
            file,
            scratch: Box::new([0u8; UHID_EVENT_SIZE]),
        })
    }
}

impl VirtualHidDevice for UhidDevice {
    fn create(&mut self, params: &CreateParams) -> Result<()> {
        self.send(&UhidRequest::Create2(params))?;
        info!(
            name = %crate::identity::display_name(&params.name),
            bus = params.bus,
            vendor = params.vendor,
            product = params.product,
            descriptor_len = params.report_descriptor.len(),
            "created virtual device"
        );
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Readiness> {
        Ok(poll_readable(self.file.as_fd())?)
    }

    fn read_event(&mut self) -> Result<UhidEvent> {
        let n = self
            .file
            .read(&mut self.scratch[..])
            .map_err(DeviceError::read)?;
        let event = UhidEvent::decode(&self.scratch[..n])?;
        debug!(event = event.name(), "kernel event");
        Ok(event)
    }

    fn send(&mut self, request: &UhidRequest<'_>) -> Result<()> {
        request.encode_into(&mut self.scratch)?;
        write_exact(&mut self.file, &self.scratch[..])?;
        trace!(request = request.name(), "sent uhid event");
        Ok(())
    }
}

impl std::fmt::Debug for UhidDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UhidDevice")
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}
