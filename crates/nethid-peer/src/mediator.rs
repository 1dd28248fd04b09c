use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use nethid_device::{RawHidDevice, UHID_DATA_MAX};
use nethid_frame::{FrameConfig, FrameReader, FrameWriter, MessageKind};
use nethid_transport::{Readiness, WorkingBuffer, DEFAULT_BUFFER_CAPACITY};
use tracing::{debug, info, trace};

use crate::error::{PeerError, Result};
use crate::session::SessionEnd;

/// Back-side session configuration.
#[derive(Debug, Clone)]
pub struct MediatorConfig {
    /// Starting capacity of the working buffer. A queued report that fills
    /// it is rejected as truncated.
    pub initial_buffer_capacity: usize,
    /// Request framing limits.
    pub frame: FrameConfig,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            initial_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            frame: FrameConfig::default(),
        }
    }
}

/// Answers protocol requests against a real HID device.
///
/// Purely reactive: reads one request, queries the device, writes one
/// response, and repeats.
pub struct Mediator<D, R, W> {
    device: D,
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    buffer: WorkingBuffer,
    feature: Box<[u8; UHID_DATA_MAX]>,
}

impl<D: RawHidDevice, R: Read, W: Write> Mediator<D, R, W> {
    /// Create a mediator with default configuration.
    pub fn new(device: D, reader: R, writer: W) -> Result<Self> {
        Self::with_config(device, reader, writer, MediatorConfig::default())
    }

    /// Create a mediator with explicit configuration.
    pub fn with_config(device: D, reader: R, writer: W, config: MediatorConfig) -> Result<Self> {
        Ok(Self {
            device,
            reader: FrameReader::with_config(reader, config.frame),
            writer: FrameWriter::new(writer),
            buffer: WorkingBuffer::with_capacity(config.initial_buffer_capacity)?,
            feature: Box::new([0u8; UHID_DATA_MAX]),
        })
    }

    /// Serve requests until the channel closes, a signal interrupts a
    /// blocking call, `stop` is raised, or a request fails.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<SessionEnd> {
        info!("serving requests");
        loop {
            // A signal landing between this check and the blocking header
            // read is only seen once the next request arrives.
            if stop.load(Ordering::SeqCst) {
                return Ok(SessionEnd::Stopped);
            }
            if let Err(err) = self.serve_one() {
                return SessionEnd::from_error(err);
            }
        }
    }

    /// Read one request, answer it, and return its kind.
    ///
    /// The header's kind and length are validated before any payload byte
    /// is read; an accepted payload is always read in full.
    pub fn serve_one(&mut self) -> Result<MessageKind> {
        let header = self.reader.read_header()?;
        let len = header.length as usize;
        self.reader.read_payload_into(&mut self.buffer, len)?;
        debug!(kind = %header.kind, len, "request");

        match header.kind {
            MessageKind::ReportDescriptor => {
                let descriptor = self.device.report_descriptor()?;
                self.writer.send_response(&descriptor)?;
            }
            MessageKind::Identity => {
                let identity = self.device.identity()?;
                self.writer.send_response(&identity.to_wire())?;
            }
            MessageKind::Name => {
                let name = self.device.name()?;
                self.writer.send_response(&name)?;
            }
            MessageKind::FeatureReport => {
                if len != 1 {
                    return Err(PeerError::BadFeatureRequest { len });
                }
                let report_number = self.buffer.as_slice(1)[0];
                let n = self
                    .device
                    .feature_report(report_number, &mut self.feature[..])?;
                self.writer.send_response(&self.feature[..n])?;
            }
            MessageKind::Output => return Err(PeerError::UnsupportedOutput { len }),
            MessageKind::QueuedReport => {
                let n = drain_queued_report(&mut self.device, &mut self.buffer)?;
                self.writer.send_response(self.buffer.as_slice(n))?;
            }
        }
        Ok(header.kind)
    }
}

/// Read the newest pending input report into `buffer`, or wait for the next
/// one if none is pending. Returns the report length.
///
/// Older pending reports are read and discarded. A report that fills the
/// whole buffer may have been cut short and is rejected.
pub fn drain_queued_report<D: RawHidDevice + ?Sized>(
    device: &mut D,
    buffer: &mut WorkingBuffer,
) -> Result<usize> {
    let mut read_any = false;
    let mut len = 0;

    loop {
        match device.poll_report()? {
            Readiness::Readable => {
                len = device.read_report(buffer.as_full_mut())?;
                read_any = true;
                trace!(len, "drained report");
            }
            Readiness::Exceptional(revents) => {
                return Err(PeerError::DeviceHangup { revents });
            }
            Readiness::Idle => break,
        }
    }

    if !read_any {
        trace!("no report pending, waiting");
        len = device.read_report(buffer.as_full_mut())?;
    }

    if len >= buffer.capacity() {
        return Err(PeerError::TruncatedReport {
            capacity: buffer.capacity(),
        });
    }
    Ok(len)
}
