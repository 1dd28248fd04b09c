use std::io::{Read, Write};

use nethid_device::{
    DeviceIdentity, HID_MAX_DESCRIPTOR_SIZE, IDENTITY_WIRE_SIZE, NAME_CAPACITY, UHID_DATA_MAX,
};
use nethid_frame::{FrameConfig, FrameReader, FrameWriter, MessageKind};
use nethid_transport::{WorkingBuffer, DEFAULT_BUFFER_CAPACITY};
use tracing::debug;

use crate::error::{PeerError, Result};

/// The requesting end of the protocol: sends one request, reads its
/// response, and checks the response fits where it has to go.
///
/// Responses that exceed their bound are rejected before their payload is
/// read.
pub struct RemoteDevice<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    buffer: WorkingBuffer,
}

impl<R: Read, W: Write> RemoteDevice<R, W> {
    /// Create a client over the two halves of a channel.
    pub fn new(reader: R, writer: W) -> Result<Self> {
        Ok(Self {
            reader: FrameReader::with_config(reader, FrameConfig::default()),
            writer: FrameWriter::new(writer),
            buffer: WorkingBuffer::with_capacity(DEFAULT_BUFFER_CAPACITY)?,
        })
    }

    /// Fetch bus type, vendor and product.
    pub fn fetch_identity(&mut self) -> Result<DeviceIdentity> {
        let len = self.exchange(MessageKind::Identity, &[], "identity", IDENTITY_WIRE_SIZE)?;
        if len != IDENTITY_WIRE_SIZE {
            return Err(PeerError::LengthMismatch {
                what: "identity",
                expected: IDENTITY_WIRE_SIZE,
                actual: len,
            });
        }

        let mut raw = [0u8; IDENTITY_WIRE_SIZE];
        raw.copy_from_slice(self.buffer.as_slice(len));
        Ok(DeviceIdentity::from_wire(&raw))
    }

    /// Fetch the raw name record. At most 128 bytes; longer names are
    /// rejected, never truncated.
    pub fn fetch_name(&mut self) -> Result<Vec<u8>> {
        let len = self.exchange(MessageKind::Name, &[], "device name", NAME_CAPACITY)?;
        Ok(self.buffer.as_slice(len).to_vec())
    }

    /// Fetch the report descriptor.
    pub fn fetch_report_descriptor(&mut self) -> Result<Vec<u8>> {
        let len = self.exchange(
            MessageKind::ReportDescriptor,
            &[],
            "report descriptor",
            HID_MAX_DESCRIPTOR_SIZE,
        )?;
        Ok(self.buffer.as_slice(len).to_vec())
    }

    /// Fetch feature report `report_number`.
    pub fn fetch_feature_report(&mut self, report_number: u8) -> Result<&[u8]> {
        let len = self.exchange(
            MessageKind::FeatureReport,
            &[report_number],
            "feature report",
            UHID_DATA_MAX,
        )?;
        Ok(self.buffer.as_slice(len))
    }

    /// Fetch the most recent queued input report, waiting for one if none
    /// is pending on the other side.
    pub fn fetch_queued_report(&mut self) -> Result<&[u8]> {
        let len = self.exchange(
            MessageKind::QueuedReport,
            &[],
            "queued report",
            UHID_DATA_MAX,
        )?;
        Ok(self.buffer.as_slice(len))
    }

    /// Output reports are not remoted.
    pub fn deliver_output(&mut self, report: &[u8]) -> Result<()> {
        Err(PeerError::UnsupportedOutput { len: report.len() })
    }

    /// Consume the client and return the channel halves.
    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }

    fn exchange(
        &mut self,
        kind: MessageKind,
        payload: &[u8],
        what: &'static str,
        max: usize,
    ) -> Result<usize> {
        self.writer.send_request(kind, payload)?;

        let len = self.reader.read_response_len()?;
        if len > max {
            return Err(PeerError::Oversized {
                what,
                size: len,
                max,
            });
        }
        self.reader.read_payload_into(&mut self.buffer, len)?;
        debug!(%kind, len, "response");
        Ok(len)
    }
}
