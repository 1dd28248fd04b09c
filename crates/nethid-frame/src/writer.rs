use std::io::Write;

use nethid_transport::write_exact;
use tracing::trace;

use crate::codec::{encode_length_prefix, MessageHeader};
use crate::error::{FrameError, Result};
use crate::kind::MessageKind;

/// Writes requests and responses to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Send a request header followed by its payload (blocking).
    pub fn send_request(&mut self, kind: MessageKind, payload: &[u8]) -> Result<()> {
        let length = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        })?;

        write_exact(&mut self.inner, &MessageHeader::new(kind, length).encode())?;
        if !payload.is_empty() {
            write_exact(&mut self.inner, payload)?;
        }
        trace!(%kind, length, "sent request");
        Ok(())
    }

    /// Send a length-prefixed response (blocking).
    pub fn send_response(&mut self, payload: &[u8]) -> Result<()> {
        write_exact(&mut self.inner, &encode_length_prefix(payload.len())?)?;
        if !payload.is_empty() {
            write_exact(&mut self.inner, payload)?;
        }
        trace!(len = payload.len(), "sent response");
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, ErrorKind};

    use nethid_transport::{TransportError, WorkingBuffer};

    use super::*;
    use crate::codec::{HEADER_SIZE, LENGTH_PREFIX_SIZE};
    use crate::reader::FrameReader;

    #[test]
    fn request_without_payload_is_header_only() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_request(MessageKind::Identity, &[]).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire.len(), HEADER_SIZE);
        assert_eq!(wire[..4], 1u32.to_ne_bytes());
        assert_eq!(wire[4..], 0u32.to_ne_bytes());
    }

    #[test]
    fn feature_request_carries_report_number() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_request(MessageKind::FeatureReport, &[0x42]).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = FrameReader::new(Cursor::new(wire));
        let header = reader.read_header().unwrap();
        assert_eq!(header.kind, MessageKind::FeatureReport);
        assert_eq!(header.length, 1);

        let mut buf = WorkingBuffer::with_capacity(1).unwrap();
        reader.read_payload_into(&mut buf, 1).unwrap();
        assert_eq!(buf.as_slice(1), &[0x42]);
    }

    #[test]
    fn response_is_length_prefixed() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_response(b"\x01\x02\x03").unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire.len(), LENGTH_PREFIX_SIZE + 3);
        assert_eq!(wire[..4], 3u32.to_ne_bytes());
        assert_eq!(&wire[4..], b"\x01\x02\x03");
    }

    #[test]
    fn empty_response_still_has_prefix() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_response(&[]).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, 0u32.to_ne_bytes());
    }

    #[test]
    fn roundtrip_over_socket_pair() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = FrameWriter::new(left);
        let mut reader = FrameReader::new(right);

        writer.send_response(b"report").unwrap();
        let mut buf = WorkingBuffer::with_capacity(16).unwrap();
        let len = reader.read_response_len().unwrap();
        reader.read_payload_into(&mut buf, len).unwrap();
        assert_eq!(buf.as_slice(len), b"report");
    }

    struct InterruptedWriter;

    impl Write for InterruptedWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::Interrupted))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn interrupted_write_is_shutdown() {
        let mut writer = FrameWriter::new(InterruptedWriter);
        let err = writer.send_response(b"x").unwrap_err();
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::Interrupted)
        ));
        assert!(err.is_shutdown());
    }
}
