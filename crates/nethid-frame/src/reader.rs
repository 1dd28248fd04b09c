use std::io::Read;

use nethid_transport::{read_exact, TransportError, WorkingBuffer};
use tracing::trace;

use crate::codec::{
    decode_length_prefix, FrameConfig, MessageHeader, HEADER_SIZE, LENGTH_PREFIX_SIZE,
};
use crate::error::{FrameError, Result};

/// Reads request headers, request payloads and responses from any `Read`
/// stream.
///
/// Every read is exact: callers never see partial headers or payloads.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next request header (blocking).
    ///
    /// Fails without consuming any payload if the kind is unknown or the
    /// announced length exceeds `max_request_payload`.
    pub fn read_header(&mut self) -> Result<MessageHeader> {
        let mut raw = [0u8; HEADER_SIZE];
        read_exact(&mut self.inner, &mut raw)?;
        let header = MessageHeader::decode(&raw)?;

        let length = header.length as usize;
        if length > self.config.max_request_payload {
            return Err(FrameError::PayloadTooLarge {
                size: length,
                max: self.config.max_request_payload,
            });
        }

        trace!(kind = %header.kind, length, "read request header");
        Ok(header)
    }

    /// Read exactly `len` payload bytes into the front of `buf`, growing it
    /// first if needed.
    ///
    /// The header or prefix has already been consumed, so a close here is
    /// never a message boundary: it fails with [`FrameError::Truncated`].
    pub fn read_payload_into(&mut self, buf: &mut WorkingBuffer, len: usize) -> Result<()> {
        buf.ensure_capacity(len)?;
        read_exact(&mut self.inner, buf.as_mut_slice(len)).map_err(|err| match err {
            TransportError::Closed {
                transferred,
                expected,
            } => FrameError::Truncated {
                received: transferred,
                expected,
            },
            other => FrameError::Transport(other),
        })
    }

    /// Read a response length prefix.
    pub fn read_response_len(&mut self) -> Result<usize> {
        let mut raw = [0u8; LENGTH_PREFIX_SIZE];
        read_exact(&mut self.inner, &mut raw)?;
        Ok(decode_length_prefix(&raw) as usize)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, ErrorKind};

    use super::*;
    use crate::kind::MessageKind;

    fn wire(parts: &[&[u8]]) -> Cursor<Vec<u8>> {
        Cursor::new(parts.concat())
    }

    #[test]
    fn reads_header_then_payload() {
        let header = MessageHeader::new(MessageKind::FeatureReport, 1).encode();
        let mut reader = FrameReader::new(wire(&[&header, &[7]]));
        let mut buf = WorkingBuffer::with_capacity(16).unwrap();

        let header = reader.read_header().unwrap();
        assert_eq!(header.kind, MessageKind::FeatureReport);
        reader
            .read_payload_into(&mut buf, header.length as usize)
            .unwrap();
        assert_eq!(buf.as_slice(1), &[7]);
    }

    #[test]
    fn payload_grows_buffer() {
        let payload = vec![0xAB; 3000];
        let header = MessageHeader::new(MessageKind::Output, 3000).encode();
        let mut reader = FrameReader::new(wire(&[&header, &payload]));
        let mut buf = WorkingBuffer::with_capacity(1024).unwrap();

        let header = reader.read_header().unwrap();
        reader
            .read_payload_into(&mut buf, header.length as usize)
            .unwrap();
        assert_eq!(buf.capacity(), 3000);
        assert_eq!(buf.as_slice(3000), payload.as_slice());
    }

    #[test]
    fn unknown_kind_leaves_payload_unread() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&9u32.to_ne_bytes());
        raw.extend_from_slice(&4u32.to_ne_bytes());
        raw.extend_from_slice(b"junk");
        let mut reader = FrameReader::new(Cursor::new(raw));

        let err = reader.read_header().unwrap_err();
        assert!(matches!(err, FrameError::UnknownKind(9)));
        assert_eq!(reader.get_ref().position(), HEADER_SIZE as u64);
    }

    #[test]
    fn oversized_request_rejected_before_payload() {
        let header = MessageHeader::new(MessageKind::Output, 1024).encode();
        let cfg = FrameConfig {
            max_request_payload: 16,
        };
        let mut reader = FrameReader::with_config(wire(&[&header]), cfg);

        let err = reader.read_header().unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge {
                size: 1024,
                max: 16
            }
        ));
    }

    #[test]
    fn response_prefix_then_payload() {
        let mut reader = FrameReader::new(wire(&[&3u32.to_ne_bytes(), b"abc"]));
        let mut buf = WorkingBuffer::with_capacity(8).unwrap();
        let len = reader.read_response_len().unwrap();
        reader.read_payload_into(&mut buf, len).unwrap();
        assert_eq!(buf.as_slice(len), b"abc");
    }

    #[test]
    fn empty_response() {
        let mut reader = FrameReader::new(wire(&[&0u32.to_ne_bytes()]));
        let mut buf = WorkingBuffer::with_capacity(8).unwrap();
        assert_eq!(reader.read_response_len().unwrap(), 0);
        reader.read_payload_into(&mut buf, 0).unwrap();
    }

    #[test]
    fn closed_before_header_is_shutdown() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_header().unwrap_err();
        assert!(err.is_shutdown());
    }

    #[test]
    fn closed_mid_header_is_failure() {
        let mut reader = FrameReader::new(wire(&[&[0u8; 5]]));
        let err = reader.read_header().unwrap_err();
        assert!(!err.is_shutdown());
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::Closed { transferred: 5, .. })
        ));
    }

    #[test]
    fn closed_right_after_header_is_truncation() {
        let header = MessageHeader::new(MessageKind::FeatureReport, 1).encode();
        let mut reader = FrameReader::new(wire(&[&header]));
        let mut buf = WorkingBuffer::with_capacity(8).unwrap();

        let header = reader.read_header().unwrap();
        let err = reader
            .read_payload_into(&mut buf, header.length as usize)
            .unwrap_err();
        assert!(!err.is_shutdown());
        assert!(matches!(
            err,
            FrameError::Truncated {
                received: 0,
                expected: 1
            }
        ));
    }

    #[test]
    fn closed_mid_response_is_truncation() {
        let mut reader = FrameReader::new(wire(&[&8u32.to_ne_bytes(), b"abc"]));
        let mut buf = WorkingBuffer::with_capacity(8).unwrap();
        let len = reader.read_response_len().unwrap();
        let err = reader.read_payload_into(&mut buf, len).unwrap_err();
        assert!(!err.is_shutdown());
        assert!(matches!(
            err,
            FrameError::Truncated {
                received: 3,
                expected: 8
            }
        ));
    }

    struct InterruptedReader;

    impl Read for InterruptedReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::Interrupted))
        }
    }

    #[test]
    fn interrupted_header_is_shutdown() {
        let mut reader = FrameReader::new(InterruptedReader);
        let err = reader.read_header().unwrap_err();
        assert!(err.is_shutdown());
    }
}
