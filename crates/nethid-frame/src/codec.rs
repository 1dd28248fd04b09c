use bytes::{Buf, BufMut};

use crate::error::{FrameError, Result};
use crate::kind::MessageKind;

/// Request header: kind (4) + payload length (4) = 8 bytes.
pub const HEADER_SIZE: usize = 8;

/// Response length prefix: 4 bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default maximum request payload accepted by the back side: 64 KiB.
pub const DEFAULT_MAX_REQUEST_PAYLOAD: usize = 64 * 1024;

/// A decoded request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// The request kind.
    pub kind: MessageKind,
    /// Number of payload bytes that follow the header.
    pub length: u32,
}

impl MessageHeader {
    /// Create a header.
    pub fn new(kind: MessageKind, length: u32) -> Self {
        Self { kind, length }
    }

    /// Encode into the wire format.
    ///
    /// Wire format, host byte order on both sides:
    /// ```text
    /// ┌──────────────┬──────────────┬─────────────────┐
    /// │ Kind (4B)    │ Length (4B)  │ Payload         │
    /// │ u32 tag      │ u32          │ (Length bytes)  │
    /// └──────────────┴──────────────┴─────────────────┘
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut dst = &mut out[..];
        dst.put_u32_ne(self.kind.as_wire());
        dst.put_u32_ne(self.length);
        out
    }

    /// Decode from the wire format.
    ///
    /// An unknown kind is rejected here, before anything tries to read the
    /// payload that the header announces.
    pub fn decode(src: &[u8; HEADER_SIZE]) -> Result<Self> {
        let mut src = &src[..];
        let tag = src.get_u32_ne();
        let length = src.get_u32_ne();
        let kind = MessageKind::from_wire(tag).ok_or(FrameError::UnknownKind(tag))?;
        Ok(Self { kind, length })
    }
}

/// Encode a response length prefix.
pub fn encode_length_prefix(len: usize) -> Result<[u8; LENGTH_PREFIX_SIZE]> {
    let len = u32::try_from(len).map_err(|_| FrameError::PayloadTooLarge {
        size: len,
        max: u32::MAX as usize,
    })?;
    let mut out = [0u8; LENGTH_PREFIX_SIZE];
    (&mut out[..]).put_u32_ne(len);
    Ok(out)
}

/// Decode a response length prefix.
pub fn decode_length_prefix(src: &[u8; LENGTH_PREFIX_SIZE]) -> u32 {
    (&src[..]).get_u32_ne()
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest request payload the receiver will buffer. Default: 64 KiB.
    pub max_request_payload: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_request_payload: DEFAULT_MAX_REQUEST_PAYLOAD,
        }
    }
}
