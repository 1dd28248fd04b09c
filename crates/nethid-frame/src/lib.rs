//! Length-framed request/response protocol for remoting a HID device.
//!
//! Requests start with an 8-byte header:
//! - a 4-byte request kind tag
//! - a 4-byte payload length
//!
//! Responses are a 4-byte length followed by that many bytes. All integers
//! use the host's native byte order, so both ends must share one.
//!
//! The protocol is strictly half-duplex: one request, one response, and
//! ordering alone pairs them up.

pub mod codec;
pub mod error;
pub mod kind;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_length_prefix, encode_length_prefix, FrameConfig, MessageHeader,
    DEFAULT_MAX_REQUEST_PAYLOAD, HEADER_SIZE, LENGTH_PREFIX_SIZE,
};
pub use error::{FrameError, Result};
pub use kind::MessageKind;
pub use reader::FrameReader;
pub use writer::FrameWriter;
