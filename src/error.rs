//! Error types for the framing and HPACK layers.
//!
//! Everything here is a recoverable error value: the codec detects and names
//! a violation precisely, and leaves the connection-level response (GOAWAY,
//! RST_STREAM, teardown) to the surrounding stream manager.

use thiserror::Error;

use crate::frame::FrameFlags;

/// HTTP/2 error codes (RFC 7540 Section 7), as carried by RST_STREAM and
/// GOAWAY frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    NoError = 0x0,
    ProtocolError = 0x1,
    InternalError = 0x2,
    FlowControlError = 0x3,
    SettingsTimeout = 0x4,
    StreamClosed = 0x5,
    FrameSizeError = 0x6,
    RefusedStream = 0x7,
    Cancel = 0x8,
    CompressionError = 0x9,
    ConnectError = 0xa,
    EnhanceYourCalm = 0xb,
    InadequateSecurity = 0xc,
    Http11Required = 0xd,
}

impl ErrorCode {
    /// Map a wire value to a known error code. Unrecognized codes collapse
    /// to `InternalError`, matching how peers are told to treat them.
    pub fn from_u32(v: u32) -> Self {
        match v {
            0x0 => Self::NoError,
            0x1 => Self::ProtocolError,
            0x2 => Self::InternalError,
            0x3 => Self::FlowControlError,
            0x4 => Self::SettingsTimeout,
            0x5 => Self::StreamClosed,
            0x6 => Self::FrameSizeError,
            0x7 => Self::RefusedStream,
            0x8 => Self::Cancel,
            0x9 => Self::CompressionError,
            0xa => Self::ConnectError,
            0xb => Self::EnhanceYourCalm,
            0xc => Self::InadequateSecurity,
            0xd => Self::Http11Required,
            _ => Self::InternalError,
        }
    }
}

/// Errors produced by the frame codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Frame or payload length is wrong for the frame type, or the input is
    /// too short to hold what its header claims.
    #[error("invalid frame size")]
    FrameSize,
    /// The frame violates a protocol rule (bad stream id, zero window
    /// increment, invalid padding, ...).
    #[error("protocol error: {0}")]
    Protocol(&'static str),
    /// A settings value breaks its flow-control bound.
    #[error("flow control error: {0}")]
    FlowControl(&'static str),
    /// An attempt to set flags not permitted for the frame type. Carries
    /// exactly the rejected subset so the caller can log or react precisely.
    #[error("flags not allowed for this frame type: {0:?}")]
    InvalidFlags(FrameFlags),
}

/// Errors produced by the Huffman decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HuffmanError {
    /// The bit stream drove the decoder into an invalid transition, hit the
    /// EOS code, or stopped outside an accepting state.
    #[error("invalid huffman decoder state")]
    InvalidState,
    /// The decoded bytes are not valid UTF-8.
    #[error("huffman output is not valid UTF-8")]
    DecodeFailed,
}

/// Errors produced by the HPACK codec and its tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HpackError {
    /// An indexed representation referenced an index with no entry.
    #[error("no header table entry at index {0}")]
    InvalidIndexedHeader(usize),
    /// A purely-indexed representation referenced an entry with no value.
    #[error("indexed header at {0} has no associated value")]
    IndexedHeaderWithNoValue(usize),
    /// A length prefix pointed past the end of the header block.
    #[error("index {index} out of range (length {length})")]
    IndexOutOfRange { index: usize, length: usize },
    /// A plain (non-Huffman) string literal was not valid UTF-8.
    #[error("header string is not valid UTF-8")]
    InvalidUtf8,
    /// The leading byte of a representation matched no known pattern.
    #[error("invalid header start byte {0:#04x} at offset {1}")]
    InvalidHeaderStartByte(u8, usize),
    /// An entry exceeded the dynamic table's maximum length. The table has
    /// been emptied, per RFC 7541 Section 4.4.
    #[error("table entry of {size} bytes exceeds maximum table length {max}")]
    EntryTooLarge { size: usize, max: usize },
    /// A prefixed integer did not fit in 32 bits.
    #[error("prefixed integer overflow")]
    IntegerOverflow,
    /// The input ended in the middle of an integer or string.
    #[error("unexpected end of header block")]
    UnexpectedEndOfData,
    /// A Huffman-coded string failed to decode.
    #[error(transparent)]
    Huffman(#[from] HuffmanError),
}
