//! h2-wire: A sans-I/O HTTP/2 wire codec
//!
//! Binary framing for all nine RFC 7540 frame types plus a complete
//! RFC 7541 HPACK implementation, synchronous and transport-agnostic.
//!
//! # Features
//!
//! - **Sans-I/O Design**: No async runtime dependencies (no tokio)
//! - **RFC 7540 Framing**: Typed encode/decode for DATA, HEADERS, PRIORITY,
//!   RST_STREAM, SETTINGS, PUSH_PROMISE, PING, GOAWAY, WINDOW_UPDATE, and
//!   CONTINUATION, with per-type flag and layout validation
//! - **RFC 7541 HPACK**: Static and dynamic tables, Huffman coding, and
//!   prefixed-integer primitives, all in-house
//! - **Strict Where It Matters**: Malformed frames and header blocks fail
//!   with precise errors; unknown frame types and SETTINGS ids are ignored
//!   as the RFC requires
//!
//! # Quick Start
//!
//! ```rust
//! use h2_wire::{DataFrame, Frame, FrameFlags, HpackDecoder, HpackEncoder};
//!
//! // Frame a payload and parse it back
//! let mut data = DataFrame::new(1, b"hello".to_vec());
//! data.set_flags(FrameFlags::END_STREAM).unwrap();
//! let bytes = data.encode_frame();
//! assert!(matches!(Frame::decode(&bytes).unwrap(), Frame::Data(_)));
//!
//! // Compress a header block and decode it on the other side
//! let mut encoder = HpackEncoder::new();
//! encoder.append(":method", "GET");
//! let mut decoder = HpackDecoder::new();
//! let headers = decoder.decode_headers(encoder.data()).unwrap();
//! assert_eq!(headers[0].name, ":method");
//! ```
//!
//! # Architecture
//!
//! This crate is intentionally minimal. It provides:
//! - Frame encoding and decoding (structs ↔ bytes)
//! - HPACK encoding and decoding with shared table state
//! - The stream-state vocabulary of RFC 7540 §5.1
//!
//! It does NOT provide:
//! - TCP/UDP transport (you provide the bytes)
//! - TLS (use rustls or similar)
//! - Connection and stream management (your responsibility)

pub mod dynamic_table;
pub mod error;
pub mod frame;
pub mod hpack;
pub mod huffman;
pub mod indexed_table;
pub mod integer;
pub mod static_table;
pub mod stream;

pub use error::{ErrorCode, FrameError, HpackError, HuffmanError};
pub use frame::{
    ContinuationFrame, DataFrame, Frame, FrameFlags, FrameHeader, FrameType, GoAwayFrame,
    HeadersFrame, PingFrame, PriorityFrame, PushPromiseFrame, RstStreamFrame, SettingsFrame,
    SettingsParameter, StreamDependency, WindowUpdateFrame, decode_frame_header,
    encode_frame_header, FRAME_HEADER_LENGTH,
};
pub use hpack::{H2Header, HpackDecoder, HpackEncoder};
pub use huffman::{HuffmanDecoder, HuffmanEncoder};
pub use indexed_table::IndexedHeaderTable;
pub use stream::StreamState;
