//! HTTP/2 framing layer (RFC 7540 §4 and §6).
//!
//! Every frame shares a 9-byte header: a 24-bit big-endian payload length,
//! a type octet, a flags octet, and a 31-bit stream identifier whose top
//! bit is reserved (cleared on write, masked off on read). The nine frame
//! types each get a payload struct that knows its wire layout and
//! validation rules; [`Frame`] is the sum type over them, with
//! [`Frame::Unknown`] preserving unrecognized types since those must be
//! ignored, not rejected.

use std::ops::{BitAnd, BitOr, BitOrAssign, Sub};

use crate::error::{ErrorCode, FrameError};

pub const FRAME_HEADER_LENGTH: usize = 9;

/// Largest flow-control window and stream id: 2^31 - 1.
pub const MAX_WINDOW_SIZE: u32 = 0x7fff_ffff;

const STREAM_ID_MASK: u32 = 0x7fff_ffff;

// -- Flags --

/// Frame flag bitset. `ACK` shares bit 0x1 with `END_STREAM`; which one
/// applies depends on the frame type.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFlags(u8);

impl FrameFlags {
    pub const END_STREAM: FrameFlags = FrameFlags(0x1);
    pub const ACK: FrameFlags = FrameFlags(0x1);
    pub const END_HEADERS: FrameFlags = FrameFlags(0x4);
    pub const PADDED: FrameFlags = FrameFlags(0x8);
    pub const PRIORITY: FrameFlags = FrameFlags(0x20);

    pub const fn empty() -> Self {
        FrameFlags(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        FrameFlags(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: FrameFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FrameFlags {
    type Output = FrameFlags;
    fn bitor(self, rhs: FrameFlags) -> FrameFlags {
        FrameFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for FrameFlags {
    fn bitor_assign(&mut self, rhs: FrameFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FrameFlags {
    type Output = FrameFlags;
    fn bitand(self, rhs: FrameFlags) -> FrameFlags {
        FrameFlags(self.0 & rhs.0)
    }
}

impl Sub for FrameFlags {
    type Output = FrameFlags;
    fn sub(self, rhs: FrameFlags) -> FrameFlags {
        FrameFlags(self.0 & !rhs.0)
    }
}

impl std::fmt::Debug for FrameFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameFlags({:#04x})", self.0)
    }
}

// -- Frame types --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FrameType {
    Data = 0x0,
    Headers = 0x1,
    Priority = 0x2,
    RstStream = 0x3,
    Settings = 0x4,
    PushPromise = 0x5,
    Ping = 0x6,
    GoAway = 0x7,
    WindowUpdate = 0x8,
    Continuation = 0x9,
}

impl FrameType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x0 => Some(Self::Data),
            0x1 => Some(Self::Headers),
            0x2 => Some(Self::Priority),
            0x3 => Some(Self::RstStream),
            0x4 => Some(Self::Settings),
            0x5 => Some(Self::PushPromise),
            0x6 => Some(Self::Ping),
            0x7 => Some(Self::GoAway),
            0x8 => Some(Self::WindowUpdate),
            0x9 => Some(Self::Continuation),
            _ => None,
        }
    }

    /// The flags the type defines; anything else on the wire is ignored.
    pub fn allowed_flags(self) -> FrameFlags {
        match self {
            Self::Data => FrameFlags::END_STREAM | FrameFlags::PADDED,
            Self::Headers => {
                FrameFlags::END_STREAM
                    | FrameFlags::END_HEADERS
                    | FrameFlags::PADDED
                    | FrameFlags::PRIORITY
            }
            Self::Priority | Self::RstStream | Self::GoAway | Self::WindowUpdate => {
                FrameFlags::empty()
            }
            Self::Settings | Self::Ping => FrameFlags::ACK,
            Self::PushPromise => FrameFlags::END_HEADERS | FrameFlags::PADDED,
            Self::Continuation => FrameFlags::END_HEADERS,
        }
    }
}

// -- Frame header --

/// The fixed 9-byte prefix of every frame, in raw wire terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub payload_length: usize,
    pub raw_type: u8,
    pub raw_flags: u8,
    pub stream_id: u32,
}

pub fn encode_frame_header(
    buf: &mut Vec<u8>,
    payload_length: usize,
    raw_type: u8,
    flags: FrameFlags,
    stream_id: u32,
) {
    buf.extend_from_slice(&[
        (payload_length >> 16) as u8,
        (payload_length >> 8) as u8,
        payload_length as u8,
        raw_type,
        flags.bits(),
    ]);
    buf.extend_from_slice(&(stream_id & STREAM_ID_MASK).to_be_bytes());
}

pub fn decode_frame_header(buf: &[u8]) -> Result<FrameHeader, FrameError> {
    if buf.len() < FRAME_HEADER_LENGTH {
        return Err(FrameError::FrameSize);
    }
    let payload_length =
        ((buf[0] as usize) << 16) | ((buf[1] as usize) << 8) | buf[2] as usize;
    let stream_id =
        u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]) & STREAM_ID_MASK;
    Ok(FrameHeader {
        payload_length,
        raw_type: buf[3],
        raw_flags: buf[4],
        stream_id,
    })
}

// -- Shared helpers --

/// Validate `flags` for a frame type, ignoring PADDED which is only ever
/// set through padding itself. Returns the flags to store.
fn checked_flags(requested: FrameFlags, frame_type: FrameType) -> Result<FrameFlags, FrameError> {
    let requested = requested - FrameFlags::PADDED;
    let rejected = requested - frame_type.allowed_flags();
    if rejected.is_empty() {
        Ok(requested)
    } else {
        Err(FrameError::InvalidFlags(rejected))
    }
}

/// Split off the pad-length byte and trailing padding when PADDED is set.
fn strip_padding(payload: &[u8], padded: bool) -> Result<(&[u8], u8), FrameError> {
    if !padded {
        return Ok((payload, 0));
    }
    let (&pad, rest) = payload.split_first().ok_or(FrameError::FrameSize)?;
    if pad as usize >= payload.len() {
        return Err(FrameError::Protocol("padding exceeds payload length"));
    }
    Ok((&rest[..rest.len() - pad as usize], pad))
}

/// Padding that rounds the whole frame, including the pad-length byte, up
/// to the next 4-byte boundary. Zero when the unpadded frame is already
/// aligned.
fn padding_for(unpadded_payload: usize) -> u8 {
    let unpadded = FRAME_HEADER_LENGTH + unpadded_payload;
    if unpadded % 4 == 0 {
        0
    } else {
        (((unpadded + 1 + 4) & !3) - (unpadded + 1)) as u8
    }
}

fn pad_overhead(pad_length: u8) -> usize {
    if pad_length > 0 {
        1 + pad_length as usize
    } else {
        0
    }
}

/// A stream dependency as carried by PRIORITY and prioritized HEADERS:
/// exclusivity bit, 31-bit depended-on stream, and a weight in `1..=256`
/// (transmitted as `weight - 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDependency {
    pub exclusive: bool,
    pub dependency: u32,
    pub weight: u16,
}

impl StreamDependency {
    fn encode(&self, buf: &mut Vec<u8>) {
        let mut word = self.dependency & STREAM_ID_MASK;
        if self.exclusive {
            word |= 0x8000_0000;
        }
        buf.extend_from_slice(&word.to_be_bytes());
        buf.push((self.weight.clamp(1, 256) - 1) as u8);
    }

    fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < 5 {
            return Err(FrameError::FrameSize);
        }
        let word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Ok(Self {
            exclusive: word & 0x8000_0000 != 0,
            dependency: word & STREAM_ID_MASK,
            weight: bytes[4] as u16 + 1,
        })
    }
}

// -- DATA --

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    pub stream_id: u32,
    pub data: Vec<u8>,
    flags: FrameFlags,
    pad_length: u8,
}

impl DataFrame {
    pub fn new(stream_id: u32, data: Vec<u8>) -> Self {
        Self {
            stream_id,
            data,
            flags: FrameFlags::empty(),
            pad_length: 0,
        }
    }

    pub fn flags(&self) -> FrameFlags {
        let mut flags = self.flags;
        if self.pad_length > 0 {
            flags |= FrameFlags::PADDED;
        }
        flags
    }

    pub fn set_flags(&mut self, flags: FrameFlags) -> Result<(), FrameError> {
        self.flags |= checked_flags(flags, FrameType::Data)?;
        Ok(())
    }

    pub fn pad_length(&self) -> u8 {
        self.pad_length
    }

    pub fn suggested_padding(&self) -> u8 {
        padding_for(self.data.len())
    }

    pub fn set_suggested_padding(&mut self) {
        self.pad_length = self.suggested_padding();
    }

    pub fn payload_length(&self) -> usize {
        self.data.len() + pad_overhead(self.pad_length)
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + self.payload_length());
        encode_frame_header(
            &mut buf,
            self.payload_length(),
            FrameType::Data as u8,
            self.flags(),
            self.stream_id,
        );
        if self.pad_length > 0 {
            buf.push(self.pad_length);
        }
        buf.extend_from_slice(&self.data);
        buf.resize(buf.len() + self.pad_length as usize, 0);
        buf
    }

    pub fn decode(payload: &[u8], flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id == 0 {
            return Err(FrameError::Protocol("DATA frame on stream zero"));
        }
        let (data, pad_length) = strip_padding(payload, flags.contains(FrameFlags::PADDED))?;
        Ok(Self {
            stream_id,
            data: data.to_vec(),
            flags: flags - FrameFlags::PADDED,
            pad_length,
        })
    }
}

// -- HEADERS --

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersFrame {
    pub stream_id: u32,
    pub priority: Option<StreamDependency>,
    pub header_block_fragment: Vec<u8>,
    flags: FrameFlags,
    pad_length: u8,
}

impl HeadersFrame {
    pub fn new(stream_id: u32, header_block_fragment: Vec<u8>) -> Self {
        Self {
            stream_id,
            priority: None,
            header_block_fragment,
            flags: FrameFlags::empty(),
            pad_length: 0,
        }
    }

    pub fn flags(&self) -> FrameFlags {
        let mut flags = self.flags;
        if self.pad_length > 0 {
            flags |= FrameFlags::PADDED;
        }
        if self.priority.is_some() {
            flags |= FrameFlags::PRIORITY;
        }
        flags
    }

    pub fn set_flags(&mut self, flags: FrameFlags) -> Result<(), FrameError> {
        // PRIORITY follows the dependency field, like PADDED follows padding;
        // setting it without one would advertise a block the payload lacks.
        self.flags |= checked_flags(flags, FrameType::Headers)? - FrameFlags::PRIORITY;
        Ok(())
    }

    pub fn pad_length(&self) -> u8 {
        self.pad_length
    }

    fn unpadded_payload_length(&self) -> usize {
        self.header_block_fragment.len() + if self.priority.is_some() { 5 } else { 0 }
    }

    pub fn suggested_padding(&self) -> u8 {
        padding_for(self.unpadded_payload_length())
    }

    pub fn set_suggested_padding(&mut self) {
        self.pad_length = self.suggested_padding();
    }

    pub fn payload_length(&self) -> usize {
        self.unpadded_payload_length() + pad_overhead(self.pad_length)
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + self.payload_length());
        encode_frame_header(
            &mut buf,
            self.payload_length(),
            FrameType::Headers as u8,
            self.flags(),
            self.stream_id,
        );
        if self.pad_length > 0 {
            buf.push(self.pad_length);
        }
        if let Some(priority) = &self.priority {
            priority.encode(&mut buf);
        }
        buf.extend_from_slice(&self.header_block_fragment);
        buf.resize(buf.len() + self.pad_length as usize, 0);
        buf
    }

    pub fn decode(payload: &[u8], flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id == 0 {
            return Err(FrameError::Protocol("HEADERS frame on stream zero"));
        }
        let (body, pad_length) = strip_padding(payload, flags.contains(FrameFlags::PADDED))?;
        let (priority, fragment) = if flags.contains(FrameFlags::PRIORITY) {
            let dependency = StreamDependency::decode(body)?;
            (Some(dependency), &body[5..])
        } else {
            (None, body)
        };
        Ok(Self {
            stream_id,
            priority,
            header_block_fragment: fragment.to_vec(),
            flags: (flags - FrameFlags::PADDED) - FrameFlags::PRIORITY,
            pad_length,
        })
    }
}

// -- PRIORITY --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityFrame {
    pub stream_id: u32,
    pub dependency: StreamDependency,
}

impl PriorityFrame {
    pub fn new(stream_id: u32, dependency: StreamDependency) -> Self {
        Self {
            stream_id,
            dependency,
        }
    }

    pub fn flags(&self) -> FrameFlags {
        FrameFlags::empty()
    }

    pub fn payload_length(&self) -> usize {
        5
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + 5);
        encode_frame_header(&mut buf, 5, FrameType::Priority as u8, self.flags(), self.stream_id);
        self.dependency.encode(&mut buf);
        buf
    }

    pub fn decode(payload: &[u8], _flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id == 0 {
            return Err(FrameError::Protocol("PRIORITY frame on stream zero"));
        }
        if payload.len() != 5 {
            return Err(FrameError::FrameSize);
        }
        Ok(Self {
            stream_id,
            dependency: StreamDependency::decode(payload)?,
        })
    }
}

// -- RST_STREAM --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RstStreamFrame {
    pub stream_id: u32,
    pub error_code: ErrorCode,
}

impl RstStreamFrame {
    pub fn new(stream_id: u32, error_code: ErrorCode) -> Self {
        Self {
            stream_id,
            error_code,
        }
    }

    pub fn flags(&self) -> FrameFlags {
        FrameFlags::empty()
    }

    pub fn payload_length(&self) -> usize {
        4
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + 4);
        encode_frame_header(&mut buf, 4, FrameType::RstStream as u8, self.flags(), self.stream_id);
        buf.extend_from_slice(&(self.error_code as u32).to_be_bytes());
        buf
    }

    pub fn decode(payload: &[u8], _flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id == 0 {
            return Err(FrameError::Protocol("RST_STREAM frame on stream zero"));
        }
        if payload.len() != 4 {
            return Err(FrameError::FrameSize);
        }
        let code = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
        Ok(Self {
            stream_id,
            error_code: ErrorCode::from_u32(code),
        })
    }
}

// -- SETTINGS --

/// One SETTINGS parameter, typed (RFC 7540 §6.5.2). Unknown wire ids are
/// skipped on decode, never surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsParameter {
    HeaderTableSize(u32),
    EnablePush(bool),
    MaxConcurrentStreams(u32),
    InitialWindowSize(u32),
    MaxFrameSize(u32),
    MaxHeaderListSize(u32),
}

impl SettingsParameter {
    pub fn id(&self) -> u16 {
        match self {
            Self::HeaderTableSize(_) => 0x1,
            Self::EnablePush(_) => 0x2,
            Self::MaxConcurrentStreams(_) => 0x3,
            Self::InitialWindowSize(_) => 0x4,
            Self::MaxFrameSize(_) => 0x5,
            Self::MaxHeaderListSize(_) => 0x6,
        }
    }

    pub fn value(&self) -> u32 {
        match *self {
            Self::HeaderTableSize(v)
            | Self::MaxConcurrentStreams(v)
            | Self::InitialWindowSize(v)
            | Self::MaxFrameSize(v)
            | Self::MaxHeaderListSize(v) => v,
            Self::EnablePush(enabled) => enabled as u32,
        }
    }

    /// Map a wire (id, value) pair to a parameter. `Ok(None)` means an
    /// unknown id to ignore; invalid values for known ids are errors.
    pub fn from_wire(id: u16, value: u32) -> Result<Option<Self>, FrameError> {
        match id {
            0x1 => Ok(Some(Self::HeaderTableSize(value))),
            0x2 => match value {
                0 => Ok(Some(Self::EnablePush(false))),
                1 => Ok(Some(Self::EnablePush(true))),
                _ => Err(FrameError::Protocol("ENABLE_PUSH must be 0 or 1")),
            },
            0x3 => Ok(Some(Self::MaxConcurrentStreams(value))),
            0x4 => {
                if value > MAX_WINDOW_SIZE {
                    Err(FrameError::FlowControl("INITIAL_WINDOW_SIZE above 2^31-1"))
                } else {
                    Ok(Some(Self::InitialWindowSize(value)))
                }
            }
            0x5 => {
                if (16_384..=16_777_215).contains(&value) {
                    Ok(Some(Self::MaxFrameSize(value)))
                } else {
                    Err(FrameError::Protocol("MAX_FRAME_SIZE out of range"))
                }
            }
            0x6 => Ok(Some(Self::MaxHeaderListSize(value))),
            _ => Ok(None),
        }
    }
}

/// SETTINGS always travels on stream zero, so no stream id field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFrame {
    pub parameters: Vec<SettingsParameter>,
    flags: FrameFlags,
}

impl SettingsFrame {
    pub fn new(parameters: Vec<SettingsParameter>) -> Self {
        Self {
            parameters,
            flags: FrameFlags::empty(),
        }
    }

    /// An acknowledgement frame; it carries no parameters by definition.
    pub fn ack() -> Self {
        Self {
            parameters: Vec::new(),
            flags: FrameFlags::ACK,
        }
    }

    pub fn is_ack(&self) -> bool {
        self.flags.contains(FrameFlags::ACK)
    }

    pub fn flags(&self) -> FrameFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: FrameFlags) -> Result<(), FrameError> {
        self.flags |= checked_flags(flags, FrameType::Settings)?;
        Ok(())
    }

    pub fn payload_length(&self) -> usize {
        if self.is_ack() {
            0
        } else {
            self.parameters.len() * 6
        }
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + self.payload_length());
        encode_frame_header(&mut buf, self.payload_length(), FrameType::Settings as u8, self.flags, 0);
        if !self.is_ack() {
            for parameter in &self.parameters {
                buf.extend_from_slice(&parameter.id().to_be_bytes());
                buf.extend_from_slice(&parameter.value().to_be_bytes());
            }
        }
        buf
    }

    pub fn decode(payload: &[u8], flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id != 0 {
            return Err(FrameError::Protocol("SETTINGS frame on a nonzero stream"));
        }
        if flags.contains(FrameFlags::ACK) {
            if !payload.is_empty() {
                return Err(FrameError::FrameSize);
            }
            return Ok(Self::ack());
        }
        if payload.len() % 6 != 0 {
            return Err(FrameError::FrameSize);
        }
        let mut parameters = Vec::with_capacity(payload.len() / 6);
        for chunk in payload.chunks_exact(6) {
            let id = u16::from_be_bytes([chunk[0], chunk[1]]);
            let value = u32::from_be_bytes([chunk[2], chunk[3], chunk[4], chunk[5]]);
            if let Some(parameter) = SettingsParameter::from_wire(id, value)? {
                parameters.push(parameter);
            }
        }
        Ok(Self::new(parameters))
    }
}

// -- PUSH_PROMISE --

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPromiseFrame {
    pub stream_id: u32,
    pub promised_stream_id: u32,
    pub header_block_fragment: Vec<u8>,
    flags: FrameFlags,
    pad_length: u8,
}

impl PushPromiseFrame {
    pub fn new(stream_id: u32, promised_stream_id: u32, header_block_fragment: Vec<u8>) -> Self {
        Self {
            stream_id,
            promised_stream_id,
            header_block_fragment,
            flags: FrameFlags::empty(),
            pad_length: 0,
        }
    }

    pub fn flags(&self) -> FrameFlags {
        let mut flags = self.flags;
        if self.pad_length > 0 {
            flags |= FrameFlags::PADDED;
        }
        flags
    }

    pub fn set_flags(&mut self, flags: FrameFlags) -> Result<(), FrameError> {
        self.flags |= checked_flags(flags, FrameType::PushPromise)?;
        Ok(())
    }

    pub fn pad_length(&self) -> u8 {
        self.pad_length
    }

    pub fn suggested_padding(&self) -> u8 {
        padding_for(self.header_block_fragment.len() + 4)
    }

    pub fn set_suggested_padding(&mut self) {
        self.pad_length = self.suggested_padding();
    }

    pub fn payload_length(&self) -> usize {
        4 + self.header_block_fragment.len() + pad_overhead(self.pad_length)
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + self.payload_length());
        encode_frame_header(
            &mut buf,
            self.payload_length(),
            FrameType::PushPromise as u8,
            self.flags(),
            self.stream_id,
        );
        if self.pad_length > 0 {
            buf.push(self.pad_length);
        }
        buf.extend_from_slice(&(self.promised_stream_id & STREAM_ID_MASK).to_be_bytes());
        buf.extend_from_slice(&self.header_block_fragment);
        buf.resize(buf.len() + self.pad_length as usize, 0);
        buf
    }

    pub fn decode(payload: &[u8], flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id == 0 {
            return Err(FrameError::Protocol("PUSH_PROMISE frame on stream zero"));
        }
        let (body, pad_length) = strip_padding(payload, flags.contains(FrameFlags::PADDED))?;
        if body.len() < 4 {
            return Err(FrameError::FrameSize);
        }
        let promised =
            u32::from_be_bytes([body[0], body[1], body[2], body[3]]) & STREAM_ID_MASK;
        if promised == 0 {
            return Err(FrameError::Protocol("promised stream id is zero"));
        }
        Ok(Self {
            stream_id,
            promised_stream_id: promised,
            header_block_fragment: body[4..].to_vec(),
            flags: flags - FrameFlags::PADDED,
            pad_length,
        })
    }
}

// -- PING --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingFrame {
    pub opaque_data: [u8; 8],
    flags: FrameFlags,
}

impl PingFrame {
    pub fn new(opaque_data: [u8; 8]) -> Self {
        Self {
            opaque_data,
            flags: FrameFlags::empty(),
        }
    }

    /// The acknowledgement echoing a received ping's payload.
    pub fn ack(opaque_data: [u8; 8]) -> Self {
        Self {
            opaque_data,
            flags: FrameFlags::ACK,
        }
    }

    pub fn is_ack(&self) -> bool {
        self.flags.contains(FrameFlags::ACK)
    }

    pub fn flags(&self) -> FrameFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: FrameFlags) -> Result<(), FrameError> {
        self.flags |= checked_flags(flags, FrameType::Ping)?;
        Ok(())
    }

    pub fn payload_length(&self) -> usize {
        8
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + 8);
        encode_frame_header(&mut buf, 8, FrameType::Ping as u8, self.flags, 0);
        buf.extend_from_slice(&self.opaque_data);
        buf
    }

    pub fn decode(payload: &[u8], flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id != 0 {
            return Err(FrameError::Protocol("PING frame on a nonzero stream"));
        }
        if payload.len() != 8 {
            return Err(FrameError::FrameSize);
        }
        let mut opaque_data = [0u8; 8];
        opaque_data.copy_from_slice(payload);
        Ok(Self {
            opaque_data,
            flags,
        })
    }
}

// -- GOAWAY --

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoAwayFrame {
    pub last_stream_id: u32,
    pub error_code: ErrorCode,
    pub debug_data: Vec<u8>,
}

impl GoAwayFrame {
    pub fn new(last_stream_id: u32, error_code: ErrorCode, debug_data: Vec<u8>) -> Self {
        Self {
            last_stream_id,
            error_code,
            debug_data,
        }
    }

    pub fn flags(&self) -> FrameFlags {
        FrameFlags::empty()
    }

    pub fn payload_length(&self) -> usize {
        8 + self.debug_data.len()
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + self.payload_length());
        encode_frame_header(&mut buf, self.payload_length(), FrameType::GoAway as u8, self.flags(), 0);
        buf.extend_from_slice(&(self.last_stream_id & STREAM_ID_MASK).to_be_bytes());
        buf.extend_from_slice(&(self.error_code as u32).to_be_bytes());
        buf.extend_from_slice(&self.debug_data);
        buf
    }

    pub fn decode(payload: &[u8], _flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id != 0 {
            return Err(FrameError::Protocol("GOAWAY frame on a nonzero stream"));
        }
        if payload.len() < 8 {
            return Err(FrameError::FrameSize);
        }
        let last =
            u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) & STREAM_ID_MASK;
        let code = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);
        Ok(Self {
            last_stream_id: last,
            error_code: ErrorCode::from_u32(code),
            debug_data: payload[8..].to_vec(),
        })
    }
}

// -- WINDOW_UPDATE --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUpdateFrame {
    /// Zero applies the increment to the connection window.
    pub stream_id: u32,
    pub increment: u32,
}

impl WindowUpdateFrame {
    pub fn new(stream_id: u32, increment: u32) -> Self {
        Self {
            stream_id,
            increment,
        }
    }

    pub fn flags(&self) -> FrameFlags {
        FrameFlags::empty()
    }

    pub fn payload_length(&self) -> usize {
        4
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + 4);
        encode_frame_header(&mut buf, 4, FrameType::WindowUpdate as u8, self.flags(), self.stream_id);
        buf.extend_from_slice(&(self.increment & STREAM_ID_MASK).to_be_bytes());
        buf
    }

    pub fn decode(payload: &[u8], _flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if payload.len() != 4 {
            return Err(FrameError::FrameSize);
        }
        let increment =
            u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) & STREAM_ID_MASK;
        if increment == 0 {
            return Err(FrameError::Protocol("window increment of zero"));
        }
        Ok(Self {
            stream_id,
            increment,
        })
    }
}

// -- CONTINUATION --

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationFrame {
    pub stream_id: u32,
    pub header_block_fragment: Vec<u8>,
    flags: FrameFlags,
}

impl ContinuationFrame {
    pub fn new(stream_id: u32, header_block_fragment: Vec<u8>) -> Self {
        Self {
            stream_id,
            header_block_fragment,
            flags: FrameFlags::empty(),
        }
    }

    pub fn flags(&self) -> FrameFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: FrameFlags) -> Result<(), FrameError> {
        self.flags |= checked_flags(flags, FrameType::Continuation)?;
        Ok(())
    }

    pub fn payload_length(&self) -> usize {
        self.header_block_fragment.len()
    }

    pub fn encode_frame(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_LENGTH + self.payload_length());
        encode_frame_header(
            &mut buf,
            self.payload_length(),
            FrameType::Continuation as u8,
            self.flags,
            self.stream_id,
        );
        buf.extend_from_slice(&self.header_block_fragment);
        buf
    }

    pub fn decode(payload: &[u8], flags: FrameFlags, stream_id: u32) -> Result<Self, FrameError> {
        if stream_id == 0 {
            return Err(FrameError::Protocol("CONTINUATION frame on stream zero"));
        }
        Ok(Self {
            stream_id,
            header_block_fragment: payload.to_vec(),
            flags,
        })
    }
}

// -- Sum type --

/// Any HTTP/2 frame. Unknown types are preserved rather than rejected,
/// since RFC 7540 §4.1 requires implementations to ignore them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(DataFrame),
    Headers(HeadersFrame),
    Priority(PriorityFrame),
    RstStream(RstStreamFrame),
    Settings(SettingsFrame),
    PushPromise(PushPromiseFrame),
    Ping(PingFrame),
    GoAway(GoAwayFrame),
    WindowUpdate(WindowUpdateFrame),
    Continuation(ContinuationFrame),
    Unknown {
        frame_type: u8,
        flags: u8,
        stream_id: u32,
        payload: Vec<u8>,
    },
}

impl Frame {
    /// Decode one complete frame from the start of `buf`. Fails with
    /// [`FrameError::FrameSize`] when `buf` does not hold the whole frame.
    ///
    /// Inbound flags are masked to the bits the frame type defines before
    /// payload decoding, so undefined flag bits never affect the result.
    pub fn decode(buf: &[u8]) -> Result<Frame, FrameError> {
        let header = decode_frame_header(buf)?;
        let end = FRAME_HEADER_LENGTH + header.payload_length;
        if buf.len() < end {
            return Err(FrameError::FrameSize);
        }
        let payload = &buf[FRAME_HEADER_LENGTH..end];

        let Some(frame_type) = FrameType::from_u8(header.raw_type) else {
            return Ok(Frame::Unknown {
                frame_type: header.raw_type,
                flags: header.raw_flags,
                stream_id: header.stream_id,
                payload: payload.to_vec(),
            });
        };
        let flags = FrameFlags::from_bits(header.raw_flags & frame_type.allowed_flags().bits());
        let stream_id = header.stream_id;

        match frame_type {
            FrameType::Data => DataFrame::decode(payload, flags, stream_id).map(Frame::Data),
            FrameType::Headers => {
                HeadersFrame::decode(payload, flags, stream_id).map(Frame::Headers)
            }
            FrameType::Priority => {
                PriorityFrame::decode(payload, flags, stream_id).map(Frame::Priority)
            }
            FrameType::RstStream => {
                RstStreamFrame::decode(payload, flags, stream_id).map(Frame::RstStream)
            }
            FrameType::Settings => {
                SettingsFrame::decode(payload, flags, stream_id).map(Frame::Settings)
            }
            FrameType::PushPromise => {
                PushPromiseFrame::decode(payload, flags, stream_id).map(Frame::PushPromise)
            }
            FrameType::Ping => PingFrame::decode(payload, flags, stream_id).map(Frame::Ping),
            FrameType::GoAway => {
                GoAwayFrame::decode(payload, flags, stream_id).map(Frame::GoAway)
            }
            FrameType::WindowUpdate => {
                WindowUpdateFrame::decode(payload, flags, stream_id).map(Frame::WindowUpdate)
            }
            FrameType::Continuation => {
                ContinuationFrame::decode(payload, flags, stream_id).map(Frame::Continuation)
            }
        }
    }

    /// Total byte length of the frame on the wire, header included.
    pub fn frame_length(&self) -> usize {
        FRAME_HEADER_LENGTH
            + match self {
                Frame::Data(f) => f.payload_length(),
                Frame::Headers(f) => f.payload_length(),
                Frame::Priority(f) => f.payload_length(),
                Frame::RstStream(f) => f.payload_length(),
                Frame::Settings(f) => f.payload_length(),
                Frame::PushPromise(f) => f.payload_length(),
                Frame::Ping(f) => f.payload_length(),
                Frame::GoAway(f) => f.payload_length(),
                Frame::WindowUpdate(f) => f.payload_length(),
                Frame::Continuation(f) => f.payload_length(),
                Frame::Unknown { payload, .. } => payload.len(),
            }
    }
}
