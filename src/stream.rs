//! HTTP/2 stream lifecycle states (RFC 7540 §5.1).

/// The state of a non-idle stream. Transition logic lives with connection
/// handling, not here; this type only names where a stream stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    /// Reserved following transmission or receipt of a PUSH_PROMISE frame.
    ///
    /// `local` is `true` when this endpoint sent the PUSH_PROMISE, `false`
    /// when the peer's PUSH_PROMISE was received.
    Reserved { local: bool },

    /// Open and available for both endpoints to send frames of any type.
    Open,

    /// One endpoint has closed the stream while the other has it open.
    ///
    /// With `local` set, this endpoint closed the stream and may send no
    /// more frames. Otherwise the peer signaled closure with END_STREAM;
    /// the stream should then only receive WINDOW_UPDATE, PRIORITY, or
    /// RST_STREAM, but may still be used to send any frame type.
    HalfClosed { local: bool },

    /// Closed for sending and receiving, with the exception of PRIORITY
    /// frames.
    Closed,
}
