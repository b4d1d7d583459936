//! Malformed frames and the errors they produce.

use h2_wire::{encode_frame_header, Frame, FrameError, FrameFlags};

fn frame(payload_length: usize, raw_type: u8, flags: u8, stream_id: u32, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_frame_header(
        &mut buf,
        payload_length,
        raw_type,
        FrameFlags::from_bits(flags),
        stream_id,
    );
    buf.extend_from_slice(payload);
    buf
}

#[test]
fn header_shorter_than_nine_bytes() {
    assert_eq!(Frame::decode(&[]), Err(FrameError::FrameSize));
    assert_eq!(Frame::decode(&[0; 8]), Err(FrameError::FrameSize));
}

#[test]
fn payload_shorter_than_header_claims() {
    let bytes = frame(10, 0x0, 0x0, 1, b"short");
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
}

#[test]
fn stream_zero_where_a_stream_is_required() {
    for raw_type in [0x0u8, 0x1, 0x9] {
        let bytes = frame(0, raw_type, 0x0, 0, &[]);
        assert!(
            matches!(Frame::decode(&bytes), Err(FrameError::Protocol(_))),
            "type {raw_type:#x}"
        );
    }
    // PRIORITY and RST_STREAM also need a stream, with fixed-size payloads
    let bytes = frame(5, 0x2, 0x0, 0, &[0; 5]);
    assert!(matches!(Frame::decode(&bytes), Err(FrameError::Protocol(_))));
    let bytes = frame(4, 0x3, 0x0, 0, &[0; 4]);
    assert!(matches!(Frame::decode(&bytes), Err(FrameError::Protocol(_))));
}

#[test]
fn nonzero_stream_where_the_connection_is_required() {
    for (raw_type, payload) in [(0x4u8, &[] as &[u8]), (0x6, &[0; 8]), (0x7, &[0; 8])] {
        let bytes = frame(payload.len(), raw_type, 0x0, 1, payload);
        assert!(
            matches!(Frame::decode(&bytes), Err(FrameError::Protocol(_))),
            "type {raw_type:#x}"
        );
    }
}

#[test]
fn fixed_size_payloads_enforce_their_length() {
    // PRIORITY must be exactly 5
    let bytes = frame(6, 0x2, 0x0, 1, &[0; 6]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
    // RST_STREAM and WINDOW_UPDATE exactly 4
    let bytes = frame(5, 0x3, 0x0, 1, &[0; 5]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
    let bytes = frame(3, 0x8, 0x0, 1, &[0; 3]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
    // PING exactly 8
    let bytes = frame(9, 0x6, 0x0, 0, &[0; 9]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
    // GOAWAY at least 8
    let bytes = frame(7, 0x7, 0x0, 0, &[0; 7]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
    // SETTINGS payloads come in 6-byte units
    let bytes = frame(5, 0x4, 0x0, 0, &[0; 5]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
}

#[test]
fn padding_that_swallows_the_payload() {
    // PADDED with an empty payload: no room for the pad-length byte
    let bytes = frame(0, 0x0, 0x8, 1, &[]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));

    // pad length exceeding the remaining payload
    let bytes = frame(4, 0x1, 0x8, 1, &[200, 0x82, 0x00, 0x00]);
    assert!(matches!(Frame::decode(&bytes), Err(FrameError::Protocol(_))));
}

#[test]
fn zero_window_increment_is_a_protocol_error() {
    let bytes = frame(4, 0x8, 0x0, 1, &[0, 0, 0, 0]);
    assert_eq!(
        Frame::decode(&bytes),
        Err(FrameError::Protocol("window increment of zero"))
    );
}

#[test]
fn settings_value_violations() {
    // ENABLE_PUSH = 2
    let bytes = frame(6, 0x4, 0x0, 0, &[0x00, 0x02, 0x00, 0x00, 0x00, 0x02]);
    assert!(matches!(Frame::decode(&bytes), Err(FrameError::Protocol(_))));

    // INITIAL_WINDOW_SIZE = 2^31
    let bytes = frame(6, 0x4, 0x0, 0, &[0x00, 0x04, 0x80, 0x00, 0x00, 0x00]);
    assert!(matches!(
        Frame::decode(&bytes),
        Err(FrameError::FlowControl(_))
    ));

    // MAX_FRAME_SIZE above 2^24-1
    let bytes = frame(6, 0x4, 0x0, 0, &[0x00, 0x05, 0x01, 0x00, 0x00, 0x00]);
    assert!(matches!(Frame::decode(&bytes), Err(FrameError::Protocol(_))));
}

#[test]
fn settings_ack_must_be_empty() {
    let bytes = frame(6, 0x4, 0x1, 0, &[0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
}

#[test]
fn push_promise_needs_a_promised_stream() {
    let bytes = frame(4, 0x5, 0x0, 1, &[0x00, 0x00, 0x00, 0x00]);
    assert_eq!(
        Frame::decode(&bytes),
        Err(FrameError::Protocol("promised stream id is zero"))
    );
    // and at least the 4-byte promised-stream field
    let bytes = frame(3, 0x5, 0x0, 1, &[0x00, 0x00, 0x00]);
    assert_eq!(Frame::decode(&bytes), Err(FrameError::FrameSize));
}
