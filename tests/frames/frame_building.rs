//! Encoding frames to wire bytes: layouts, flags, and padding.

use h2_wire::{
    ContinuationFrame, DataFrame, ErrorCode, Frame, FrameFlags, GoAwayFrame, HeadersFrame,
    PingFrame, PriorityFrame, PushPromiseFrame, RstStreamFrame, SettingsFrame,
    SettingsParameter, StreamDependency, WindowUpdateFrame, FRAME_HEADER_LENGTH,
};

#[test]
fn every_frame_type_round_trips() {
    let mut headers = HeadersFrame::new(3, vec![0x82]);
    headers.set_flags(FrameFlags::END_HEADERS).unwrap();

    let frames: Vec<Frame> = vec![
        Frame::Data(DataFrame::new(1, b"payload".to_vec())),
        Frame::Headers(headers),
        Frame::Priority(PriorityFrame::new(
            5,
            StreamDependency {
                exclusive: false,
                dependency: 0,
                weight: 1,
            },
        )),
        Frame::RstStream(RstStreamFrame::new(7, ErrorCode::StreamClosed)),
        Frame::Settings(SettingsFrame::new(vec![SettingsParameter::MaxFrameSize(
            16_384,
        )])),
        Frame::PushPromise(PushPromiseFrame::new(1, 2, vec![0x84])),
        Frame::Ping(PingFrame::new([0; 8])),
        Frame::GoAway(GoAwayFrame::new(9, ErrorCode::NoError, Vec::new())),
        Frame::WindowUpdate(WindowUpdateFrame::new(0, 65_535)),
        Frame::Continuation(ContinuationFrame::new(3, vec![0x86])),
    ];

    for frame in frames {
        let bytes = match &frame {
            Frame::Data(f) => f.encode_frame(),
            Frame::Headers(f) => f.encode_frame(),
            Frame::Priority(f) => f.encode_frame(),
            Frame::RstStream(f) => f.encode_frame(),
            Frame::Settings(f) => f.encode_frame(),
            Frame::PushPromise(f) => f.encode_frame(),
            Frame::Ping(f) => f.encode_frame(),
            Frame::GoAway(f) => f.encode_frame(),
            Frame::WindowUpdate(f) => f.encode_frame(),
            Frame::Continuation(f) => f.encode_frame(),
            Frame::Unknown { .. } => unreachable!(),
        };
        assert_eq!(bytes.len(), frame.frame_length());
        assert_eq!(Frame::decode(&bytes).unwrap(), frame, "{frame:?}");
    }
}

#[test]
fn suggested_padding_aligns_the_whole_frame() {
    for payload_len in 0..64usize {
        let mut frame = DataFrame::new(1, vec![0xaa; payload_len]);
        frame.set_suggested_padding();
        let bytes = frame.encode_frame();
        assert_eq!(bytes.len() % 4, 0, "payload length {payload_len}");
        // padding never exceeds one alignment step plus the pad byte
        assert!(bytes.len() - FRAME_HEADER_LENGTH - payload_len <= 5);
    }
}

#[test]
fn padding_octets_are_zero() {
    let mut frame = HeadersFrame::new(1, vec![0xff; 6]);
    frame.set_suggested_padding();
    let bytes = frame.encode_frame();
    let pad = frame.pad_length() as usize;
    assert!(pad > 0);
    assert!(bytes[bytes.len() - pad..].iter().all(|&b| b == 0));
}

#[test]
fn flag_legality_is_per_frame_type() {
    // END_HEADERS belongs to HEADERS but not DATA
    let mut headers = HeadersFrame::new(1, Vec::new());
    headers
        .set_flags(FrameFlags::END_HEADERS | FrameFlags::END_STREAM)
        .unwrap();

    let mut data = DataFrame::new(1, Vec::new());
    assert!(data.set_flags(FrameFlags::END_HEADERS).is_err());
    assert!(data.set_flags(FrameFlags::END_STREAM).is_ok());

    let mut continuation = ContinuationFrame::new(1, Vec::new());
    assert!(continuation.set_flags(FrameFlags::END_STREAM).is_err());
    assert!(continuation.set_flags(FrameFlags::END_HEADERS).is_ok());

    let mut settings = SettingsFrame::new(Vec::new());
    assert!(settings.set_flags(FrameFlags::PRIORITY).is_err());
    assert!(settings.set_flags(FrameFlags::ACK).is_ok());
}

#[test]
fn weight_is_transmitted_off_by_one() {
    for (weight, wire) in [(1u16, 0u8), (16, 15), (256, 255)] {
        let frame = PriorityFrame::new(
            1,
            StreamDependency {
                exclusive: false,
                dependency: 0,
                weight,
            },
        );
        let bytes = frame.encode_frame();
        assert_eq!(bytes[13], wire);
        match Frame::decode(&bytes).unwrap() {
            Frame::Priority(decoded) => assert_eq!(decoded.dependency.weight, weight),
            other => panic!("expected PRIORITY, got {other:?}"),
        }
    }
}

#[test]
fn settings_wire_layout_is_six_bytes_per_parameter() {
    let frame = SettingsFrame::new(vec![
        SettingsParameter::HeaderTableSize(4096),
        SettingsParameter::EnablePush(true),
        SettingsParameter::MaxHeaderListSize(8192),
    ]);
    let bytes = frame.encode_frame();
    assert_eq!(bytes.len(), FRAME_HEADER_LENGTH + 18);
    assert_eq!(&bytes[9..15], [0x00, 0x01, 0x00, 0x00, 0x10, 0x00]);
    assert_eq!(&bytes[15..21], [0x00, 0x02, 0x00, 0x00, 0x00, 0x01]);
    assert_eq!(&bytes[21..27], [0x00, 0x06, 0x00, 0x00, 0x20, 0x00]);
}
