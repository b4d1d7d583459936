//! Decoding frames from raw wire bytes.

use h2_wire::{
    decode_frame_header, ErrorCode, Frame, FrameFlags, SettingsParameter, StreamDependency,
};

#[test]
fn parses_a_data_frame_header() {
    let bytes = [
        0x00, 0x00, 0x05, // length 5
        0x00, // DATA
        0x01, // END_STREAM
        0x00, 0x00, 0x00, 0x01, // stream 1
        b'h', b'e', b'l', b'l', b'o',
    ];
    let header = decode_frame_header(&bytes).unwrap();
    assert_eq!(header.payload_length, 5);
    assert_eq!(header.raw_type, 0x00);
    assert_eq!(header.stream_id, 1);

    match Frame::decode(&bytes).unwrap() {
        Frame::Data(frame) => {
            assert_eq!(frame.stream_id, 1);
            assert_eq!(frame.data, b"hello");
            assert!(frame.flags().contains(FrameFlags::END_STREAM));
            assert_eq!(frame.payload_length(), 5);
        }
        other => panic!("expected DATA, got {other:?}"),
    }
}

#[test]
fn parses_padded_headers_with_priority() {
    let bytes = [
        0x00, 0x00, 0x0a, // length 10
        0x01, // HEADERS
        0x2d, // END_STREAM | END_HEADERS | PADDED | PRIORITY
        0x00, 0x00, 0x00, 0x03, // stream 3
        0x02, // pad length 2
        0x80, 0x00, 0x00, 0x01, // exclusive dependency on stream 1
        0x0f, // weight 16
        0x82, 0x84, // fragment
        0x00, 0x00, // padding
    ];
    match Frame::decode(&bytes).unwrap() {
        Frame::Headers(frame) => {
            assert_eq!(frame.stream_id, 3);
            assert_eq!(
                frame.priority,
                Some(StreamDependency {
                    exclusive: true,
                    dependency: 1,
                    weight: 16,
                })
            );
            assert_eq!(frame.header_block_fragment, [0x82, 0x84]);
            assert_eq!(frame.pad_length(), 2);
            assert!(frame.flags().contains(FrameFlags::END_STREAM | FrameFlags::END_HEADERS));
        }
        other => panic!("expected HEADERS, got {other:?}"),
    }
}

#[test]
fn parses_a_settings_exchange() {
    let bytes = [
        0x00, 0x00, 0x0c, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, // SETTINGS, 12 bytes
        0x00, 0x01, 0x00, 0x00, 0x10, 0x00, // HEADER_TABLE_SIZE = 4096
        0x00, 0x04, 0x00, 0x00, 0xff, 0xff, // INITIAL_WINDOW_SIZE = 65535
    ];
    match Frame::decode(&bytes).unwrap() {
        Frame::Settings(frame) => {
            assert!(!frame.is_ack());
            assert_eq!(
                frame.parameters,
                [
                    SettingsParameter::HeaderTableSize(4096),
                    SettingsParameter::InitialWindowSize(65_535),
                ]
            );
        }
        other => panic!("expected SETTINGS, got {other:?}"),
    }

    let ack = [0x00, 0x00, 0x00, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00];
    match Frame::decode(&ack).unwrap() {
        Frame::Settings(frame) => assert!(frame.is_ack()),
        other => panic!("expected SETTINGS ACK, got {other:?}"),
    }
}

#[test]
fn parses_goaway_with_unknown_error_code() {
    let bytes = [
        0x00, 0x00, 0x0a, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x05, // last stream 5
        0x00, 0x00, 0xbe, 0xef, // unrecognized error code
        b'h', b'i',
    ];
    match Frame::decode(&bytes).unwrap() {
        Frame::GoAway(frame) => {
            assert_eq!(frame.last_stream_id, 5);
            // unknown codes collapse to INTERNAL_ERROR
            assert_eq!(frame.error_code, ErrorCode::InternalError);
            assert_eq!(frame.debug_data, b"hi");
        }
        other => panic!("expected GOAWAY, got {other:?}"),
    }
}

#[test]
fn reserved_bits_are_ignored_everywhere() {
    // stream id, promised id, and window increment all carry a reserved
    // top bit that must be masked
    let bytes = [
        0x00, 0x00, 0x04, 0x08, 0x00, 0xff, 0xff, 0xff, 0xff, // WINDOW_UPDATE
        0x80, 0x00, 0x01, 0x00, // increment with reserved bit set
    ];
    match Frame::decode(&bytes).unwrap() {
        Frame::WindowUpdate(frame) => {
            assert_eq!(frame.stream_id, 0x7fff_ffff);
            assert_eq!(frame.increment, 0x100);
        }
        other => panic!("expected WINDOW_UPDATE, got {other:?}"),
    }
}

#[test]
fn unknown_frame_type_is_carried_through() {
    let bytes = [
        0x00, 0x00, 0x02, 0x42, 0x07, 0x00, 0x00, 0x00, 0x09, 0xca, 0xfe,
    ];
    assert_eq!(
        Frame::decode(&bytes).unwrap(),
        Frame::Unknown {
            frame_type: 0x42,
            flags: 0x07,
            stream_id: 9,
            payload: vec![0xca, 0xfe],
        }
    );
}

#[test]
fn back_to_back_frames_parse_by_length() {
    let mut stream = Vec::new();
    let ping = h2_wire::PingFrame::new(*b"12345678");
    let rst = h2_wire::RstStreamFrame::new(3, ErrorCode::Cancel);
    stream.extend_from_slice(&ping.encode_frame());
    stream.extend_from_slice(&rst.encode_frame());

    let first = Frame::decode(&stream).unwrap();
    assert_eq!(first, Frame::Ping(ping));
    let second = Frame::decode(&stream[first.frame_length()..]).unwrap();
    assert_eq!(second, Frame::RstStream(rst));
}
