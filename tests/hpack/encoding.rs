//! Encoder conformance: driving the encoder over the RFC 7541 Appendix C
//! request and response exchanges reproduces the published byte sequences,
//! since the encoder always Huffman-codes literals and prefers indexed
//! representations the same way the RFC's examples do.

use h2_wire::hpack::{H2Header, HpackDecoder, HpackEncoder};

/// Encode one block, committing each indexable pair before the next header
/// so index references stay consistent with an inline-inserting decoder.
fn encode_block(encoder: &mut HpackEncoder, headers: &[H2Header]) -> Vec<u8> {
    encoder.reset();
    for header in headers {
        if encoder.append(&header.name, &header.value) {
            encoder.update_dynamic_table(std::slice::from_ref(header));
        }
    }
    encoder.data().to_vec()
}

fn headers(pairs: &[(&str, &str)]) -> Vec<H2Header> {
    pairs
        .iter()
        .map(|(name, value)| H2Header::new(*name, *value))
        .collect()
}

#[test]
fn rfc7541_c4_request_bytes() {
    let mut encoder = HpackEncoder::new();

    let block1 = encode_block(
        &mut encoder,
        &headers(&[
            (":method", "GET"),
            (":scheme", "http"),
            (":path", "/"),
            (":authority", "www.example.com"),
        ]),
    );
    assert_eq!(
        block1,
        [
            0x82, 0x86, 0x84, 0x41, 0x8c, 0xf1, 0xe3, 0xc2, 0xe5, 0xf2, 0x3a, 0x6b, 0xa0,
            0xab, 0x90, 0xf4, 0xff,
        ]
    );
    assert_eq!(encoder.dynamic_table_length(), 57);

    let block2 = encode_block(
        &mut encoder,
        &headers(&[
            (":method", "GET"),
            (":scheme", "http"),
            (":path", "/"),
            (":authority", "www.example.com"),
            ("cache-control", "no-cache"),
        ]),
    );
    assert_eq!(
        block2,
        [0x82, 0x86, 0x84, 0xbe, 0x58, 0x86, 0xa8, 0xeb, 0x10, 0x64, 0x9c, 0xbf]
    );
    assert_eq!(encoder.dynamic_table_length(), 110);

    let block3 = encode_block(
        &mut encoder,
        &headers(&[
            (":method", "GET"),
            (":scheme", "https"),
            (":path", "/index.html"),
            (":authority", "www.example.com"),
            ("custom-key", "custom-value"),
        ]),
    );
    assert_eq!(
        block3,
        [
            0x82, 0x87, 0x85, 0xbf, 0x40, 0x88, 0x25, 0xa8, 0x49, 0xe9, 0x5b, 0xa9, 0x7d,
            0x7f, 0x89, 0x25, 0xa8, 0x49, 0xe9, 0x5b, 0xb8, 0xe8, 0xb4, 0xbf,
        ]
    );
    assert_eq!(encoder.dynamic_table_length(), 164);
}

#[test]
fn rfc7541_c6_response_bytes() {
    // the RFC's response examples run with a 256-octet table, small enough
    // to force evictions across blocks
    let mut encoder = HpackEncoder::with_max_dynamic_table_size(256);

    let block1 = encode_block(
        &mut encoder,
        &headers(&[
            (":status", "302"),
            ("cache-control", "private"),
            ("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            ("location", "https://www.example.com"),
        ]),
    );
    let mut expected1 = vec![0x48, 0x82, 0x64, 0x02];
    expected1.extend_from_slice(&[0x58, 0x85, 0xae, 0xc3, 0x77, 0x1a, 0x4b]);
    expected1.extend_from_slice(&[
        0x61, 0x96, 0xd0, 0x7a, 0xbe, 0x94, 0x10, 0x54, 0xd4, 0x44, 0xa8, 0x20, 0x05, 0x95,
        0x04, 0x0b, 0x81, 0x66, 0xe0, 0x82, 0xa6, 0x2d, 0x1b, 0xff,
    ]);
    expected1.extend_from_slice(&[
        0x6e, 0x91, 0x9d, 0x29, 0xad, 0x17, 0x18, 0x63, 0xc7, 0x8f, 0x0b, 0x97, 0xc8, 0xe9,
        0xae, 0x82, 0xae, 0x43, 0xd3,
    ]);
    assert_eq!(block1, expected1);
    assert_eq!(encoder.dynamic_table_length(), 222);

    // the 302 entry gets evicted when 307 comes in; everything else is
    // purely indexed against the shifted table
    let block2 = encode_block(
        &mut encoder,
        &headers(&[
            (":status", "307"),
            ("cache-control", "private"),
            ("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            ("location", "https://www.example.com"),
        ]),
    );
    assert_eq!(block2, [0x48, 0x83, 0x64, 0x0e, 0xff, 0xc1, 0xc0, 0xbf]);
    assert_eq!(encoder.dynamic_table_length(), 222);

    let block3 = encode_block(
        &mut encoder,
        &headers(&[
            (":status", "200"),
            ("cache-control", "private"),
            ("date", "Mon, 21 Oct 2013 20:13:22 GMT"),
            ("location", "https://www.example.com"),
            ("content-encoding", "gzip"),
            (
                "set-cookie",
                "foo=ASDJKHQKBZXOQWEOPIUAXQWEOIU; max-age=3600; version=1",
            ),
        ]),
    );
    let mut expected3 = vec![0x88, 0xc1];
    expected3.extend_from_slice(&[
        0x61, 0x96, 0xd0, 0x7a, 0xbe, 0x94, 0x10, 0x54, 0xd4, 0x44, 0xa8, 0x20, 0x05, 0x95,
        0x04, 0x0b, 0x81, 0x66, 0xe0, 0x84, 0xa6, 0x2d, 0x1b, 0xff,
    ]);
    expected3.push(0xc0);
    expected3.extend_from_slice(&[0x5a, 0x83, 0x9b, 0xd9, 0xab]);
    expected3.extend_from_slice(&[
        0x77, 0xad, 0x94, 0xe7, 0x82, 0x1d, 0xd7, 0xf2, 0xe6, 0xc7, 0xb3, 0x35, 0xdf, 0xdf,
        0xcd, 0x5b, 0x39, 0x60, 0xd5, 0xaf, 0x27, 0x08, 0x7f, 0x36, 0x72, 0xc1, 0xab, 0x27,
        0x0f, 0xb5, 0x29, 0x1f, 0x95, 0x87, 0x31, 0x60, 0x65, 0xc0, 0x03, 0xed, 0x4e, 0xe5,
        0xb1, 0x06, 0x3d, 0x50, 0x07,
    ]);
    assert_eq!(block3, expected3);
    assert_eq!(encoder.dynamic_table_length(), 215);
}

#[test]
fn encoder_and_decoder_stay_in_lockstep_across_blocks() {
    let mut encoder = HpackEncoder::with_max_dynamic_table_size(256);
    let mut decoder = HpackDecoder::with_max_dynamic_table_size(256);

    let exchanges = [
        headers(&[(":status", "200"), ("server", "hydra/1.4")]),
        headers(&[
            (":status", "200"),
            ("server", "hydra/1.4"),
            ("x-session", "0123456789abcdef0123456789abcdef"),
        ]),
        headers(&[
            (":status", "404"),
            ("server", "hydra/1.4"),
            ("x-session", "0123456789abcdef0123456789abcdef"),
            ("content-length", "0"),
        ]),
    ];

    for (i, block_headers) in exchanges.iter().enumerate() {
        let block = encode_block(&mut encoder, block_headers);
        let decoded = decoder.decode_headers(&block).unwrap();
        assert_eq!(&decoded, block_headers, "block {i}");
        assert_eq!(
            decoder.dynamic_table_length(),
            encoder.dynamic_table_length(),
            "block {i}"
        );
    }
}

#[test]
fn sensitive_values_can_bypass_the_table() {
    let mut encoder = HpackEncoder::new();
    let mut decoder = HpackDecoder::new();

    encoder.append_never_indexed("authorization", "Basic dXNlcjpwYXNz");
    encoder.append_non_indexed("x-one-shot", "tmp");
    let decoded = decoder.decode_headers(encoder.data()).unwrap();

    assert_eq!(
        decoded,
        [
            H2Header::new("authorization", "Basic dXNlcjpwYXNz"),
            H2Header::new("x-one-shot", "tmp"),
        ]
    );
    assert_eq!(encoder.dynamic_table_length(), 0);
    assert_eq!(decoder.dynamic_table_length(), 0);
}

#[test]
fn emitted_size_update_reaches_the_peer() {
    let mut encoder = HpackEncoder::new();
    let mut decoder = HpackDecoder::new();

    encoder.set_max_dynamic_table_length(512, true);
    encoder.append("x-key", "x-value");
    decoder.decode_headers(encoder.data()).unwrap();

    assert_eq!(decoder.max_dynamic_table_length(), 512);
}
