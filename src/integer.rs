//! Prefixed integer codec (RFC 7541 Section 5.1).
//!
//! HPACK packs unsigned integers into an N-bit prefix shared with flag bits,
//! spilling into a base-128 continuation sequence when the value doesn't fit.
//! The prefix must satisfy `0 < prefix <= 8`; passing 0 is a caller bug and
//! panics rather than returning an error.

use crate::error::HpackError;

/// Number of bytes `encode_integer` would write for `value` with the given
/// prefix, without writing anything.
pub fn encoded_length(value: u32, prefix: u8) -> usize {
    assert!(prefix >= 1 && prefix <= 8, "prefix must be in 1..=8");

    let k = (1u32 << prefix) - 1;
    if value < k {
        return 1;
    }

    let mut len = 2;
    let mut n = value - k;
    while n >= 128 {
        n >>= 7;
        len += 1;
    }
    len
}

/// Encode `value` with an N-bit prefix, appending to `buf`. `pattern`
/// supplies the caller's flag bits above the prefix; they are OR'd into the
/// first byte.
pub fn encode_integer(buf: &mut Vec<u8>, value: u32, prefix: u8, pattern: u8) {
    assert!(prefix >= 1 && prefix <= 8, "prefix must be in 1..=8");

    let k = (1u32 << prefix) - 1;
    if value < k {
        buf.push(pattern | value as u8);
        return;
    }

    buf.push(pattern | k as u8);
    let mut n = value - k;
    while n >= 128 {
        buf.push(0x80 | (n & 0x7f) as u8);
        n >>= 7;
    }
    buf.push(n as u8);
}

/// Decode a prefixed integer from the front of `buf`, ignoring any flag bits
/// above the prefix. Returns the value and the number of bytes consumed.
///
/// Fails with `UnexpectedEndOfData` if the buffer ends mid-continuation and
/// `IntegerOverflow` if the value exceeds 32 bits.
pub fn decode_integer(buf: &[u8], prefix: u8) -> Result<(u32, usize), HpackError> {
    assert!(prefix >= 1 && prefix <= 8, "prefix must be in 1..=8");

    let first = *buf.first().ok_or(HpackError::UnexpectedEndOfData)?;
    let k = (1u32 << prefix) - 1;
    let masked = u32::from(first) & k;
    if masked < k {
        return Ok((masked, 1));
    }

    // Continuation bytes: 7 bits each, LSB-first, top bit flags "more".
    let mut value = u64::from(k);
    let mut shift = 0u32;
    for (i, &b) in buf[1..].iter().enumerate() {
        value += u64::from(b & 0x7f) << shift;
        shift += 7;
        if b & 0x80 == 0 {
            if value > u64::from(u32::MAX) {
                return Err(HpackError::IntegerOverflow);
            }
            return Ok((value as u32, i + 2));
        }
        if shift > 28 {
            return Err(HpackError::IntegerOverflow);
        }
    }

    Err(HpackError::UnexpectedEndOfData)
}
