//! Huffman codec for HPACK string literals (RFC 7541 Appendix B).
//!
//! The code table is the RFC's fixed constant: 256 byte symbols plus a
//! 30-bit EOS code. Encoding appends code bits MSB-first into a growable
//! buffer and pads the final partial byte with 1-bits (an EOS prefix).
//! Decoding runs a table-driven state machine one nibble at a time, in the
//! style of nghttp2: each `[state][nibble]` transition yields the next
//! state, an optional decoded symbol, and accept/failure flags, so there is
//! no per-bit branching in the hot loop.

use std::sync::OnceLock;

use crate::error::HuffmanError;

/// One canonical code: the bit pattern (right-aligned) and its length.
#[derive(Clone, Copy)]
struct HuffmanCode {
    code: u32,
    bits: u8,
}

const fn hc(code: u32, bits: u8) -> HuffmanCode {
    HuffmanCode { code, bits }
}

const EOS_SYMBOL: u16 = 256;

/// RFC 7541 Appendix B. Indexed by byte value, plus EOS at 256.
static HUFFMAN_TABLE: [HuffmanCode; 257] = [
    hc(0x1ff8, 13), hc(0x7fffd8, 23), hc(0xfffffe2, 28), hc(0xfffffe3, 28), // 0..=3
    hc(0xfffffe4, 28), hc(0xfffffe5, 28), hc(0xfffffe6, 28), hc(0xfffffe7, 28), // 4..=7
    hc(0xfffffe8, 28), hc(0xffffea, 24), hc(0x3ffffffc, 30), hc(0xfffffe9, 28), // 8..=11
    hc(0xfffffea, 28), hc(0x3ffffffd, 30), hc(0xfffffeb, 28), hc(0xfffffec, 28), // 12..=15
    hc(0xfffffed, 28), hc(0xfffffee, 28), hc(0xfffffef, 28), hc(0xffffff0, 28), // 16..=19
    hc(0xffffff1, 28), hc(0xffffff2, 28), hc(0x3ffffffe, 30), hc(0xffffff3, 28), // 20..=23
    hc(0xffffff4, 28), hc(0xffffff5, 28), hc(0xffffff6, 28), hc(0xffffff7, 28), // 24..=27
    hc(0xffffff8, 28), hc(0xffffff9, 28), hc(0xffffffa, 28), hc(0xffffffb, 28), // 28..=31
    hc(0x14, 6), hc(0x3f8, 10), hc(0x3f9, 10), hc(0xffa, 12), // 32..=35
    hc(0x1ff9, 13), hc(0x15, 6), hc(0xf8, 8), hc(0x7fa, 11), // 36..=39
    hc(0x3fa, 10), hc(0x3fb, 10), hc(0xf9, 8), hc(0x7fb, 11), // 40..=43
    hc(0xfa, 8), hc(0x16, 6), hc(0x17, 6), hc(0x18, 6), // 44..=47
    hc(0x0, 5), hc(0x1, 5), hc(0x2, 5), hc(0x19, 6), // 48..=51
    hc(0x1a, 6), hc(0x1b, 6), hc(0x1c, 6), hc(0x1d, 6), // 52..=55
    hc(0x1e, 6), hc(0x1f, 6), hc(0x5c, 7), hc(0xfb, 8), // 56..=59
    hc(0x7ffc, 15), hc(0x20, 6), hc(0xffb, 12), hc(0x3fc, 10), // 60..=63
    hc(0x1ffa, 13), hc(0x21, 6), hc(0x5d, 7), hc(0x5e, 7), // 64..=67
    hc(0x5f, 7), hc(0x60, 7), hc(0x61, 7), hc(0x62, 7), // 68..=71
    hc(0x63, 7), hc(0x64, 7), hc(0x65, 7), hc(0x66, 7), // 72..=75
    hc(0x67, 7), hc(0x68, 7), hc(0x69, 7), hc(0x6a, 7), // 76..=79
    hc(0x6b, 7), hc(0x6c, 7), hc(0x6d, 7), hc(0x6e, 7), // 80..=83
    hc(0x6f, 7), hc(0x70, 7), hc(0x71, 7), hc(0x72, 7), // 84..=87
    hc(0xfc, 8), hc(0x73, 7), hc(0xfd, 8), hc(0x1ffb, 13), // 88..=91
    hc(0x7fff0, 19), hc(0x1ffc, 13), hc(0x3ffc, 14), hc(0x22, 6), // 92..=95
    hc(0x7ffd, 15), hc(0x3, 5), hc(0x23, 6), hc(0x4, 5), // 96..=99
    hc(0x24, 6), hc(0x5, 5), hc(0x25, 6), hc(0x26, 6), // 100..=103
    hc(0x27, 6), hc(0x6, 5), hc(0x74, 7), hc(0x75, 7), // 104..=107
    hc(0x28, 6), hc(0x29, 6), hc(0x2a, 6), hc(0x7, 5), // 108..=111
    hc(0x2b, 6), hc(0x76, 7), hc(0x2c, 6), hc(0x8, 5), // 112..=115
    hc(0x9, 5), hc(0x2d, 6), hc(0x77, 7), hc(0x78, 7), // 116..=119
    hc(0x79, 7), hc(0x7a, 7), hc(0x7b, 7), hc(0x7ffe, 15), // 120..=123
    hc(0x7fc, 11), hc(0x3ffd, 14), hc(0x1ffd, 13), hc(0xffffffc, 28), // 124..=127
    hc(0xfffe6, 20), hc(0x3fffd2, 22), hc(0xfffe7, 20), hc(0xfffe8, 20), // 128..=131
    hc(0x3fffd3, 22), hc(0x3fffd4, 22), hc(0x3fffd5, 22), hc(0x7fffd9, 23), // 132..=135
    hc(0x3fffd6, 22), hc(0x7fffda, 23), hc(0x7fffdb, 23), hc(0x7fffdc, 23), // 136..=139
    hc(0x7fffdd, 23), hc(0x7fffde, 23), hc(0xffffeb, 24), hc(0x7fffdf, 23), // 140..=143
    hc(0xffffec, 24), hc(0xffffed, 24), hc(0x3fffd7, 22), hc(0x7fffe0, 23), // 144..=147
    hc(0xffffee, 24), hc(0x7fffe1, 23), hc(0x7fffe2, 23), hc(0x7fffe3, 23), // 148..=151
    hc(0x7fffe4, 23), hc(0x1fffdc, 21), hc(0x3fffd8, 22), hc(0x7fffe5, 23), // 152..=155
    hc(0x3fffd9, 22), hc(0x7fffe6, 23), hc(0x7fffe7, 23), hc(0xffffef, 24), // 156..=159
    hc(0x3fffda, 22), hc(0x1fffdd, 21), hc(0xfffe9, 20), hc(0x3fffdb, 22), // 160..=163
    hc(0x3fffdc, 22), hc(0x7fffe8, 23), hc(0x7fffe9, 23), hc(0x1fffde, 21), // 164..=167
    hc(0x7fffea, 23), hc(0x3fffdd, 22), hc(0x3fffde, 22), hc(0xfffff0, 24), // 168..=171
    hc(0x1fffdf, 21), hc(0x3fffdf, 22), hc(0x7fffeb, 23), hc(0x7fffec, 23), // 172..=175
    hc(0x1fffe0, 21), hc(0x1fffe1, 21), hc(0x3fffe0, 22), hc(0x1fffe2, 21), // 176..=179
    hc(0x7fffed, 23), hc(0x3fffe1, 22), hc(0x7fffee, 23), hc(0x7fffef, 23), // 180..=183
    hc(0xfffea, 20), hc(0x3fffe2, 22), hc(0x3fffe3, 22), hc(0x3fffe4, 22), // 184..=187
    hc(0x7ffff0, 23), hc(0x3fffe5, 22), hc(0x3fffe6, 22), hc(0x7ffff1, 23), // 188..=191
    hc(0x3ffffe0, 26), hc(0x3ffffe1, 26), hc(0xfffeb, 20), hc(0x7fff1, 19), // 192..=195
    hc(0x3fffe7, 22), hc(0x7ffff2, 23), hc(0x3fffe8, 22), hc(0x1ffffec, 25), // 196..=199
    hc(0x3ffffe2, 26), hc(0x3ffffe3, 26), hc(0x3ffffe4, 26), hc(0x7ffffde, 27), // 200..=203
    hc(0x7ffffdf, 27), hc(0x3ffffe5, 26), hc(0xfffff1, 24), hc(0x1ffffed, 25), // 204..=207
    hc(0x7fff2, 19), hc(0x1fffe3, 21), hc(0x3ffffe6, 26), hc(0x7ffffe0, 27), // 208..=211
    hc(0x7ffffe1, 27), hc(0x3ffffe7, 26), hc(0x7ffffe2, 27), hc(0xfffff2, 24), // 212..=215
    hc(0x1fffe4, 21), hc(0x1fffe5, 21), hc(0x3ffffe8, 26), hc(0x3ffffe9, 26), // 216..=219
    hc(0xffffffd, 28), hc(0x7ffffe3, 27), hc(0x7ffffe4, 27), hc(0x7ffffe5, 27), // 220..=223
    hc(0xfffec, 20), hc(0xfffff3, 24), hc(0xfffed, 20), hc(0x1fffe6, 21), // 224..=227
    hc(0x3fffe9, 22), hc(0x1fffe7, 21), hc(0x1fffe8, 21), hc(0x7ffff3, 23), // 228..=231
    hc(0x3fffea, 22), hc(0x3fffeb, 22), hc(0x1ffffee, 25), hc(0x1ffffef, 25), // 232..=235
    hc(0xfffff4, 24), hc(0xfffff5, 24), hc(0x3ffffea, 26), hc(0x7ffff4, 23), // 236..=239
    hc(0x3ffffeb, 26), hc(0x7ffffe6, 27), hc(0x3ffffec, 26), hc(0x3ffffed, 26), // 240..=243
    hc(0x7ffffe7, 27), hc(0x7ffffe8, 27), hc(0x7ffffe9, 27), hc(0x7ffffea, 27), // 244..=247
    hc(0x7ffffeb, 27), hc(0xffffffe, 28), hc(0x7ffffec, 27), hc(0x7ffffed, 27), // 248..=251
    hc(0x7ffffee, 27), hc(0x7ffffef, 27), hc(0x7fffff0, 27), hc(0x3ffffee, 26), // 252..=255
    hc(0x3fffffff, 30), // 256 (EOS)
];

// -- Encoder --

const INITIAL_BUFFER_LEN: usize = 256;
const GROWTH_CHUNK: usize = 128;

/// Bit-level Huffman encoder with a reusable, growable output buffer.
///
/// The buffer is zero-filled and written by OR-ing code bits in MSB-first;
/// `offset` is the current byte and `remaining_bits` how many free bits it
/// still has (always 1..=8). Growth happens in 128-byte chunks so repeated
/// reallocation amortizes. Safe for sequential reuse via [`reset`].
///
/// [`reset`]: HuffmanEncoder::reset
pub struct HuffmanEncoder {
    buffer: Vec<u8>,
    offset: usize,
    remaining_bits: u8,
}

impl Default for HuffmanEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HuffmanEncoder {
    pub fn new() -> Self {
        Self {
            buffer: vec![0; INITIAL_BUFFER_LEN],
            offset: 0,
            remaining_bits: 8,
        }
    }

    /// Number of encoded bytes produced so far, counting a trailing partial
    /// byte.
    pub fn len(&self) -> usize {
        self.offset + if self.remaining_bits == 8 { 0 } else { 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The encoded bytes, trimmed to the actual output length.
    pub fn data(&self) -> &[u8] {
        &self.buffer[..self.len()]
    }

    /// Clear all state for reuse without shrinking the allocation.
    pub fn reset(&mut self) {
        // bits are OR'd in, so the used prefix must be re-zeroed
        let used = self.len();
        self.buffer[..used].iter_mut().for_each(|b| *b = 0);
        self.offset = 0;
        self.remaining_bits = 8;
    }

    /// Huffman-encode `string`, appending to the internal buffer and padding
    /// the final partial byte with 1-bits (EOS prefix). Returns the number
    /// of bytes this call produced.
    pub fn encode(&mut self, string: &str) -> usize {
        let start = self.len();

        for byte in string.bytes() {
            self.append_sym(HUFFMAN_TABLE[byte as usize]);
        }

        if self.remaining_bits < 8 {
            self.buffer[self.offset] |= (1u8 << self.remaining_bits) - 1;
            self.offset += 1;
            self.remaining_bits = 8;
        }

        self.len() - start
    }

    fn append_sym(&mut self, sym: HuffmanCode) {
        self.ensure_bits_available(sym.bits as usize);

        let code = sym.code;
        let mut nbits = sym.bits as usize;
        while nbits > 0 {
            let take = (self.remaining_bits as usize).min(nbits);
            let chunk = ((code >> (nbits - take)) as u8) & ((1u16 << take) - 1) as u8;
            self.buffer[self.offset] |= chunk << (self.remaining_bits as usize - take);
            self.remaining_bits -= take as u8;
            nbits -= take;
            if self.remaining_bits == 0 {
                self.offset += 1;
                self.remaining_bits = 8;
            }
        }
    }

    fn ensure_bits_available(&mut self, bits: usize) {
        // +1 spare byte so `offset` always indexes into the buffer
        let bytes_needed = self.offset + 1 + bits.div_ceil(8);
        while self.buffer.len() < bytes_needed {
            let new_len = self.buffer.len() + GROWTH_CHUNK;
            self.buffer.resize(new_len, 0);
        }
    }
}

// -- Decoder --

const FLAG_SYMBOL: u8 = 0x1;
const FLAG_ACCEPTED: u8 = 0x2;
const FLAG_FAILURE: u8 = 0x4;

/// A single `[state][nibble]` transition.
#[derive(Clone, Copy)]
struct Transition {
    next: u16,
    flags: u8,
    sym: u8,
}

const FAILED: Transition = Transition {
    next: 0,
    flags: FLAG_FAILURE,
    sym: 0,
};

/// Code-tree node used while deriving the transition table. Child index 0
/// means "absent" (the root is never anyone's child).
#[derive(Clone, Copy)]
enum Node {
    Internal { left: u16, right: u16 },
    Leaf { sym: u16 },
}

fn build_code_tree() -> Vec<Node> {
    let mut nodes = Vec::with_capacity(1024);
    nodes.push(Node::Internal { left: 0, right: 0 });

    for (sym, entry) in HUFFMAN_TABLE.iter().enumerate() {
        let mut node_idx = 0usize;

        for bit_pos in (0..entry.bits).rev() {
            let bit = (entry.code >> bit_pos) & 1;
            let is_last = bit_pos == 0;

            let (left, right) = match nodes[node_idx] {
                Node::Internal { left, right } => (left, right),
                Node::Leaf { .. } => unreachable!("huffman codes are prefix-free"),
            };
            let child = if bit == 0 { left } else { right };

            if is_last {
                let leaf_idx = nodes.len() as u16;
                nodes.push(Node::Leaf { sym: sym as u16 });
                nodes[node_idx] = match (bit, nodes[node_idx]) {
                    (0, Node::Internal { right, .. }) => Node::Internal { left: leaf_idx, right },
                    (_, Node::Internal { left, .. }) => Node::Internal { left, right: leaf_idx },
                    _ => unreachable!(),
                };
            } else if child == 0 {
                let new_idx = nodes.len() as u16;
                nodes.push(Node::Internal { left: 0, right: 0 });
                nodes[node_idx] = match (bit, nodes[node_idx]) {
                    (0, Node::Internal { right, .. }) => Node::Internal { left: new_idx, right },
                    (_, Node::Internal { left, .. }) => Node::Internal { left, right: new_idx },
                    _ => unreachable!(),
                };
                node_idx = new_idx as usize;
            } else {
                node_idx = child as usize;
            }
        }
    }

    nodes
}

/// Derive the nibble transition table from the code tree.
///
/// States are the tree's internal nodes (state 0 is the root). A transition
/// walks four bits; at most one symbol can complete during it, since every
/// code is at least five bits long. Walking into the EOS leaf or off the
/// tree marks the transition as failed. A state is accepting when its node
/// lies on the all-ones path from the root no deeper than seven bits, i.e.
/// the bits consumed since the last symbol form a legal EOS-prefix padding.
fn build_transition_table() -> Vec<[Transition; 16]> {
    let nodes = build_code_tree();

    // state id per internal node, in node-index order (root becomes state 0)
    let mut state_of = vec![u16::MAX; nodes.len()];
    let mut internal_nodes = Vec::new();
    for (idx, node) in nodes.iter().enumerate() {
        if let Node::Internal { .. } = node {
            state_of[idx] = internal_nodes.len() as u16;
            internal_nodes.push(idx);
        }
    }

    // internal nodes reachable from the root by consuming only 1-bits,
    // at most seven of them
    let mut accepting = vec![false; nodes.len()];
    let mut cursor = 0usize;
    accepting[0] = true;
    for _ in 0..7 {
        match nodes[cursor] {
            Node::Internal { right, .. } if right != 0 => {
                cursor = right as usize;
                if let Node::Internal { .. } = nodes[cursor] {
                    accepting[cursor] = true;
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    let mut table = vec![[FAILED; 16]; internal_nodes.len()];
    for (state, &node_idx) in internal_nodes.iter().enumerate() {
        for nibble in 0..16u8 {
            table[state][nibble as usize] = derive_transition(&nodes, &accepting, &state_of, node_idx, nibble);
        }
    }

    table
}

fn derive_transition(
    nodes: &[Node],
    accepting: &[bool],
    state_of: &[u16],
    start: usize,
    nibble: u8,
) -> Transition {
    let mut cur = start;
    let mut flags = 0u8;
    let mut sym = 0u8;

    for bit_pos in (0..4).rev() {
        let bit = (nibble >> bit_pos) & 1;
        let child = match nodes[cur] {
            Node::Internal { left, right } => {
                if bit == 0 {
                    left
                } else {
                    right
                }
            }
            Node::Leaf { .. } => unreachable!(),
        };
        if child == 0 {
            return FAILED;
        }
        match nodes[child as usize] {
            Node::Leaf { sym: s } => {
                if s == EOS_SYMBOL {
                    // an explicit EOS in the stream is a coding error
                    return FAILED;
                }
                flags |= FLAG_SYMBOL;
                sym = s as u8;
                cur = 0;
            }
            Node::Internal { .. } => cur = child as usize,
        }
    }

    if accepting[cur] {
        flags |= FLAG_ACCEPTED;
    }

    Transition {
        next: state_of[cur],
        flags,
        sym,
    }
}

fn transition_table() -> &'static [[Transition; 16]] {
    static TABLE: OnceLock<Vec<[Transition; 16]>> = OnceLock::new();
    TABLE.get_or_init(build_transition_table)
}

/// Table-driven Huffman decoder.
///
/// State persists across calls so a string split over multiple inputs can be
/// fed incrementally; call [`reset`](HuffmanDecoder::reset) before reuse on
/// an unrelated input. Not meant for concurrent sharing.
pub struct HuffmanDecoder {
    state: u16,
    accepting: bool,
}

impl Default for HuffmanDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HuffmanDecoder {
    pub fn new() -> Self {
        // the empty string is a valid coding, so the start state accepts
        Self {
            state: 0,
            accepting: true,
        }
    }

    /// Return the decoder to its initial state for reuse.
    pub fn reset(&mut self) {
        self.state = 0;
        self.accepting = true;
    }

    /// Decode a complete Huffman-coded string.
    ///
    /// Fails if the bit stream makes an invalid transition, does not end in
    /// an accepting state (truncated code or bad padding), or decodes to
    /// bytes that are not valid UTF-8.
    pub fn decode(&mut self, data: &[u8]) -> Result<String, HuffmanError> {
        let table = transition_table();
        let mut decoded = Vec::with_capacity(data.len() * 2);

        for &byte in data {
            for nibble in [byte >> 4, byte & 0xf] {
                let t = table[self.state as usize][nibble as usize];
                if t.flags & FLAG_FAILURE != 0 {
                    return Err(HuffmanError::InvalidState);
                }
                if t.flags & FLAG_SYMBOL != 0 {
                    decoded.push(t.sym);
                }
                self.state = t.next;
                self.accepting = t.flags & FLAG_ACCEPTED != 0;
            }
        }

        if !self.accepting {
            return Err(HuffmanError::InvalidState);
        }

        String::from_utf8(decoded).map_err(|_| HuffmanError::DecodeFailed)
    }
}
