//! HPACK: Header Compression for HTTP/2 (RFC 7541).
//!
//! Stateful encoder and decoder over a shared [`IndexedHeaderTable`].
//! String literals are always Huffman-coded on encode (H bit set); the
//! decoder accepts both raw and Huffman-coded literals.
//!
//! The encoder deliberately separates emitting representations from
//! mutating the dynamic table: [`HpackEncoder::append`] reports whether the
//! pair should be indexed, and the caller commits it via
//! [`HpackEncoder::update_dynamic_table`]. Commit each indexable pair
//! before encoding the next header, or later index references in the same
//! block will disagree with a decoder that inserts as it reads.

use crate::error::HpackError;
use crate::huffman::{HuffmanDecoder, HuffmanEncoder};
use crate::indexed_table::IndexedHeaderTable;
use crate::integer::{decode_integer, encode_integer};

/// A decoded HTTP/2 header.
#[derive(Debug, Clone, PartialEq)]
pub struct H2Header {
    pub name: String,
    pub value: String,
}

impl H2Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

pub const DEFAULT_DYNAMIC_TABLE_SIZE: usize = 4096;

/// HPACK encoder for HTTP/2 header blocks.
///
/// Maintains per-connection dynamic table state; one instance per HPACK
/// stream direction.
pub struct HpackEncoder {
    table: IndexedHeaderTable,
    huffman: HuffmanEncoder,
    buffer: Vec<u8>,
}

impl std::fmt::Debug for HpackEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HpackEncoder")
            .field("buffered", &self.buffer.len())
            .field("dynamic_table_length", &self.dynamic_table_length())
            .finish()
    }
}

impl Default for HpackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackEncoder {
    pub fn new() -> Self {
        Self::with_max_dynamic_table_size(DEFAULT_DYNAMIC_TABLE_SIZE)
    }

    pub fn with_max_dynamic_table_size(size: usize) -> Self {
        Self {
            table: IndexedHeaderTable::new(size),
            huffman: HuffmanEncoder::new(),
            buffer: Vec::with_capacity(128),
        }
    }

    /// The encoded block produced so far.
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the output buffer, ready for a new header block. Dynamic table
    /// state persists across blocks.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn dynamic_table_length(&self) -> usize {
        self.table.dynamic_table_length()
    }

    pub fn max_dynamic_table_length(&self) -> usize {
        self.table.max_dynamic_table_length()
    }

    /// Resize the dynamic table and, when `send_update` is set, emit the
    /// size-update instruction (`001` prefix) into the stream so the peer
    /// follows along.
    pub fn set_max_dynamic_table_length(&mut self, size: usize, send_update: bool) {
        self.table.set_max_dynamic_table_length(size);
        if send_update {
            encode_integer(&mut self.buffer, size as u32, 5, 0b0010_0000);
        }
    }

    /// Commit headers to the dynamic table, mirroring what a decoder does
    /// when it reads the incremental-indexing representations this encoder
    /// emitted. An entry too large for the table empties it on both ends,
    /// so that outcome is not an error here.
    pub fn update_dynamic_table(&mut self, headers: &[H2Header]) {
        for header in headers {
            match self.table.append(&header.name, &header.value) {
                Ok(()) | Err(HpackError::EntryTooLarge { .. }) => {}
                Err(_) => unreachable!("append only fails on entry size"),
            }
        }
    }

    /// Append a block of headers in the default fashion. Returns the
    /// positions of the pairs that should be committed with
    /// [`update_dynamic_table`](Self::update_dynamic_table).
    pub fn append_headers(&mut self, headers: &[H2Header]) -> Vec<usize> {
        let mut indexable = Vec::new();
        for (position, header) in headers.iter().enumerate() {
            if self.append(&header.name, &header.value) {
                indexable.push(position);
            }
        }
        indexable
    }

    /// Append one header: purely indexed when the table holds an exact
    /// match, literal with indexed name when only the name matches, fully
    /// literal otherwise.
    ///
    /// Returns `true` when the pair should be inserted into the dynamic
    /// table (everything except the purely-indexed case).
    pub fn append(&mut self, name: &str, value: &str) -> bool {
        match self.table.first_header_match(name, Some(value)) {
            Some((index, true)) => {
                encode_integer(&mut self.buffer, index as u32, 7, 0b1000_0000);
                // everything is indexed, nothing to insert
                false
            }
            Some((index, false)) => {
                encode_integer(&mut self.buffer, index as u32, 6, 0b0100_0000);
                self.append_encoded_string(value);
                true
            }
            None => {
                self.buffer.push(0b0100_0000);
                self.append_encoded_string(name);
                self.append_encoded_string(value);
                true
            }
        }
    }

    /// Append a header as literal-without-indexing (`0000` prefix). Never
    /// touches the dynamic table.
    pub fn append_non_indexed(&mut self, name: &str, value: &str) {
        self.append_literal_with_prefix(name, value, 0b0000_0000);
    }

    /// Append a header as literal-never-indexed (`0001` prefix), for values
    /// that intermediaries must not compress. Never touches the table.
    pub fn append_never_indexed(&mut self, name: &str, value: &str) {
        self.append_literal_with_prefix(name, value, 0b0001_0000);
    }

    fn append_literal_with_prefix(&mut self, name: &str, value: &str, pattern: u8) {
        if let Some(index) = self.table.first_name_match(name) {
            encode_integer(&mut self.buffer, index as u32, 4, pattern);
        } else {
            self.buffer.push(pattern);
            self.append_encoded_string(name);
        }
        self.append_encoded_string(value);
    }

    fn append_encoded_string(&mut self, string: &str) {
        self.huffman.reset();
        let length = self.huffman.encode(string);
        encode_integer(&mut self.buffer, length as u32, 7, 0b1000_0000);
        self.buffer.extend_from_slice(self.huffman.data());
    }
}

/// HPACK decoder for HTTP/2 header blocks.
///
/// Maintains per-connection dynamic table state fed by the peer's
/// incremental-indexing representations and size updates.
pub struct HpackDecoder {
    table: IndexedHeaderTable,
    huffman: HuffmanDecoder,
}

impl std::fmt::Debug for HpackDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HpackDecoder")
            .field("dynamic_table_length", &self.dynamic_table_length())
            .finish()
    }
}

impl Default for HpackDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackDecoder {
    pub fn new() -> Self {
        Self::with_max_dynamic_table_size(DEFAULT_DYNAMIC_TABLE_SIZE)
    }

    pub fn with_max_dynamic_table_size(size: usize) -> Self {
        Self {
            table: IndexedHeaderTable::new(size),
            huffman: HuffmanDecoder::new(),
        }
    }

    pub fn dynamic_table_length(&self) -> usize {
        self.table.dynamic_table_length()
    }

    pub fn max_dynamic_table_length(&self) -> usize {
        self.table.max_dynamic_table_length()
    }

    pub fn set_max_dynamic_table_length(&mut self, size: usize) {
        self.table.set_max_dynamic_table_length(size);
    }

    /// Decode a complete header block.
    ///
    /// Incremental-indexing representations are inserted into the dynamic
    /// table as they are read; any decoding failure poisons the whole block.
    pub fn decode_headers(&mut self, data: &[u8]) -> Result<Vec<H2Header>, HpackError> {
        let mut headers = Vec::new();
        let mut pos = 0;

        while pos < data.len() {
            let byte = data[pos];

            if byte & 0b1000_0000 != 0 {
                // indexed header field
                let (index, consumed) = decode_integer(&data[pos..], 7)?;
                pos += consumed;
                headers.push(self.indexed_header(index as usize)?);
            } else if byte & 0b1100_0000 == 0b0100_0000 {
                // literal with incremental indexing
                let (name, value, consumed) = self.read_literal(&data[pos..], 6)?;
                pos += consumed;
                match self.table.append(&name, &value) {
                    // an oversized entry legitimately empties the table
                    Ok(()) | Err(HpackError::EntryTooLarge { .. }) => {}
                    Err(e) => return Err(e),
                }
                headers.push(H2Header { name, value });
            } else if byte & 0b1110_0000 == 0b0010_0000 {
                // dynamic table size update
                let (size, consumed) = decode_integer(&data[pos..], 5)?;
                pos += consumed;
                self.table.set_max_dynamic_table_length(size as usize);
            } else if byte & 0b1111_0000 == 0b0000_0000 || byte & 0b1111_0000 == 0b0001_0000 {
                // literal without indexing / never indexed
                let (name, value, consumed) = self.read_literal(&data[pos..], 4)?;
                pos += consumed;
                headers.push(H2Header { name, value });
            } else {
                return Err(HpackError::InvalidHeaderStartByte(byte, pos));
            }
        }

        Ok(headers)
    }

    fn indexed_header(&self, index: usize) -> Result<H2Header, HpackError> {
        let entry = self
            .table
            .entry(index)
            .ok_or(HpackError::InvalidIndexedHeader(index))?;
        match entry.value {
            Some(value) => Ok(H2Header {
                name: entry.name,
                value,
            }),
            None => Err(HpackError::IndexedHeaderWithNoValue(index)),
        }
    }

    /// Read a literal representation's name and value, starting at the
    /// representation byte. Returns the pair and the bytes consumed.
    fn read_literal(
        &mut self,
        data: &[u8],
        prefix: u8,
    ) -> Result<(String, String, usize), HpackError> {
        let (name_index, mut pos) = decode_integer(data, prefix)?;

        let name = if name_index == 0 {
            self.read_string(data, &mut pos)?
        } else {
            self.table
                .header(name_index as usize)
                .map(|(name, _)| name)
                .ok_or(HpackError::InvalidIndexedHeader(name_index as usize))?
        };
        let value = self.read_string(data, &mut pos)?;

        Ok((name, value, pos))
    }

    /// Read one string literal: H bit, 7-bit-prefixed length, then octets.
    fn read_string(&mut self, data: &[u8], pos: &mut usize) -> Result<String, HpackError> {
        let first = *data.get(*pos).ok_or(HpackError::UnexpectedEndOfData)?;
        let huffman_coded = first & 0b1000_0000 != 0;

        let (length, consumed) = decode_integer(&data[*pos..], 7)?;
        *pos += consumed;
        let length = length as usize;

        let end = *pos + length;
        if end > data.len() {
            return Err(HpackError::IndexOutOfRange {
                index: end,
                length: data.len(),
            });
        }
        let octets = &data[*pos..end];
        *pos = end;

        if huffman_coded {
            self.huffman.reset();
            Ok(self.huffman.decode(octets)?)
        } else {
            String::from_utf8(octets.to_vec()).map_err(|_| HpackError::InvalidUtf8)
        }
    }
}
