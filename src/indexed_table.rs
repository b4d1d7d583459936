//! Unified HPACK index space over the static and dynamic tables
//! (RFC 7541 §2.3.3): indices `1..=61` address the static table, `62..`
//! address the dynamic table newest-first.

use crate::dynamic_table::{DynamicHeaderTableWithLookup, DynamicTable, DEFAULT_MAX_LENGTH};
use crate::error::HpackError;
use crate::static_table::{self, HeaderTableEntry, STATIC_TABLE_LENGTH};

/// The combined header table an HPACK endpoint addresses.
///
/// Generic over the dynamic table implementation so tests can swap in the
/// linear variant; production use defaults to the lookup-accelerated one.
pub struct IndexedHeaderTable<T: DynamicTable = DynamicHeaderTableWithLookup> {
    dynamic: T,
}

impl<T: DynamicTable> Default for IndexedHeaderTable<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl<T: DynamicTable> IndexedHeaderTable<T> {
    pub fn new(max_dynamic_length: usize) -> Self {
        Self {
            dynamic: T::with_maximum_length(max_dynamic_length),
        }
    }

    /// Entry at unified 1-based index `at`, keeping a value-less static
    /// entry distinguishable from an empty value.
    pub fn entry(&self, at: usize) -> Option<HeaderTableEntry> {
        if at <= STATIC_TABLE_LENGTH {
            static_table::entry(at).cloned()
        } else {
            self.dynamic.entry(at - STATIC_TABLE_LENGTH - 1)
        }
    }

    /// Header pair at unified 1-based index `at`; a missing value reads as
    /// the empty string.
    pub fn header(&self, at: usize) -> Option<(String, String)> {
        self.entry(at)
            .map(|e| (e.name, e.value.unwrap_or_default()))
    }

    /// Best match for a full header, as `(unified index, has value)`.
    ///
    /// An exact match in either table wins immediately, static first. With
    /// only name matches available, the static table is preferred over the
    /// dynamic one.
    pub fn first_header_match(&self, name: &str, value: Option<&str>) -> Option<(usize, bool)> {
        if let Some(idx) = static_table::find_entry(name, value) {
            return Some((idx, true));
        }
        let dynamic = self.dynamic.find_existing_header(name, value);
        if let Some((idx, true)) = dynamic {
            return Some((idx + STATIC_TABLE_LENGTH + 1, true));
        }
        if let Some(idx) = static_table::find_name(name) {
            return Some((idx, false));
        }
        dynamic.map(|(idx, _)| (idx + STATIC_TABLE_LENGTH + 1, false))
    }

    /// Best name-only match, static table preferred. Unified 1-based index.
    pub fn first_name_match(&self, name: &str) -> Option<usize> {
        static_table::find_name(name).or_else(|| {
            self.dynamic
                .find_existing_header(name, None)
                .map(|(idx, _)| idx + STATIC_TABLE_LENGTH + 1)
        })
    }

    /// Insert a header into the dynamic table.
    pub fn append(&self, name: &str, value: &str) -> Result<(), HpackError> {
        self.dynamic.append_header(name, value)
    }

    /// Total addressable entries: 61 static plus the dynamic count.
    pub fn count(&self) -> usize {
        STATIC_TABLE_LENGTH + self.dynamic.count()
    }

    pub fn dynamic_table_length(&self) -> usize {
        self.dynamic.length()
    }

    pub fn max_dynamic_table_length(&self) -> usize {
        self.dynamic.maximum_length()
    }

    pub fn set_max_dynamic_table_length(&self, max_length: usize) {
        self.dynamic.set_maximum_length(max_length)
    }
}
