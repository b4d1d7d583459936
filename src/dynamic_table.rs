//! HPACK dynamic header table (RFC 7541 §2.3.2 and §4).
//!
//! Two implementations share one trait: [`DynamicHeaderTable`] keeps a plain
//! deque and scans linearly, [`DynamicHeaderTableWithLookup`] adds hash maps
//! from name and (name, value) to entry indices for fast encoder-side
//! matching. The simple one exists to cross-check the optimized one in
//! tests; both must agree on every observable behavior.
//!
//! Entries are stored newest-first, so deque index 0 is the most recently
//! inserted entry and maps to unified HPACK index 62. Reads take the shared
//! lock; append, eviction, and resizing go through `&mut Inner` behind the
//! exclusive lock.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

use crate::error::HpackError;
use crate::static_table::HeaderTableEntry;

/// SETTINGS_HEADER_TABLE_SIZE default (RFC 7540 §6.5.2).
pub const DEFAULT_MAX_LENGTH: usize = 4096;

/// Common interface to both dynamic table implementations.
pub trait DynamicTable {
    fn with_maximum_length(max_length: usize) -> Self
    where
        Self: Sized;

    /// Current octet size of the table as defined by RFC 7541 §4.1.
    fn length(&self) -> usize;

    /// Number of entries currently held.
    fn count(&self) -> usize;

    /// Entry at 0-based index `at`, newest first.
    fn entry(&self, at: usize) -> Option<HeaderTableEntry>;

    /// Find the best existing match for a header.
    ///
    /// An exact (name, value) match anywhere in the table wins and returns
    /// `(index, true)`. Otherwise the most recent name-only match returns
    /// `(index, false)`. Indices are 0-based, newest first.
    fn find_existing_header(&self, name: &str, value: Option<&str>) -> Option<(usize, bool)>;

    /// Insert a header at the head of the table, evicting from the tail
    /// until it fits (RFC 7541 §4.4).
    ///
    /// An entry larger than the whole table empties it and fails with
    /// [`HpackError::EntryTooLarge`]; the emptied state is kept, not rolled
    /// back, exactly as the RFC prescribes.
    fn append_header(&self, name: &str, value: &str) -> Result<(), HpackError>;

    fn maximum_length(&self) -> usize;

    /// Change the size bound. Shrinking evicts oldest entries immediately
    /// until the table fits; growing never evicts.
    fn set_maximum_length(&self, max_length: usize);
}

// -- Linear implementation --

struct Inner {
    entries: VecDeque<HeaderTableEntry>,
    length: usize,
    max_length: usize,
}

impl Inner {
    fn evict_oldest(&mut self) -> Option<HeaderTableEntry> {
        let evicted = self.entries.pop_back()?;
        self.length -= evicted.length();
        Some(evicted)
    }
}

/// Plain dynamic table: a deque of entries and linear scans.
pub struct DynamicHeaderTable {
    inner: RwLock<Inner>,
}

impl Default for DynamicHeaderTable {
    fn default() -> Self {
        Self::with_maximum_length(DEFAULT_MAX_LENGTH)
    }
}

impl DynamicTable for DynamicHeaderTable {
    fn with_maximum_length(max_length: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: VecDeque::new(),
                length: 0,
                max_length,
            }),
        }
    }

    fn length(&self) -> usize {
        self.inner.read().length
    }

    fn count(&self) -> usize {
        self.inner.read().entries.len()
    }

    fn entry(&self, at: usize) -> Option<HeaderTableEntry> {
        self.inner.read().entries.get(at).cloned()
    }

    fn find_existing_header(&self, name: &str, value: Option<&str>) -> Option<(usize, bool)> {
        let inner = self.inner.read();
        let mut name_only = None;
        for (idx, entry) in inner.entries.iter().enumerate() {
            if entry.name != name {
                continue;
            }
            if entry.value.as_deref() == value {
                return Some((idx, true));
            }
            if name_only.is_none() {
                name_only = Some(idx);
            }
        }
        name_only.map(|idx| (idx, false))
    }

    fn append_header(&self, name: &str, value: &str) -> Result<(), HpackError> {
        let entry = HeaderTableEntry::new(name, Some(value.to_owned()));
        let size = entry.length();

        let mut inner = self.inner.write();
        while inner.length + size > inner.max_length && !inner.entries.is_empty() {
            inner.evict_oldest();
        }
        if inner.length + size > inner.max_length {
            return Err(HpackError::EntryTooLarge {
                size,
                max: inner.max_length,
            });
        }
        inner.length += size;
        inner.entries.push_front(entry);
        Ok(())
    }

    fn maximum_length(&self) -> usize {
        self.inner.read().max_length
    }

    fn set_maximum_length(&self, max_length: usize) {
        let mut inner = self.inner.write();
        inner.max_length = max_length;
        while inner.length > inner.max_length {
            inner.evict_oldest();
        }
    }
}

// -- Lookup-assisted implementation --

/// Index lists are kept sorted ascending, so the first element is always
/// the most recent occurrence of the key.
struct LookupInner {
    entries: VecDeque<HeaderTableEntry>,
    length: usize,
    max_length: usize,
    by_name: HashMap<String, Vec<usize>>,
    by_pair: HashMap<(String, String), Vec<usize>>,
}

impl LookupInner {
    fn evict_oldest(&mut self) {
        let Some(evicted) = self.entries.pop_back() else {
            return;
        };
        self.length -= evicted.length();

        // the evicted entry had the highest index, which sits at the back
        // of its lists
        let idx = self.entries.len();
        if let Some(indices) = self.by_name.get_mut(&evicted.name) {
            if indices.last() == Some(&idx) {
                indices.pop();
            }
            if indices.is_empty() {
                self.by_name.remove(&evicted.name);
            }
        }
        let value = evicted.value.unwrap_or_default();
        let pair = (evicted.name, value);
        if let Some(indices) = self.by_pair.get_mut(&pair) {
            if indices.last() == Some(&idx) {
                indices.pop();
            }
            if indices.is_empty() {
                self.by_pair.remove(&pair);
            }
        }
    }

    fn push_front(&mut self, entry: HeaderTableEntry) {
        for indices in self.by_name.values_mut() {
            for idx in indices.iter_mut() {
                *idx += 1;
            }
        }
        for indices in self.by_pair.values_mut() {
            for idx in indices.iter_mut() {
                *idx += 1;
            }
        }

        let name = entry.name.clone();
        let value = entry.value.clone().unwrap_or_default();
        self.by_name.entry(name.clone()).or_default().insert(0, 0);
        self.by_pair.entry((name, value)).or_default().insert(0, 0);

        self.length += entry.length();
        self.entries.push_front(entry);
    }
}

/// Dynamic table with hash-map lookup acceleration.
///
/// The maps are maintained in lockstep with the deque: every insert bumps
/// all stored indices by one, every tail eviction purges the highest index
/// of the evicted keys. This is the variant the encoder uses by default.
pub struct DynamicHeaderTableWithLookup {
    inner: RwLock<LookupInner>,
}

impl Default for DynamicHeaderTableWithLookup {
    fn default() -> Self {
        Self::with_maximum_length(DEFAULT_MAX_LENGTH)
    }
}

impl DynamicTable for DynamicHeaderTableWithLookup {
    fn with_maximum_length(max_length: usize) -> Self {
        Self {
            inner: RwLock::new(LookupInner {
                entries: VecDeque::new(),
                length: 0,
                max_length,
                by_name: HashMap::new(),
                by_pair: HashMap::new(),
            }),
        }
    }

    fn length(&self) -> usize {
        self.inner.read().length
    }

    fn count(&self) -> usize {
        self.inner.read().entries.len()
    }

    fn entry(&self, at: usize) -> Option<HeaderTableEntry> {
        self.inner.read().entries.get(at).cloned()
    }

    fn find_existing_header(&self, name: &str, value: Option<&str>) -> Option<(usize, bool)> {
        let inner = self.inner.read();
        if let Some(value) = value {
            let pair = (name.to_owned(), value.to_owned());
            if let Some(indices) = inner.by_pair.get(&pair) {
                if let Some(&idx) = indices.first() {
                    return Some((idx, true));
                }
            }
        }
        inner
            .by_name
            .get(name)
            .and_then(|indices| indices.first())
            .map(|&idx| (idx, false))
    }

    fn append_header(&self, name: &str, value: &str) -> Result<(), HpackError> {
        let entry = HeaderTableEntry::new(name, Some(value.to_owned()));
        let size = entry.length();

        let mut inner = self.inner.write();
        while inner.length + size > inner.max_length && !inner.entries.is_empty() {
            inner.evict_oldest();
        }
        if inner.length + size > inner.max_length {
            return Err(HpackError::EntryTooLarge {
                size,
                max: inner.max_length,
            });
        }
        inner.push_front(entry);
        Ok(())
    }

    fn maximum_length(&self) -> usize {
        self.inner.read().max_length
    }

    fn set_maximum_length(&self, max_length: usize) {
        let mut inner = self.inner.write();
        inner.max_length = max_length;
        while inner.length > inner.max_length {
            inner.evict_oldest();
        }
    }
}
