//! [PairMap] is a hash map from pairs of `i32` keys to `i32` values.
use crate::{
    chain::{ChainStore, ChainTable, Probe, NONE},
    util::impl_iterator,
    DEFAULT_ENTRY_CAPACITY, LOAD_FACTOR, NOT_FOUND,
};

/// A hash map from `(i32, i32)` keys to `i32` values without per-entry allocations.
///
/// Both halves of a key are packed into a single 64-bit word. Unlike [`IntMap`](crate::IntMap)
/// the next links are kept in their own array, so each entry occupies a key word, a link and a
/// value slot.
#[derive(Clone)]
pub struct PairMap {
    table: ChainTable,
    entries: Entries,
}

#[derive(Clone)]
struct Entries {
    /// First key in the low half, second key in the high half.
    pairs: Vec<u64>,
    next: Vec<u32>,
    data: Vec<i32>,
}

#[inline(always)]
fn pack_pair(first: i32, second: i32) -> u64 {
    ((second as u32 as u64) << 32) | (first as u32 as u64)
}

#[inline(always)]
fn unpack_pair(pair: u64) -> (i32, i32) {
    (pair as u32 as i32, (pair >> 32) as u32 as i32)
}

impl Default for Entries {
    fn default() -> Self {
        Entries {
            pairs: Vec::with_capacity(DEFAULT_ENTRY_CAPACITY),
            next: Vec::with_capacity(DEFAULT_ENTRY_CAPACITY),
            data: Vec::with_capacity(DEFAULT_ENTRY_CAPACITY),
        }
    }
}

impl ChainStore for Entries {
    type Key = u64;

    #[inline(always)]
    fn raw_hash(pair: u64) -> u32 {
        let (first, second) = unpack_pair(pair);
        let hash = 23i32
            .wrapping_mul(31)
            .wrapping_add(first)
            .wrapping_mul(31)
            .wrapping_add(second);
        hash as u32
    }

    #[inline(always)]
    fn entry_count(&self) -> usize {
        self.pairs.len()
    }

    #[inline(always)]
    fn key_at(&self, index: usize) -> u64 {
        self.pairs[index]
    }

    #[inline(always)]
    fn next_at(&self, index: usize) -> u32 {
        self.next[index]
    }

    #[inline(always)]
    fn set_next_at(&mut self, index: usize, next: u32) {
        self.next[index] = next;
    }
}

impl Default for PairMap {
    fn default() -> Self {
        PairMap {
            table: ChainTable::default(),
            entries: Entries::default(),
        }
    }
}

impl PairMap {
    /// Returns an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.entries.pairs.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.pairs.is_empty()
    }

    /// Removes all entries and releases the backing arrays, returning to the default sizes.
    pub fn clear(&mut self) {
        self.table.clear();
        self.entries = Entries::default();
    }

    /// Inserts `value` at the key `(first, second)`, returning the previous value or
    /// [NOT_FOUND].
    pub fn put(&mut self, first: i32, second: i32, value: i32) -> i32 {
        if self.len() / LOAD_FACTOR >= self.table.len() {
            self.table.grow(&mut self.entries);
        }

        let pair = pack_pair(first, second);
        match self.table.probe(&self.entries, pair) {
            Probe::Found(index) => std::mem::replace(&mut self.entries.data[index], value),
            Probe::Missing(link) => {
                let index = self.entries.pairs.len();
                self.entries.pairs.push(pair);
                self.entries.next.push(NONE);
                self.entries.data.push(value);
                self.table.link(&mut self.entries, link, index);
                NOT_FOUND
            }
        }
    }

    /// Returns the value stored at the key `(first, second)` or [NOT_FOUND].
    #[inline]
    pub fn get(&self, first: i32, second: i32) -> i32 {
        match self.find_index(first, second) {
            Some(index) => self.entries.data[index],
            None => NOT_FOUND,
        }
    }

    /// Returns the insertion index of the entry with the key `(first, second)`, if it exists.
    #[inline]
    pub fn find_index(&self, first: i32, second: i32) -> Option<usize> {
        self.table.find(&self.entries, pack_pair(first, second))
    }

    /// Returns `true` if the map contains the key `(first, second)`.
    pub fn contains_key(&self, first: i32, second: i32) -> bool {
        self.find_index(first, second).is_some()
    }

    /// Returns `true` if any entry has the specified value.
    ///
    /// This scans all entries.
    pub fn contains_value(&self, value: i32) -> bool {
        self.entries.data.contains(&value)
    }

    /// Returns the key of the entry inserted at position `index`.
    ///
    /// Panics if `index >= self.len()`.
    pub fn key_at(&self, index: usize) -> (i32, i32) {
        unpack_pair(self.entries.pairs[index])
    }

    /// Returns the value of the entry inserted at position `index`.
    ///
    /// Panics if `index >= self.len()`.
    pub fn value_at(&self, index: usize) -> i32 {
        self.entries.data[index]
    }

    /// Returns an iterator over all key-value pairs in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.pairs.iter().zip(self.entries.data.iter()),
        }
    }
}

impl std::fmt::Debug for PairMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Extend<((i32, i32), i32)> for PairMap {
    fn extend<T: IntoIterator<Item = ((i32, i32), i32)>>(&mut self, iter: T) {
        for ((first, second), value) in iter {
            self.put(first, second, value);
        }
    }
}

impl FromIterator<((i32, i32), i32)> for PairMap {
    fn from_iter<T: IntoIterator<Item = ((i32, i32), i32)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a> IntoIterator for &'a PairMap {
    type Item = ((i32, i32), i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the key-value pairs of a [PairMap], in insertion order.
#[derive(Clone)]
pub struct Iter<'a> {
    inner: std::iter::Zip<std::slice::Iter<'a, u64>, std::slice::Iter<'a, i32>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = ((i32, i32), i32);

    impl_iterator!(|(&pair, &value)| (unpack_pair(pair), value));
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
impl PairMap {
    fn check(&self) {
        assert_eq!(self.entries.pairs.len(), self.entries.next.len());
        assert_eq!(self.entries.pairs.len(), self.entries.data.len());
        for index in 0..self.len() {
            let (first, second) = self.key_at(index);
            assert_eq!(self.find_index(first, second), Some(index));
        }
        self.table.check_chains(&self.entries);
    }

    fn table_len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
#[path = "test_pair_map.rs"]
mod test_pair_map;
