//! [IntMap] is a hash map from `i32` keys to `i32` values.
use crate::{
    chain::{bucket_key, ChainStore, ChainTable, Entries, Probe},
    util::impl_iterator,
    LOAD_FACTOR, NOT_FOUND,
};

/// A hash map from `i32` keys to `i32` values without per-entry allocations.
///
/// Keys are hashed by masking off their low bits, which spreads dense ranges of keys perfectly
/// across the table. Values are kept in insertion order and can be accessed by that index
/// using [`key_at`](IntMap::key_at) and [`value_at`](IntMap::value_at).
#[derive(Clone)]
pub struct IntMap {
    table: ChainTable,
    entries: Entries<i32>,
}

impl Default for IntMap {
    fn default() -> Self {
        IntMap {
            table: ChainTable::default(),
            entries: Entries::default(),
        }
    }
}

impl IntMap {
    /// Returns an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.entries.buckets.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.buckets.is_empty()
    }

    /// Removes all entries and releases the backing arrays, returning to the default sizes.
    pub fn clear(&mut self) {
        self.table.clear();
        self.entries = Entries::default();
    }

    /// Inserts `value` at `key`, returning the previous value or [NOT_FOUND].
    pub fn put(&mut self, key: i32, value: i32) -> i32 {
        if self.len() / LOAD_FACTOR >= self.table.len() {
            self.table.grow(&mut self.entries);
        }

        match self.table.probe(&self.entries, key) {
            Probe::Found(index) => std::mem::replace(&mut self.entries.data[index], value),
            Probe::Missing(link) => {
                let index = self.entries.push(key, value);
                self.table.link(&mut self.entries, link, index);
                NOT_FOUND
            }
        }
    }

    /// Returns the value stored at `key` or [NOT_FOUND].
    #[inline]
    pub fn get(&self, key: i32) -> i32 {
        match self.find_index(key) {
            Some(index) => self.entries.data[index],
            None => NOT_FOUND,
        }
    }

    /// Returns the insertion index of the entry with the specified key, if it exists.
    #[inline]
    pub fn find_index(&self, key: i32) -> Option<usize> {
        self.table.find(&self.entries, key)
    }

    /// Returns `true` if the map contains the specified key.
    pub fn contains_key(&self, key: i32) -> bool {
        self.find_index(key).is_some()
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
    pub fn key_at(&self, index: usize) -> i32 {
        self.entries.key_at(index)
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
            inner: self.entries.buckets.iter().zip(self.entries.data.iter()),
        }
    }
}

impl std::fmt::Debug for IntMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Extend<(i32, i32)> for IntMap {
    fn extend<T: IntoIterator<Item = (i32, i32)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl FromIterator<(i32, i32)> for IntMap {
    fn from_iter<T: IntoIterator<Item = (i32, i32)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a> IntoIterator for &'a IntMap {
    type Item = (i32, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the key-value pairs of an [IntMap], in insertion order.
#[derive(Clone)]
pub struct Iter<'a> {
    inner: std::iter::Zip<std::slice::Iter<'a, u64>, std::slice::Iter<'a, i32>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i32, i32);

    impl_iterator!(|(&bucket, &value)| (bucket_key(bucket), value));
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
impl IntMap {
    /// Checks that every entry is reachable through exactly its own chain.
    fn check(&self) {
        assert_eq!(self.entries.buckets.len(), self.entries.data.len());
        assert!(self.table.len().is_power_of_two());
        for index in 0..self.len() {
            assert_eq!(self.find_index(self.key_at(index)), Some(index));
        }
        self.table.check_chains(&self.entries);
    }

    fn table_len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
#[path = "test_int_map.rs"]
mod test_int_map;
