//! [IntObjectMap] is a hash map from `i32` keys to arbitrary values.
use crate::{
    chain::{bucket_key, ChainTable, Entries, Probe},
    util::impl_iterator,
};

/// A hash map from `i32` keys to values of type `T`, using the same chaining scheme as
/// [`IntMap`](crate::IntMap).
///
/// This map grows its table of chain heads much earlier than the primitive maps: as soon as
/// the number of entries reaches half the table length. Lookups therefore rarely follow a
/// chain, at the cost of four bytes of chain heads per two entries.
#[derive(Clone)]
pub struct IntObjectMap<T> {
    table: ChainTable,
    entries: Entries<T>,
}

impl<T> Default for IntObjectMap<T> {
    fn default() -> Self {
        IntObjectMap {
            table: ChainTable::default(),
            entries: Entries::default(),
        }
    }
}

impl<T> IntObjectMap<T> {
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

    /// Inserts `value` at `key`, replacing and returning any previous value.
    pub fn put(&mut self, key: i32, value: T) -> Option<T> {
        if self.len() >= self.table.len() / 2 {
            self.table.grow(&mut self.entries);
        }

        match self.table.probe(&self.entries, key) {
            Probe::Found(index) => Some(std::mem::replace(&mut self.entries.data[index], value)),
            Probe::Missing(link) => {
                let index = self.entries.push(key, value);
                self.table.link(&mut self.entries, link, index);
                None
            }
        }
    }

    /// Returns a reference to the value stored at `key`, if it exists.
    #[inline]
    pub fn get(&self, key: i32) -> Option<&T> {
        self.find_index(key).map(|index| &self.entries.data[index])
    }

    /// Returns a mutable reference to the value stored at `key`, if it exists.
    #[inline]
    pub fn get_mut(&mut self, key: i32) -> Option<&mut T> {
        self.find_index(key)
            .map(|index| &mut self.entries.data[index])
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

    /// Returns `true` if any entry has a value equal to `value`.
    ///
    /// This scans all entries.
    pub fn contains_value(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.entries.data.contains(value)
    }

    /// Returns the key and value of the entry inserted at position `index`, if it exists.
    pub fn get_index(&self, index: usize) -> Option<(i32, &T)> {
        Some((bucket_key(*self.entries.buckets.get(index)?), &self.entries.data[index]))
    }

    /// Returns an iterator over all key-value pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.buckets.iter().zip(self.entries.data.iter()),
        }
    }

    /// Returns an iterator over all values in insertion order.
    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.entries.data.iter()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for IntObjectMap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> Extend<(i32, T)> for IntObjectMap<T> {
    fn extend<I: IntoIterator<Item = (i32, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<T> FromIterator<(i32, T)> for IntObjectMap<T> {
    fn from_iter<I: IntoIterator<Item = (i32, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, T> IntoIterator for &'a IntObjectMap<T> {
    type Item = (i32, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the key-value pairs of an [IntObjectMap], in insertion order.
pub struct Iter<'a, T> {
    inner: std::iter::Zip<std::slice::Iter<'a, u64>, std::slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (i32, &'a T);

    impl_iterator!(|(&bucket, value)| (bucket_key(bucket), value));
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
impl<T> IntObjectMap<T> {
    fn check(&self) {
        assert_eq!(self.entries.buckets.len(), self.entries.data.len());
        for index in 0..self.len() {
            let key = bucket_key(self.entries.buckets[index]);
            assert_eq!(self.find_index(key), Some(index));
        }
        self.table.check_chains(&self.entries);
    }

    fn table_len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
#[path = "test_int_object_map.rs"]
mod test_int_object_map;
