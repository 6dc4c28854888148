//! Hash chains shared by the primitive maps.
//!
//! Every map stores its entries in insertion order, in arrays owned by the map itself. The
//! [`ChainTable`] only stores, for each hash slot, the insertion index of the first entry with
//! that slot, and every entry stores the insertion index of the next entry of its chain. Growing
//! the table relinks the chains in place, an entry never moves once appended.

use crate::DEFAULT_ENTRY_CAPACITY;

/// Marks the end of a chain or an empty table slot.
pub const NONE: u32 = u32::MAX;

/// Number of chain heads of an empty map.
pub const DEFAULT_TABLE_LEN: usize = 8;

/// Entry storage that can be threaded through a [`ChainTable`].
pub trait ChainStore {
    type Key: Copy + Eq;

    /// Hash of `key` before it is reduced to a table slot.
    fn raw_hash(key: Self::Key) -> u32;

    fn entry_count(&self) -> usize;

    fn key_at(&self, index: usize) -> Self::Key;

    fn next_at(&self, index: usize) -> u32;

    fn set_next_at(&mut self, index: usize, next: u32);
}

/// Where a key that is not yet present has to be linked.
#[derive(Clone, Copy, Debug)]
pub enum Link {
    /// The slot is empty, the new entry becomes the chain head.
    Head(usize),
    /// The new entry is appended after this entry.
    Tail(usize),
}

#[derive(Clone, Copy, Debug)]
pub enum Probe {
    Found(usize),
    Missing(Link),
}

#[derive(Clone, Debug)]
pub struct ChainTable {
    heads: Vec<u32>,
}

impl Default for ChainTable {
    fn default() -> Self {
        Self {
            heads: vec![NONE; DEFAULT_TABLE_LEN],
        }
    }
}

impl ChainTable {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    #[inline(always)]
    fn slot(&self, raw_hash: u32) -> usize {
        debug_assert!(self.heads.len().is_power_of_two());
        raw_hash as usize & (self.heads.len() - 1)
    }

    #[inline]
    pub fn probe<S: ChainStore>(&self, store: &S, key: S::Key) -> Probe {
        let slot = self.slot(S::raw_hash(key));
        let mut index = self.heads[slot];
        if index == NONE {
            return Probe::Missing(Link::Head(slot));
        }
        loop {
            let current = index as usize;
            if store.key_at(current) == key {
                return Probe::Found(current);
            }
            index = store.next_at(current);
            if index == NONE {
                return Probe::Missing(Link::Tail(current));
            }
        }
    }

    #[inline]
    pub fn find<S: ChainStore>(&self, store: &S, key: S::Key) -> Option<usize> {
        match self.probe(store, key) {
            Probe::Found(index) => Some(index),
            Probe::Missing(_) => None,
        }
    }

    /// Links the just appended entry `index`, whose own next link must be [`NONE`].
    #[inline]
    pub fn link<S: ChainStore>(&mut self, store: &mut S, link: Link, index: usize) {
        assert!(index < NONE as usize, "map cannot hold more than {NONE} entries");
        debug_assert_eq!(store.next_at(index), NONE);
        match link {
            Link::Head(slot) => self.heads[slot] = index as u32,
            Link::Tail(tail) => store.set_next_at(tail, index as u32),
        }
    }

    /// Doubles the number of chain heads and relinks every entry.
    ///
    /// Chains are rebuilt back to front, so each new chain lists its entries in ascending
    /// insertion order. Returns `false` without changing anything once the table has reached
    /// the largest length addressable with 32-bit indices.
    pub fn grow<S: ChainStore>(&mut self, store: &mut S) -> bool {
        let new_len = self.heads.len() * 2;
        if new_len >= i32::MAX as usize {
            return false;
        }

        self.heads.clear();
        self.heads.resize(new_len, NONE);

        let count = store.entry_count();
        for index in (0..count).rev() {
            let slot = self.slot(S::raw_hash(store.key_at(index)));
            store.set_next_at(index, self.heads[slot]);
            self.heads[slot] = index as u32;
        }

        log::trace!("chain table grown to {new_len} slots for {count} entries");
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
impl ChainTable {
    /// Checks that every entry is on the chain of its own slot and that each chain lists its
    /// entries in ascending insertion order.
    pub fn check_chains<S: ChainStore>(&self, store: &S) {
        let mut seen = 0;
        for (slot, &head) in self.heads.iter().enumerate() {
            let mut index = head;
            let mut previous = None;
            while index != NONE {
                let current = index as usize;
                assert_eq!(self.slot(S::raw_hash(store.key_at(current))), slot);
                if let Some(previous) = previous {
                    assert!(previous < current, "chain of slot {slot} out of order");
                }
                previous = Some(current);
                seen += 1;
                index = store.next_at(current);
            }
        }
        assert_eq!(seen, store.entry_count());
    }
}

/// Entries of a map keyed by a single `i32`, in insertion order.
#[derive(Clone)]
pub struct Entries<V> {
    /// Key in the low half, next link in the high half.
    pub buckets: Vec<u64>,
    pub data: Vec<V>,
}

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Entries {
            buckets: Vec::with_capacity(DEFAULT_ENTRY_CAPACITY),
            data: Vec::with_capacity(DEFAULT_ENTRY_CAPACITY),
        }
    }
}

impl<V> Entries<V> {
    /// Appends an unlinked entry and returns its index.
    #[inline]
    pub fn push(&mut self, key: i32, value: V) -> usize {
        let index = self.buckets.len();
        self.buckets.push(pack_bucket(key, NONE));
        self.data.push(value);
        index
    }
}

impl<V> ChainStore for Entries<V> {
    type Key = i32;

    #[inline(always)]
    fn raw_hash(key: i32) -> u32 {
        key as u32
    }

    #[inline(always)]
    fn entry_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline(always)]
    fn key_at(&self, index: usize) -> i32 {
        bucket_key(self.buckets[index])
    }

    #[inline(always)]
    fn next_at(&self, index: usize) -> u32 {
        bucket_next(self.buckets[index])
    }

    #[inline(always)]
    fn set_next_at(&mut self, index: usize, next: u32) {
        let bucket = &mut self.buckets[index];
        *bucket = with_next(*bucket, next);
    }
}

/// Packs a 32-bit key and a next link into one bucket word.
#[inline(always)]
pub fn pack_bucket(key: i32, next: u32) -> u64 {
    ((next as u64) << 32) | (key as u32 as u64)
}

#[inline(always)]
pub fn bucket_key(bucket: u64) -> i32 {
    bucket as u32 as i32
}

#[inline(always)]
pub fn bucket_next(bucket: u64) -> u32 {
    (bucket >> 32) as u32
}

#[inline(always)]
pub fn with_next(bucket: u64, next: u32) -> u64 {
    (bucket & 0xFFFF_FFFF) | ((next as u64) << 32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grown_chains_keep_insertion_order() {
        let mut table = ChainTable::default();
        let mut entries = Entries::default();
        for i in 0..256 {
            // keys sharing their low bits collide before and after growing
            let key = (i % 4) << 12 | i >> 2;
            let link = match table.probe(&entries, key) {
                Probe::Missing(link) => link,
                Probe::Found(_) => unreachable!(),
            };
            let index = entries.push(key, ());
            table.link(&mut entries, link, index);
            table.check_chains(&entries);
        }
        for _ in 0..3 {
            assert!(table.grow(&mut entries));
            table.check_chains(&entries);
        }
        for index in 0..256 {
            assert_eq!(table.find(&entries, entries.key_at(index)), Some(index));
        }
    }

    #[test]
    fn bucket_words_keep_negative_keys() {
        let bucket = pack_bucket(-5, NONE);
        assert_eq!(bucket_key(bucket), -5);
        assert_eq!(bucket_next(bucket), NONE);

        let relinked = with_next(bucket, 17);
        assert_eq!(bucket_key(relinked), -5);
        assert_eq!(bucket_next(relinked), 17);
    }
}
