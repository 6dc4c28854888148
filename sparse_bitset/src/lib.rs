//! [SparseBitSet] is a bit set for sparse or clustered bit indices spread over the full `u32`
//! range.
//!
//! Bits are stored in fixed ranges of [BITS_PER_RANGE] bits that are only allocated once a bit
//! inside them is set. Ranges are grouped by `index / BITS_PER_GROUP`; an
//! [`IntObjectMap`](compact_maps::IntObjectMap) maps each non-empty group to the first range
//! of a singly linked list of that group's ranges, sorted by their first index.
//!
//! All ranges live in a single arena and are linked by their arena index, so the set needs no
//! allocation besides the arena and the group map.
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

use std::cell::Cell;

use compact_maps::IntObjectMap;

/// Number of bits stored in each range.
pub const BITS_PER_RANGE: u32 = 64 * WORDS_PER_RANGE as u32;

/// Number of ranges covered by each group.
pub const RANGES_PER_GROUP: u32 = 32;

/// Number of bits covered by a group.
pub const BITS_PER_GROUP: u32 = BITS_PER_RANGE * RANGES_PER_GROUP;

const WORDS_PER_RANGE: usize = 8;

const NO_RANGE: u32 = u32::MAX;

#[derive(Clone, Debug)]
struct BitRange {
    words: [u64; WORDS_PER_RANGE],
    start: u32,
    /// Arena index of the next range of the same group.
    next: u32,
}

impl BitRange {
    #[inline(always)]
    fn contains(&self, index: u32) -> bool {
        index.wrapping_sub(self.start) < BITS_PER_RANGE
    }

    #[inline(always)]
    fn position(&self, index: u32) -> (usize, u64) {
        let offset = index - self.start;
        ((offset >> 6) as usize, 1 << (offset & 0x3F))
    }

    #[inline(always)]
    fn get(&self, index: u32) -> bool {
        let (word, mask) = self.position(index);
        self.words[word] & mask != 0
    }

    #[inline(always)]
    fn set(&mut self, index: u32) {
        let (word, mask) = self.position(index);
        self.words[word] |= mask;
    }

    #[inline(always)]
    fn reset(&mut self, index: u32) {
        let (word, mask) = self.position(index);
        self.words[word] &= !mask;
    }
}

enum Located {
    Found(u32),
    Missing {
        group: i32,
        /// Range after which a new range has to be linked, [NO_RANGE] when it becomes the head.
        prev: u32,
        next: u32,
    },
}

/// A set of `u32` bit indices that allocates storage only for the regions that contain set
/// bits.
///
/// The most recently accessed range is remembered, so runs of accesses to nearby indices skip
/// the group lookup entirely.
#[derive(Clone, Debug)]
pub struct SparseBitSet {
    groups: IntObjectMap<u32>,
    ranges: Vec<BitRange>,
    last_range: Cell<u32>,
}

impl Default for SparseBitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseBitSet {
    /// Returns an empty set.
    pub fn new() -> Self {
        SparseBitSet {
            groups: IntObjectMap::new(),
            ranges: Vec::new(),
            last_range: Cell::new(NO_RANGE),
        }
    }

    #[inline(always)]
    fn cached_range(&self, index: u32) -> Option<u32> {
        let last = self.last_range.get();
        (last != NO_RANGE && self.ranges[last as usize].contains(index)).then_some(last)
    }

    fn locate(&self, index: u32) -> Located {
        if let Some(range) = self.cached_range(index) {
            return Located::Found(range);
        }

        let group = (index / BITS_PER_GROUP) as i32;
        let mut prev = NO_RANGE;
        let mut current = self.groups.get(group).copied().unwrap_or(NO_RANGE);

        while current != NO_RANGE {
            let range = &self.ranges[current as usize];
            if index < range.start {
                break;
            }
            if range.contains(index) {
                self.last_range.set(current);
                return Located::Found(current);
            }
            prev = current;
            current = range.next;
        }

        Located::Missing {
            group,
            prev,
            next: current,
        }
    }

    fn find_or_insert_range(&mut self, index: u32) -> u32 {
        let (group, prev, next) = match self.locate(index) {
            Located::Found(range) => return range,
            Located::Missing { group, prev, next } => (group, prev, next),
        };

        let new_range = u32::try_from(self.ranges.len())
            .ok()
            .filter(|&range| range != NO_RANGE)
            .unwrap_or_else(|| panic!("sparse bit set exceeds {NO_RANGE} ranges"));

        self.ranges.push(BitRange {
            words: [0; WORDS_PER_RANGE],
            start: index - index % BITS_PER_RANGE,
            next,
        });

        if prev == NO_RANGE {
            self.groups.put(group, new_range);
        } else {
            self.ranges[prev as usize].next = new_range;
        }

        self.last_range.set(new_range);
        new_range
    }

    /// Returns `true` if the bit at `index` is set.
    ///
    /// Never allocates, bits in regions that were never set read as unset.
    #[inline]
    pub fn get(&self, index: u32) -> bool {
        match self.locate(index) {
            Located::Found(range) => self.ranges[range as usize].get(index),
            Located::Missing { .. } => false,
        }
    }

    /// Sets the bit at `index`, allocating its range if necessary.
    #[inline]
    pub fn set(&mut self, index: u32) {
        let range = self.find_or_insert_range(index);
        self.ranges[range as usize].set(index);
    }

    /// Clears the bit at `index`.
    ///
    /// This is a no-op when the bit's range was never allocated. Ranges are not released when
    /// they become empty.
    #[inline]
    pub fn reset(&mut self, index: u32) {
        if let Located::Found(range) = self.locate(index) {
            self.ranges[range as usize].reset(index);
        }
    }

    /// Sets the bit at `index` to `value` and returns its previous value.
    pub fn set_to(&mut self, index: u32, value: bool) -> bool {
        let previous = self.get(index);
        if value {
            self.set(index);
        } else {
            self.reset(index);
        }
        previous
    }

    /// Clears the bit at `index` and returns its previous value.
    pub fn take(&mut self, index: u32) -> bool {
        self.set_to(index, false)
    }

    /// Removes all bits, releasing all ranges.
    pub fn clear(&mut self) {
        log::trace!("releasing {} bit ranges", self.ranges.len());
        *self = Self::new();
    }

    /// Returns the number of allocated ranges.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Returns the number of bits backed by allocated ranges.
    ///
    /// This is `range_count() * BITS_PER_RANGE`. It measures the memory used by the set, it is
    /// neither the number of set bits nor one past the highest set bit.
    pub fn size(&self) -> usize {
        self.ranges.len() * BITS_PER_RANGE as usize
    }
}

#[cfg(test)]
impl SparseBitSet {
    /// Checks that every group lists exactly its own ranges in ascending order.
    fn check(&self) {
        let mut seen = 0;
        for (group, &head) in self.groups.iter() {
            let mut current = head;
            let mut last_start = None;
            while current != NO_RANGE {
                let range = &self.ranges[current as usize];
                assert_eq!((range.start / BITS_PER_GROUP) as i32, group);
                assert_eq!(range.start % BITS_PER_RANGE, 0);
                if let Some(last_start) = last_start {
                    assert!(last_start < range.start);
                }
                last_start = Some(range.start);
                seen += 1;
                current = range.next;
            }
        }
        assert_eq!(seen, self.ranges.len());
    }
}

#[cfg(test)]
#[path = "test_sparse_bitset.rs"]
mod test_sparse_bitset;
