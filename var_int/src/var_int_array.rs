//! The delta encoded [VariableIntArray].
use std::fmt;

use compact_maps::IntMap;

use crate::{
    cache::{NoCache, ValueCache},
    layout::{decode_slot, layout, needs_wide_slot},
    DEFAULT_DATA_CAPACITY, GROUPS_PER_SECTION, GROUP_SIZE, OVERLAY_CAPACITY, SECTION_SIZE,
};

#[derive(Clone, Copy, Debug)]
struct Section {
    /// Byte offset of the section's first group header.
    offset: u32,
    base: i32,
}

/// Byte offset of the most recently located group.
#[derive(Clone, Copy, Debug)]
struct GroupMemo {
    group: usize,
    offset: usize,
}

/// An append-mostly array of `i32` values using mostly one byte per value.
///
/// See the [crate level documentation](crate) for the encoding. Reads and writes take
/// `&mut self` since they update a memo of the last decoded group and the [ValueCache] `C`.
#[derive(Clone)]
pub struct VariableIntArray<C = NoCache> {
    data: Vec<u8>,
    sections: Vec<Section>,
    /// Number of values stored in `data`, always a multiple of [GROUP_SIZE].
    flushed_len: usize,
    pending: [i32; GROUP_SIZE],
    pending_len: usize,
    /// Values of encoded indices whose new delta does not fit their slot.
    overlay: IntMap,
    cache: C,
    memo: Option<GroupMemo>,
}

impl Default for VariableIntArray<NoCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableIntArray<NoCache> {
    /// Returns an empty array without a cache.
    pub fn new() -> Self {
        Self::with_cache(NoCache)
    }

    /// Returns an empty array reserving `capacity` bytes for encoded values.
    ///
    /// Capacities below [DEFAULT_DATA_CAPACITY] are rounded up.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_cache(capacity, NoCache)
    }

    /// Returns an array containing `values`.
    pub fn from_values(values: &[i32]) -> Self {
        let mut array = Self::with_capacity(values.len() + values.len() / GROUP_SIZE);
        array.add_values(values.iter().copied());
        array
    }
}

impl<C: ValueCache> VariableIntArray<C> {
    /// Returns an empty array using `cache`.
    pub fn with_cache(cache: C) -> Self {
        Self::with_capacity_and_cache(DEFAULT_DATA_CAPACITY, cache)
    }

    /// Returns an empty array using `cache` and reserving `capacity` bytes for encoded values.
    pub fn with_capacity_and_cache(capacity: usize, cache: C) -> Self {
        let capacity = capacity.max(DEFAULT_DATA_CAPACITY);
        VariableIntArray {
            data: Vec::with_capacity(capacity),
            sections: Vec::with_capacity(capacity / SECTION_SIZE),
            flushed_len: 0,
            pending: [0; GROUP_SIZE],
            pending_len: 0,
            overlay: IntMap::new(),
            cache,
            memo: None,
        }
    }

    /// Returns the number of values, including values not yet encoded.
    #[inline]
    pub fn len(&self) -> usize {
        self.flushed_len + self.pending_len
    }

    /// Returns `true` if the array contains no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of edits waiting in the overlay for the next re-encoding.
    pub fn pending_edits(&self) -> usize {
        self.overlay.len()
    }

    /// Returns the number of bytes used by encoded groups.
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bytes allocated for encoded groups.
    pub fn byte_capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Appends `value`.
    #[inline]
    pub fn add_value(&mut self, value: i32) {
        self.cache.put(self.len(), value);
        self.pending[self.pending_len] = value;
        self.pending_len += 1;
        if self.pending_len == GROUP_SIZE {
            self.write_pending_group();
        }
    }

    /// Appends all `values` in order.
    pub fn add_values(&mut self, values: impl IntoIterator<Item = i32>) {
        for value in values {
            self.add_value(value);
        }
    }

    fn write_pending_group(&mut self) {
        debug_assert_eq!(self.pending_len, GROUP_SIZE);

        if self.flushed_len % SECTION_SIZE == 0 {
            let offset = u32::try_from(self.data.len()).unwrap_or_else(|_| {
                panic!("encoded data exceeds {} bytes", u32::MAX);
            });
            self.sections.push(Section {
                offset,
                base: self.pending[0],
            });
        }
        let base = self.sections[self.sections.len() - 1].base;

        let deltas = self.pending.map(|value| value.wrapping_sub(base));
        let mut header = 0u8;
        for (slot, &delta) in deltas.iter().enumerate() {
            if needs_wide_slot(delta) {
                header |= 1 << slot;
            }
        }

        self.data.push(header);
        for (slot, &delta) in deltas.iter().enumerate() {
            if header & (1 << slot) != 0 {
                self.data.extend_from_slice(&delta.to_le_bytes());
            } else {
                self.data.push(delta as u8);
            }
        }

        self.flushed_len += GROUP_SIZE;
        self.pending_len = 0;
    }

    /// Returns the byte offset of the header of an encoded `group`.
    fn group_offset(&mut self, group: usize) -> usize {
        let section_start = group - group % GROUPS_PER_SECTION;

        let (mut current, mut offset) = match self.memo {
            Some(memo) if (section_start..=group).contains(&memo.group) => (memo.group, memo.offset),
            _ => (
                section_start,
                self.sections[group / GROUPS_PER_SECTION].offset as usize,
            ),
        };

        while current < group {
            offset += layout(self.data[offset]).size as usize;
            current += 1;
        }

        self.memo = Some(GroupMemo { group, offset });
        offset
    }

    fn overlay_index(&self, index: usize) -> Option<usize> {
        if self.overlay.is_empty() {
            return None;
        }
        self.overlay.find_index(i32::try_from(index).ok()?)
    }

    /// Returns the value at `index`, or `None` if `index` is out of range.
    pub fn get(&mut self, index: usize) -> Option<i32> {
        if index >= self.len() {
            return None;
        }
        if let Some(value) = self.cache.get(index) {
            return Some(value);
        }

        let value = if let Some(edit) = self.overlay_index(index) {
            self.overlay.value_at(edit)
        } else if index >= self.flushed_len {
            self.pending[index - self.flushed_len]
        } else {
            let offset = self.group_offset(index / GROUP_SIZE);
            let base = self.sections[index / SECTION_SIZE].base;
            base.wrapping_add(decode_slot(&self.data, offset, index % GROUP_SIZE))
        };

        self.cache.put(index, value);
        Some(value)
    }

    /// Returns the value at `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn get_value(&mut self, index: usize) -> i32 {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index {index} out of range for array of length {}",
                self.len()
            ),
        }
    }

    /// Replaces the value at `index`, appending when `index` equals [`len`](Self::len).
    ///
    /// Encoded values are rewritten in place when the new delta fits the existing slot,
    /// otherwise the value is recorded in the overlay.
    ///
    /// Panics if `index` is greater than the length.
    pub fn set_value(&mut self, index: usize, value: i32) {
        let len = self.len();
        assert!(
            index <= len,
            "index {index} out of range for array of length {len}"
        );

        if index == len {
            self.add_value(value);
            return;
        }

        self.cache.put(index, value);

        if self.overlay_index(index).is_some() {
            self.push_edit(index, value);
            return;
        }

        if index >= self.flushed_len {
            self.pending[index - self.flushed_len] = value;
            return;
        }

        let offset = self.group_offset(index / GROUP_SIZE);
        let delta = value.wrapping_sub(self.sections[index / SECTION_SIZE].base);
        let slot = index % GROUP_SIZE;
        let group = layout(self.data[offset]);
        let pos = offset + group.offsets[slot] as usize;

        if group.widths[slot] == 4 {
            self.data[pos..pos + 4].copy_from_slice(&delta.to_le_bytes());
        } else if !needs_wide_slot(delta) {
            self.data[pos] = delta as u8;
        } else {
            self.push_edit(index, value);
        }
    }

    fn push_edit(&mut self, index: usize, value: i32) {
        let key = i32::try_from(index)
            .unwrap_or_else(|_| panic!("cannot record an edit of index {index} in the overlay"));
        self.overlay.put(key, value);
        if self.overlay.len() >= OVERLAY_CAPACITY {
            self.drain_edits();
        }
    }

    /// Re-encodes all values with the overlay applied.
    fn drain_edits(&mut self) {
        let edits = self.overlay.len();
        let mut rebuilt = VariableIntArray::with_capacity_and_cache(
            self.data.len(),
            self.cache.new_compatible_instance(),
        );
        rebuilt.add_values(self.iter());

        log::debug!(
            "drained {edits} edits, re-encoded {} values into {} bytes",
            rebuilt.len(),
            rebuilt.data.len()
        );

        *self = rebuilt;
    }

    /// Encodes all pending values and applies all overlay edits.
    ///
    /// An incomplete trailing group is padded with zeros, which become part of the array.
    pub fn flush(&mut self) {
        while self.pending_len != 0 {
            self.add_value(0);
        }
        if !self.overlay.is_empty() {
            self.drain_edits();
        }
    }

    /// Flushes the array and releases all unused byte capacity.
    pub fn trim(&mut self) {
        self.flush();
        let released = self.data.capacity() - self.data.len();
        self.data = std::mem::take(&mut self.data).into_boxed_slice().into_vec();
        self.sections.shrink_to_fit();
        log::trace!("trimmed {released} unused bytes");
    }

    /// Returns an iterator over all values in order.
    ///
    /// This decodes sequentially and bypasses the cache.
    pub fn iter(&self) -> Iter<'_, C> {
        Iter {
            array: self,
            index: 0,
            offset: 0,
        }
    }

    /// Returns all values as a `Vec`.
    pub fn to_vec(&self) -> Vec<i32> {
        self.iter().collect()
    }
}

/// Iterator over the values of a [VariableIntArray].
pub struct Iter<'a, C> {
    array: &'a VariableIntArray<C>,
    index: usize,
    /// Byte offset of the group containing `index`.
    offset: usize,
}

impl<'a, C: ValueCache> Iterator for Iter<'a, C> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let array = self.array;
        let index = self.index;
        if index >= array.len() {
            return None;
        }
        self.index += 1;

        let value = if index < array.flushed_len {
            let base = array.sections[index / SECTION_SIZE].base;
            let slot = index % GROUP_SIZE;
            let value = base.wrapping_add(decode_slot(&array.data, self.offset, slot));
            if slot == GROUP_SIZE - 1 {
                self.offset += layout(array.data[self.offset]).size as usize;
            }
            value
        } else {
            array.pending[index - array.flushed_len]
        };

        Some(match array.overlay_index(index) {
            Some(edit) => array.overlay.value_at(edit),
            None => value,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, C: ValueCache> ExactSizeIterator for Iter<'a, C> {}

impl<'a, C: ValueCache> IntoIterator for &'a VariableIntArray<C> {
    type Item = i32;
    type IntoIter = Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<C: ValueCache> fmt::Debug for VariableIntArray<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<C: ValueCache> Extend<i32> for VariableIntArray<C> {
    fn extend<T: IntoIterator<Item = i32>>(&mut self, iter: T) {
        self.add_values(iter);
    }
}

impl FromIterator<i32> for VariableIntArray<NoCache> {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut array = Self::with_capacity(lower + lower / GROUP_SIZE);
        array.add_values(iter);
        array
    }
}

#[cfg(test)]
impl<C> VariableIntArray<C> {
    /// Checks that the section table matches the encoded groups.
    fn check(&self) {
        assert_eq!(self.flushed_len % GROUP_SIZE, 0);
        assert!(self.pending_len < GROUP_SIZE);
        assert_eq!(self.sections.len(), self.flushed_len.div_ceil(SECTION_SIZE));

        let mut offset = 0;
        for group in 0..self.flushed_len / GROUP_SIZE {
            if group % GROUPS_PER_SECTION == 0 {
                assert_eq!(
                    self.sections[group / GROUPS_PER_SECTION].offset as usize,
                    offset
                );
            }
            offset += layout(self.data[offset]).size as usize;
        }
        assert_eq!(offset, self.data.len());
    }
}

#[cfg(test)]
#[path = "test_var_int_array.rs"]
mod test_var_int_array;
