//! Caches mapping logical indices of a [`VariableIntArray`](crate::VariableIntArray) to their
//! decoded values.

/// A cache of decoded values, consulted before any encoded data is read.
///
/// The array stores every value it appends, decodes or overwrites into the cache, so a cache
/// never has to invalidate entries by itself. It may drop any entry at any time.
pub trait ValueCache {
    /// Remembers `value` for `index`.
    fn put(&mut self, index: usize, value: i32);

    /// Returns the value remembered for `index`, if any.
    fn get(&self, index: usize) -> Option<i32>;

    /// Returns an empty cache with the same configuration as `self`.
    ///
    /// Used when the array re-encodes its contents into fresh storage.
    fn new_compatible_instance(&self) -> Self
    where
        Self: Sized;
}

/// A cache that never remembers anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl ValueCache for NoCache {
    #[inline(always)]
    fn put(&mut self, _index: usize, _value: i32) {}

    #[inline(always)]
    fn get(&self, _index: usize) -> Option<i32> {
        None
    }

    fn new_compatible_instance(&self) -> Self {
        NoCache
    }
}

/// A direct mapped cache for the indices `0..capacity`.
///
/// Indices at or beyond the capacity are never cached.
#[derive(Clone, Debug)]
pub struct FixedValueCache {
    values: Box<[i32]>,
    present: Box<[bool]>,
}

impl FixedValueCache {
    /// Returns an empty cache covering the indices `0..capacity`.
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        FixedValueCache {
            values: vec![0; capacity].into_boxed_slice(),
            present: vec![false; capacity].into_boxed_slice(),
        }
    }

    /// Returns the number of indices covered by this cache.
    pub fn capacity(&self) -> usize {
        self.values.len()
    }
}

impl ValueCache for FixedValueCache {
    #[inline]
    fn put(&mut self, index: usize, value: i32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
            self.present[index] = true;
        }
    }

    #[inline]
    fn get(&self, index: usize) -> Option<i32> {
        if *self.present.get(index)? {
            Some(self.values[index])
        } else {
            None
        }
    }

    fn new_compatible_instance(&self) -> Self {
        FixedValueCache::new(self.capacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_cache() {
        let mut cache = FixedValueCache::new(4);
        assert_eq!(cache.get(0), None);
        cache.put(0, i32::MIN);
        cache.put(3, 7);
        cache.put(4, 9);
        assert_eq!(cache.get(0), Some(i32::MIN));
        assert_eq!(cache.get(3), Some(7));
        assert_eq!(cache.get(4), None);
        assert_eq!(cache.get(usize::MAX), None);

        let fresh = cache.new_compatible_instance();
        assert_eq!(fresh.capacity(), 4);
        assert_eq!(fresh.get(3), None);
    }

    #[test]
    #[should_panic]
    fn test_fixed_cache_zero_capacity() {
        FixedValueCache::new(0);
    }
}
