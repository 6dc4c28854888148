#![allow(missing_docs)]
use std::{cell::Cell, rc::Rc};

use super::*;
use crate::cache::FixedValueCache;
use rand::prelude::*;

#[test]
fn test_ascending_values() {
    compact_logger::setup();
    let mut array = VariableIntArray::new();
    for value in 1..=1_000_000 {
        array.add_value(value);
    }
    assert_eq!(array.len(), 1_000_000);
    for index in 0..1_000_000 {
        assert_eq!(array.get_value(index), index as i32 + 1);
    }
    // every delta fits a single byte
    assert_eq!(array.encoded_len(), 1_000_000 / GROUP_SIZE * 9);
    array.check();
}

#[test]
fn test_random_values() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(23);
    let values: Vec<i32> = (0..100_000)
        .map(|_| match rng.gen_range(0..3) {
            0 => rng.gen(),
            1 => rng.gen_range(-200..200),
            _ => rng.gen_range(1000..1100),
        })
        .collect();

    let mut array = VariableIntArray::from_values(&values);
    array.check();
    assert_eq!(array.to_vec(), values);

    for _ in 0..100_000 {
        let index = rng.gen_range(0..values.len());
        assert_eq!(array.get_value(index), values[index]);
    }
}

#[test]
fn test_boundary_deltas() {
    let pattern = [
        0,
        -129,
        -128,
        127,
        128,
        i32::MAX,
        i32::MIN,
        -1,
        i32::MIN,
        i32::MAX,
        -(1 << 30),
    ];
    let values: Vec<i32> = pattern.iter().copied().cycle().take(1000).collect();
    let mut array: VariableIntArray = values.iter().copied().collect();
    for (index, &value) in values.iter().enumerate() {
        assert_eq!(array.get_value(index), value, "index {index}");
    }
    array.check();
}

#[test]
fn test_extreme_base() {
    // deltas wrap around but still decode to the stored values
    let mut array = VariableIntArray::new();
    array.add_values([i32::MIN, i32::MAX, i32::MIN + 1, 0, i32::MIN, -1, 1, i32::MAX]);
    assert_eq!(
        array.to_vec(),
        [i32::MIN, i32::MAX, i32::MIN + 1, 0, i32::MIN, -1, 1, i32::MAX]
    );
    assert_eq!(array.get_value(1), i32::MAX);
}

#[test]
fn test_read_backwards() {
    let mut array: VariableIntArray = (0..4096).map(|i| i * 37 % 1001).collect();
    for index in (0..4096).rev() {
        assert_eq!(array.get_value(index), index as i32 * 37 % 1001);
    }
    for index in [500, 10, 499, 4095, 0, 511, 512] {
        assert_eq!(array.get_value(index), index as i32 * 37 % 1001);
    }
}

#[test]
fn test_in_place_edits() {
    let mut array: VariableIntArray = (1..=1_000_000).collect();

    for index in (0..1_000_000).step_by(100) {
        array.set_value(index, index as i32 + 2);
    }
    assert_eq!(array.pending_edits(), 0);

    for index in 0..1_000_000 {
        let expected = if index % 100 == 0 { index + 2 } else { index + 1 };
        assert_eq!(array.get_value(index), expected as i32);
    }
}

#[test]
fn test_widening_edit() {
    let mut array: VariableIntArray = (1..=1_000_000).collect();
    let before = array.encoded_len();

    array.set_value(0, 1_000_000_000);
    assert_eq!(array.pending_edits(), 1);
    assert_eq!(array.get_value(0), 1_000_000_000);

    array.flush();
    assert_eq!(array.pending_edits(), 0);
    // the new base widens the rest of the first section
    assert!(array.encoded_len() > before);
    assert_eq!(array.get_value(0), 1_000_000_000);
    for index in 1..1_000_000 {
        assert_eq!(array.get_value(index), index as i32 + 1);
    }
    array.check();
}

#[test]
fn test_random_edits_against_reference() {
    compact_logger::setup();
    let mut rng = rand_pcg::Pcg64::seed_from_u64(5);
    let mut values: Vec<i32> = (0..200_000).map(|i| i / 3).collect();
    let mut array = VariableIntArray::from_values(&values);

    for _ in 0..values.len() / 10 {
        let index = rng.gen_range(0..values.len());
        let value = if rng.gen_bool(0.5) {
            values[index].wrapping_add(rng.gen_range(-5..5))
        } else {
            rng.gen()
        };
        values[index] = value;
        array.set_value(index, value);
    }

    assert!(Iterator::eq(array.iter(), values.iter().copied()));
    for _ in 0..10_000 {
        let index = rng.gen_range(0..values.len());
        assert_eq!(array.get_value(index), values[index]);
    }

    array.flush();
    assert_eq!(array.pending_edits(), 0);
    assert_eq!(array.to_vec(), values);
    array.check();
}

#[test]
fn test_set_value_appends() {
    let mut array = VariableIntArray::new();
    for index in 0..100 {
        array.set_value(index, -(index as i32));
    }
    assert_eq!(array.len(), 100);
    assert!(Iterator::eq(array.iter(), (0..100).map(|i| -i)));
}

#[test]
fn test_pending_and_overlay_edits() {
    let mut array: VariableIntArray = (0..20).collect();

    // still pending
    array.set_value(18, 1 << 20);
    assert_eq!(array.get_value(18), 1 << 20);
    assert_eq!(array.pending_edits(), 0);

    // encoded in a narrow slot
    array.set_value(3, 1000);
    assert_eq!(array.pending_edits(), 1);
    assert_eq!(array.get_value(3), 1000);

    // stays in the overlay even though it would fit again
    array.set_value(3, 5);
    assert_eq!(array.pending_edits(), 1);
    assert_eq!(array.get_value(3), 5);

    array.flush();
    assert_eq!(array.len(), 24);
    assert_eq!(array.pending_edits(), 0);
    let mut expected: Vec<i32> = (0..20).collect();
    expected[18] = 1 << 20;
    expected[3] = 5;
    expected.extend([0; 4]);
    assert_eq!(array.to_vec(), expected);
}

#[test]
fn test_min_value_in_overlay() {
    let mut array: VariableIntArray = (0..16).collect();
    array.set_value(1, i32::MIN);
    assert_eq!(array.pending_edits(), 1);
    assert_eq!(array.get_value(1), i32::MIN);
    array.set_value(1, 7);
    assert_eq!(array.get_value(1), 7);
    array.flush();
    assert_eq!(array.get_value(1), 7);
}

#[test]
fn test_overlay_drains_at_capacity() {
    let count = OVERLAY_CAPACITY * 2 + 5;
    let mut array: VariableIntArray = (0..count as i32).collect();

    for index in 0..OVERLAY_CAPACITY - 1 {
        array.set_value(index, index as i32 + 1_000_000);
    }
    assert_eq!(array.pending_edits(), OVERLAY_CAPACITY - 1);
    assert_eq!(array.len(), count);

    array.set_value(OVERLAY_CAPACITY - 1, -1_000_000);
    assert_eq!(array.pending_edits(), 0);
    // a drain keeps the pending tail pending
    assert_eq!(array.len(), count);
    array.check();

    for index in 0..count {
        let expected = if index < OVERLAY_CAPACITY - 1 {
            index as i32 + 1_000_000
        } else if index == OVERLAY_CAPACITY - 1 {
            -1_000_000
        } else {
            index as i32
        };
        assert_eq!(array.get_value(index), expected, "index {index}");
    }

    // wide slots now accept any value in place
    array.set_value(OVERLAY_CAPACITY - 1, i32::MIN);
    assert_eq!(array.pending_edits(), 0);
    assert_eq!(array.get_value(OVERLAY_CAPACITY - 1), i32::MIN);
}

#[test]
fn test_flush_pads_group() {
    let mut array: VariableIntArray = (1..=13).collect();
    array.flush();
    assert_eq!(array.len(), 16);
    assert_eq!(array.to_vec()[12..], [13, 0, 0, 0]);
    array.flush();
    assert_eq!(array.len(), 16);
}

#[test]
fn test_trim() {
    let mut array: VariableIntArray = (0..10_000).map(|i| i * 3).collect();
    let before = array.to_vec();
    array.trim();
    assert_eq!(array.byte_capacity(), array.encoded_len());
    assert_eq!(array.to_vec(), before);
    array.check();

    array.add_value(-5);
    assert_eq!(array.get_value(10_000), -5);
}

#[test]
fn test_out_of_range() {
    let mut array: VariableIntArray = (0..10).collect();
    assert_eq!(array.get(10), None);
    assert_eq!(array.get(9), Some(9));
    assert_eq!(VariableIntArray::new().get(0), None);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_get_value_out_of_range() {
    let mut array: VariableIntArray = (0..10).collect();
    array.get_value(10);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_set_value_past_end() {
    let mut array: VariableIntArray = (0..10).collect();
    array.set_value(11, 0);
}

#[test]
fn test_debug() {
    let array: VariableIntArray = [3, -1, 300].into_iter().collect();
    assert_eq!(format!("{array:?}"), "[3, -1, 300]");
}

/// A cache that answers a single index with a fixed value.
struct StubCache {
    index: usize,
    value: i32,
}

impl ValueCache for StubCache {
    fn put(&mut self, _index: usize, _value: i32) {}

    fn get(&self, index: usize) -> Option<i32> {
        (index == self.index).then_some(self.value)
    }

    fn new_compatible_instance(&self) -> Self {
        StubCache {
            index: self.index,
            value: self.value,
        }
    }
}

#[test]
fn test_cache_is_consulted_first() {
    let mut array = VariableIntArray::with_cache(StubCache {
        index: 5,
        value: 42,
    });
    array.add_values(0..16);
    assert_eq!(array.get_value(5), 42);
    assert_eq!(array.get_value(6), 6);
    // iteration decodes the stored values
    assert_eq!(array.iter().nth(5), Some(5));
}

struct CountingCache {
    inner: FixedValueCache,
    instances: Rc<Cell<usize>>,
}

impl ValueCache for CountingCache {
    fn put(&mut self, index: usize, value: i32) {
        self.inner.put(index, value);
    }

    fn get(&self, index: usize) -> Option<i32> {
        self.inner.get(index)
    }

    fn new_compatible_instance(&self) -> Self {
        self.instances.set(self.instances.get() + 1);
        CountingCache {
            inner: self.inner.new_compatible_instance(),
            instances: self.instances.clone(),
        }
    }
}

#[test]
fn test_rebuild_uses_compatible_cache() {
    let instances = Rc::new(Cell::new(0));
    let mut array = VariableIntArray::with_cache(CountingCache {
        inner: FixedValueCache::new(64),
        instances: instances.clone(),
    });
    array.add_values(0..128);

    array.set_value(70, 100_000);
    array.set_value(10, -100_000);
    assert_eq!(instances.get(), 0);
    array.flush();
    assert_eq!(instances.get(), 1);

    // the fresh cache was filled while re-encoding
    assert_eq!(array.cache.get(10), Some(-100_000));
    assert_eq!(array.cache.get(70), None);
    assert_eq!(array.get_value(70), 100_000);
    assert_eq!(array.get_value(10), -100_000);

    // nothing to drain
    array.flush();
    assert_eq!(instances.get(), 1);
}

#[test]
fn test_fixed_cache_edits() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(11);
    let mut values: Vec<i32> = (0..5000).collect();
    let mut array = VariableIntArray::with_capacity_and_cache(0, FixedValueCache::new(1000));
    array.add_values(values.iter().copied());

    for _ in 0..3000 {
        let index = rng.gen_range(0..values.len());
        if rng.gen_bool(0.5) {
            let value = rng.gen();
            values[index] = value;
            array.set_value(index, value);
        } else {
            assert_eq!(array.get_value(index), values[index]);
        }
    }

    array.trim();
    assert_eq!(array.to_vec(), values);
    for (index, &value) in values.iter().enumerate() {
        assert_eq!(array.get_value(index), value);
    }
}
