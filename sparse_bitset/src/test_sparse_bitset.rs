#![allow(missing_docs)]
use super::*;
use rand::prelude::*;
use std::hash::BuildHasherDefault;
use zwohash::ZwoHasher;

type ZwoSet = hashbrown::HashSet<u32, BuildHasherDefault<ZwoHasher>>;

#[test]
fn test_empty_set_reads_unset() {
    let set = SparseBitSet::new();
    for index in [0, 1, 511, 512, BITS_PER_GROUP, u32::MAX] {
        assert!(!set.get(index));
    }
    assert_eq!(set.range_count(), 0);
    assert_eq!(set.size(), 0);
}

#[test]
fn test_set_get_dense() {
    let mut set = SparseBitSet::new();
    for index in 0..10000 {
        set.set(index);
    }
    for index in 0..10000 {
        assert!(set.get(index));
    }
    assert!(!set.get(10000));
    set.check();
    assert_eq!(set.range_count(), 10000usize.div_ceil(BITS_PER_RANGE as usize));
}

#[test]
fn test_set_get_random() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(59);
    let mut set = SparseBitSet::new();
    let mut bits = ZwoSet::default();
    for _ in 0..10000 {
        let index = rng.gen_range(32768..65536);
        set.set(index);
        bits.insert(index);
    }
    set.check();
    for index in 0..70000 {
        assert_eq!(set.get(index), bits.contains(&index), "bit {index}");
    }
    // nothing below the first group that was written to
    assert!(set.ranges.iter().all(|range| range.start >= 32768));
}

#[test]
fn test_ranges_inserted_out_of_order() {
    let mut set = SparseBitSet::new();
    // all within group zero: tail, head replacement, middle insertion
    for index in [5000, 600, 3000, 1500, 7000, 100] {
        set.set(index);
        set.check();
    }
    for index in [5000, 600, 3000, 1500, 7000, 100] {
        assert!(set.get(index));
        assert!(!set.get(index + 1));
    }
    assert_eq!(set.range_count(), 6);
    assert_eq!(set.size(), 6 * BITS_PER_RANGE as usize);
    set.set(101);
    assert_eq!(set.range_count(), 6);
}

#[test]
fn test_reset_and_assign() {
    let mut set = SparseBitSet::new();
    set.reset(40);
    assert_eq!(set.range_count(), 0);

    set.set(40);
    set.set(41);
    set.reset(40);
    assert!(!set.get(40));
    assert!(set.get(41));
    assert_eq!(set.range_count(), 1);

    assert!(!set.set_to(1 << 20, true));
    assert!(set.set_to(1 << 20, true));
    assert!(set.take(1 << 20));
    assert!(!set.take(1 << 20));
    assert!(!set.get(1 << 20));
}

#[test]
fn test_high_indices() {
    let mut set = SparseBitSet::new();
    set.set(u32::MAX);
    set.set(u32::MAX - BITS_PER_GROUP);
    assert!(set.get(u32::MAX));
    assert!(set.get(u32::MAX - BITS_PER_GROUP));
    assert!(!set.get(u32::MAX - 1));
    set.check();
}

#[test]
fn test_clear() {
    let mut set = SparseBitSet::new();
    for index in (0..1_000_000).step_by(997) {
        set.set(index);
    }
    assert!(set.size() > 0);
    set.clear();
    assert_eq!(set.size(), 0);
    for index in (0..1_000_000).step_by(997) {
        assert!(!set.get(index));
    }
    set.set(12);
    assert!(set.get(12));
    set.check();
}

#[test]
fn test_random_ops_against_reference() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(17);
    let mut set = SparseBitSet::new();
    let mut bits = ZwoSet::default();
    for _ in 0..50000 {
        let index = if rng.gen_bool(0.9) {
            rng.gen_range(0..200_000)
        } else {
            rng.gen()
        };
        match rng.gen_range(0..3) {
            0 => assert_eq!(set.get(index), bits.contains(&index)),
            1 => {
                set.set(index);
                bits.insert(index);
            }
            _ => {
                set.reset(index);
                bits.remove(&index);
            }
        }
    }
    set.check();
    for &index in bits.iter() {
        assert!(set.get(index));
    }
}
