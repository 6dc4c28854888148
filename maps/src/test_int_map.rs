#![allow(missing_docs)]
use super::*;
use crate::chain::DEFAULT_TABLE_LEN;
use indexmap::IndexMap;
use rand::prelude::*;

struct CheckedMap {
    dut: IntMap,
    ref_map: IndexMap<i32, i32>,
}

impl CheckedMap {
    fn new() -> Self {
        CheckedMap {
            dut: IntMap::new(),
            ref_map: IndexMap::new(),
        }
    }
    fn put(&mut self, key: i32, value: i32) -> i32 {
        let ref_result = self.ref_map.insert(key, value).unwrap_or(NOT_FOUND);
        let dut_result = self.dut.put(key, value);
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn get(&self, key: i32) -> i32 {
        let ref_result = self.ref_map.get(&key).copied().unwrap_or(NOT_FOUND);
        let dut_result = self.dut.get(key);
        assert_eq!(ref_result, dut_result);
        assert_eq!(self.ref_map.get_index_of(&key), self.dut.find_index(key));
        ref_result
    }
    fn present_or_random_key(&self, rng: &mut impl Rng) -> i32 {
        if self.ref_map.is_empty() || rng.gen_bool(0.3) {
            rng.gen_range(-300..3000)
        } else {
            *self.ref_map.keys().choose(rng).unwrap()
        }
    }
    fn check(&self) {
        self.dut.check();
        assert_eq!(self.dut.len(), self.ref_map.len());
        assert!(Iterator::eq(
            self.ref_map.iter().map(|(&k, &v)| (k, v)),
            self.dut.iter()
        ));
    }
}

#[test]
fn test_random_ops() {
    compact_logger::setup();
    let mut rng = rand_pcg::Pcg64::seed_from_u64(39);
    let mut map = CheckedMap::new();
    for round in 0..20000 {
        match rng.gen_range(0..10) {
            0..=5 => {
                let key = map.present_or_random_key(&mut rng);
                map.put(key, rng.gen());
            }
            6..=8 => {
                let key = map.present_or_random_key(&mut rng);
                map.get(key);
            }
            _ => {
                let value = rng.gen_range(-5..5);
                assert_eq!(
                    map.dut.contains_value(value),
                    map.ref_map.values().any(|&v| v == value)
                );
            }
        }
        if round % 1000 == 0 {
            map.check();
        }
    }
    map.check();
}

#[test]
fn test_put_get_sequential() {
    let mut map = IntMap::new();
    for i in 0..10000 {
        assert_eq!(map.put(i, i + 1), NOT_FOUND);
    }
    for i in 0..10000 {
        assert_eq!(map.get(i), i + 1);
    }
    assert_eq!(map.get(10000), NOT_FOUND);
    assert_eq!(map.get(-1), NOT_FOUND);
    map.check();
}

#[test]
fn test_put_get_random_keys() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(59);
    let mut map = IntMap::new();
    let mut ref_map = IndexMap::new();
    for _ in 0..10000 {
        let key: i32 = rng.gen();
        let value: i32 = rng.gen_range(-1000..1000);
        map.put(key, value);
        ref_map.insert(key, value);
    }
    for (&key, &value) in ref_map.iter() {
        assert_eq!(map.get(key), value);
    }
    map.check();
}

#[test]
fn test_overwrite_keeps_size() {
    let mut map = IntMap::new();
    assert_eq!(map.put(3, 10), NOT_FOUND);
    assert_eq!(map.put(3, 20), 10);
    assert_eq!(map.get(3), 20);
    assert_eq!(map.len(), 1);
    assert!(map.contains_key(3));
    assert!(!map.contains_key(4));
    assert!(map.contains_value(20));
    assert!(!map.contains_value(10));
}

#[test]
fn test_colliding_chains() {
    // Multiples of a large power of two all land in slot zero.
    let mut map = IntMap::new();
    for i in 0..64 {
        map.put(i << 20, i);
    }
    for i in 0..64 {
        assert_eq!(map.get(i << 20), i);
    }
    assert!(map.table_len() > DEFAULT_TABLE_LEN);
    map.check();
}

#[test]
fn test_growth_threshold() {
    let mut map = IntMap::new();
    for i in 0..(LOAD_FACTOR * DEFAULT_TABLE_LEN) as i32 {
        map.put(i, i);
    }
    assert_eq!(map.table_len(), DEFAULT_TABLE_LEN);
    map.put(-1, -1);
    assert_eq!(map.table_len(), DEFAULT_TABLE_LEN * 2);
    map.check();
}

#[test]
fn test_clear() {
    let mut map: IntMap = (0..1000).map(|i| (i, i * 2)).collect();
    assert_eq!(map.len(), 1000);
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.get(5), NOT_FOUND);
    assert_eq!(map.table_len(), DEFAULT_TABLE_LEN);
    map.put(5, 7);
    assert_eq!(map.get(5), 7);
    map.check();
}

#[test]
fn test_insertion_order_access() {
    let map: IntMap = [(7, 70), (-3, 30), (7, 71), (100, 1)].into_iter().collect();
    assert_eq!(map.len(), 3);
    assert_eq!(map.key_at(0), 7);
    assert_eq!(map.value_at(0), 71);
    assert_eq!(map.key_at(1), -3);
    assert_eq!(map.iter().collect::<Vec<_>>(), [(7, 71), (-3, 30), (100, 1)]);
    assert_eq!(format!("{map:?}"), "{7: 71, -3: 30, 100: 1}");
}

#[test]
fn test_sentinel_value_is_ambiguous() {
    let mut map = IntMap::new();
    map.put(1, NOT_FOUND);
    assert_eq!(map.get(1), NOT_FOUND);
    assert_eq!(map.find_index(1), Some(0));
    assert_eq!(map.value_at(0), NOT_FOUND);
}
