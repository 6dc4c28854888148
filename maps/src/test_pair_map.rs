#![allow(missing_docs)]
use super::*;
use crate::{chain::DEFAULT_TABLE_LEN, LOAD_FACTOR};
use indexmap::IndexMap;
use rand::prelude::*;

#[test]
fn test_put_get_grid() {
    let mut map = PairMap::new();
    for i in 0..100 {
        for j in 0..100 {
            assert_eq!(map.put(i, j, i * 1000 + j), NOT_FOUND);
        }
    }
    assert_eq!(map.len(), 10000);
    for i in 0..100 {
        for j in 0..100 {
            assert_eq!(map.get(i, j), i * 1000 + j);
        }
    }
    assert_eq!(map.get(100, 0), NOT_FOUND);
    assert_eq!(map.get(0, 100), NOT_FOUND);
    map.check();
}

#[test]
fn test_order_of_keys_matters() {
    let mut map = PairMap::new();
    map.put(1, 2, 12);
    map.put(2, 1, 21);
    assert_eq!(map.get(1, 2), 12);
    assert_eq!(map.get(2, 1), 21);
    assert_eq!(map.put(1, 2, 120), 12);
    assert_eq!(map.len(), 2);
    assert!(map.contains_key(2, 1));
    assert!(!map.contains_key(2, 2));
    assert!(map.contains_value(120));
}

#[test]
fn test_negative_keys() {
    let mut map = PairMap::new();
    map.put(-1, i32::MIN + 1, 5);
    map.put(i32::MAX, -1, 6);
    assert_eq!(map.get(-1, i32::MIN + 1), 5);
    assert_eq!(map.get(i32::MAX, -1), 6);
    assert_eq!(map.key_at(1), (i32::MAX, -1));
}

#[test]
fn test_random_against_reference() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(59);
    let mut map = PairMap::new();
    let mut ref_map = IndexMap::new();
    for _ in 0..20000 {
        let key = (rng.gen_range(-50..50), rng.gen_range(-50..50));
        let value = rng.gen_range(-1000..1000);
        let expected = ref_map.insert(key, value).unwrap_or(NOT_FOUND);
        assert_eq!(map.put(key.0, key.1, value), expected);
    }
    assert_eq!(map.len(), ref_map.len());
    assert!(Iterator::eq(
        ref_map.iter().map(|(&k, &v)| (k, v)),
        map.iter()
    ));
    map.check();

    let rebuilt: PairMap = ref_map.iter().map(|(&k, &v)| (k, v)).collect();
    assert!(Iterator::eq(rebuilt.iter(), map.iter()));

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.get(0, 0), NOT_FOUND);
}

#[test]
fn test_growth_threshold() {
    let mut map = PairMap::new();
    for i in 0..(LOAD_FACTOR * DEFAULT_TABLE_LEN) as i32 {
        map.put(i, -i, i);
    }
    assert_eq!(map.table_len(), DEFAULT_TABLE_LEN);
    map.put(-1, -1, -1);
    assert_eq!(map.table_len(), DEFAULT_TABLE_LEN * 2);
    map.check();
}

#[test]
fn test_colliding_chains() {
    let mut map = PairMap::new();
    // the hash only depends on 31 * first + second
    for i in 0..500 {
        map.put(i, -31 * i, i);
        map.put(i, 1000 - 31 * i, -i);
    }
    assert!(map.table_len() > DEFAULT_TABLE_LEN);
    for i in 0..500 {
        assert_eq!(map.get(i, -31 * i), i);
        assert_eq!(map.get(i, 1000 - 31 * i), -i);
    }
    map.check();
}
