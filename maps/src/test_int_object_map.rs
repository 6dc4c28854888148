#![allow(missing_docs)]
use super::*;
use crate::chain::DEFAULT_TABLE_LEN;
use indexmap::IndexMap;
use rand::prelude::*;

#[test]
fn test_basic() {
    let mut map: IntObjectMap<String> = IntObjectMap::new();
    assert_eq!(map.put(4, "four".into()), None);
    assert_eq!(map.put(-9, "minus nine".into()), None);
    assert_eq!(map.put(4, "vier".into()), Some("four".into()));
    assert_eq!(map.get(4).map(String::as_str), Some("vier"));
    assert_eq!(map.get(5), None);
    assert_eq!(map.len(), 2);
    map.get_mut(-9).unwrap().push('!');
    assert_eq!(map.get_index(1), Some((-9, &"minus nine!".to_string())));
    assert_eq!(map.get_index(2), None);
    assert!(map.contains_key(-9));
    assert!(map.contains_value(&"vier".to_string()));
    assert!(!map.contains_value(&"four".to_string()));
    assert_eq!(format!("{map:?}"), r#"{4: "vier", -9: "minus nine!"}"#);
    map.check();
}

#[test]
fn test_grows_at_half_full() {
    let mut map = IntObjectMap::new();
    for i in 0..(DEFAULT_TABLE_LEN / 2) as i32 {
        map.put(i, ());
    }
    assert_eq!(map.table_len(), DEFAULT_TABLE_LEN);
    map.put(100, ());
    assert_eq!(map.table_len(), DEFAULT_TABLE_LEN * 2);
    map.check();
}

#[test]
fn test_random_against_reference() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(7);
    let mut map = IntObjectMap::new();
    let mut ref_map = IndexMap::new();
    for _ in 0..20000 {
        let key = rng.gen_range(-5000..5000);
        let value = Box::new(rng.gen::<u64>());
        assert_eq!(map.put(key, value.clone()), ref_map.insert(key, value));
    }
    assert!(Iterator::eq(ref_map.iter().map(|(&k, v)| (k, v)), map.iter()));
    for key in -5100..5100 {
        assert_eq!(map.get(key), ref_map.get(&key));
    }
    assert!(Iterator::eq(ref_map.values(), map.values()));
    for _ in 0..200 {
        let value = match ref_map.get_index(rng.gen_range(0..ref_map.len())) {
            Some((_, value)) if rng.gen_bool(0.5) => value.clone(),
            _ => Box::new(rng.gen::<u64>()),
        };
        assert_eq!(
            map.contains_value(&value),
            ref_map.values().any(|v| *v == value)
        );
    }
    map.check();

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.table_len(), DEFAULT_TABLE_LEN);
}

#[test]
fn test_from_iter() {
    let map: IntObjectMap<u8> = (0..300).map(|i| (i * 7, i as u8)).collect();
    assert_eq!(map.len(), 300);
    assert_eq!(map.get(7 * 299), Some(&43));
    assert_eq!(map.get(7 * 299 + 1), None);
    map.check();
}
