#![allow(missing_docs)] // test only
use compact::{
    FixedValueCache, IntMap, IntObjectMap, PairMap, SparseBitSet, VariableIntArray, NOT_FOUND,
};
use compact_logger::MemoryUsage;
use rand::prelude::*;

#[test]
fn overwrite_keeps_single_entry() {
    let mut map = IntMap::new();
    map.put(3, 10);
    assert_eq!(map.put(3, 20), 10);
    assert_eq!(map.get(3), 20);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(4), NOT_FOUND);
}

#[test]
fn fresh_bitset_reads_unset() {
    let set = SparseBitSet::new();
    for index in [0, 17, 1 << 20, u32::MAX] {
        assert!(!set.get(index));
    }
}

#[test]
fn ascending_array_with_wide_edit() {
    compact_logger::setup();
    let mut array: VariableIntArray = (1..=1_000_000).collect();
    log::info!(
        "{} values in {} bytes, memory {}",
        array.len(),
        array.encoded_len(),
        MemoryUsage::sample()
    );
    array.set_value(0, 1_000_000_000);
    assert_eq!(array.get_value(0), 1_000_000_000);
    for index in 1..1_000_000 {
        assert_eq!(array.get_value(index), index as i32 + 1);
    }
    array.trim();
    assert_eq!(array.get_value(0), 1_000_000_000);
    assert_eq!(array.get_value(999_999), 1_000_000);
}

/// Stores a random sparse graph as edge numbers in a [PairMap], the endpoints of all edges in
/// [VariableIntArray]s and the nodes that have outgoing edges in a [SparseBitSet].
#[test]
fn edge_list_round_trip() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(3);

    let mut edges = PairMap::new();
    let mut sources = VariableIntArray::with_cache(FixedValueCache::new(1024));
    let mut targets = VariableIntArray::new();
    let mut has_outgoing = SparseBitSet::new();
    let mut out_degree = IntMap::new();

    for _ in 0..50_000 {
        let source = rng.gen_range(0..1_000_000);
        let target = source + rng.gen_range(-100..100);
        if edges.contains_key(source, target) {
            continue;
        }
        edges.put(source, target, sources.len() as i32);
        sources.add_value(source);
        targets.add_value(target);
        has_outgoing.set(source as u32);
        let degree = out_degree.get(source);
        out_degree.put(source, if degree == NOT_FOUND { 1 } else { degree + 1 });
    }

    assert_eq!(edges.len(), sources.len());
    for ((source, target), edge) in edges.iter() {
        assert_eq!(sources.get_value(edge as usize), source);
        assert_eq!(targets.get_value(edge as usize), target);
        assert!(has_outgoing.get(source as u32));
    }

    let total: i32 = out_degree.iter().map(|(_, degree)| degree).sum();
    assert_eq!(total as usize, edges.len());
    for node in 0..1_000_000 {
        assert_eq!(has_outgoing.get(node as u32), out_degree.contains_key(node));
    }
}

#[test]
fn object_map_of_bitsets() {
    let mut rows: IntObjectMap<SparseBitSet> = IntObjectMap::new();
    for row in (0..100).map(|i| i * 1000) {
        let mut set = SparseBitSet::new();
        for column in (0..row as u32).step_by(333) {
            set.set(column);
        }
        rows.put(row, set);
    }
    assert_eq!(rows.len(), 100);
    let row = rows.get_mut(5000).unwrap();
    assert!(row.get(333 * 3));
    assert!(!row.get(333 * 3 + 1));
    row.clear();
    assert!(!rows.get(5000).unwrap().get(333 * 3));
    assert!(rows.get(6000).unwrap().get(333 * 3));
}
