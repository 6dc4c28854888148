//! Hash maps keyed by native 32-bit integers, storing their entries in flat arrays.
//!
//! [IntMap], [PairMap] and [IntObjectMap] avoid any per-entry allocation. Each map keeps its
//! entries in insertion order in parallel arrays and threads them into hash chains through
//! integer links stored next to the keys. A table of chain heads, whose length is always a
//! power of two, points to the first entry of every chain.
//!
//! Entries cannot be removed. The primitive maps report missing keys with the [NOT_FOUND]
//! sentinel, which means `i32::MIN` cannot be told apart from a missing value by
//! [`IntMap::get`]; use [`IntMap::find_index`] when that value has to be stored.
//!
//! Memory usage is approximately `12 * num entries` bytes for [IntMap] and `16 * num entries`
//! bytes for [PairMap], plus one byte per entry for the chain heads.

mod chain;
mod util;

pub mod int_map;
pub mod int_object_map;
pub mod pair_map;

pub use int_map::IntMap;
pub use int_object_map::IntObjectMap;
pub use pair_map::PairMap;

/// Returned by lookups in the primitive maps when a key is absent.
pub const NOT_FOUND: i32 = i32::MIN;

/// Number of entries per chain head the primitive maps allow before growing their table.
pub const LOAD_FACTOR: usize = 4;

/// Initial capacity of the entry arrays of an empty map.
pub const DEFAULT_ENTRY_CAPACITY: usize = 32;
