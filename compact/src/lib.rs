//! Memory compact collections for large amounts of `i32` data.
//!
//! * [IntMap], [PairMap] and [IntObjectMap] are insertion ordered hash maps keyed by integers
//!   or pairs of integers, storing their entries in flat arrays.
//! * [SparseBitSet] allocates bit storage only for regions that contain set bits.
//! * [VariableIntArray] delta encodes values, using a single byte for most of them.
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

#[doc(inline)]
pub use compact_maps as maps;
#[doc(inline)]
pub use compact_sparse_bitset as sparse_bitset;
#[doc(inline)]
pub use compact_var_int as var_int;

pub use maps::{IntMap, IntObjectMap, PairMap, NOT_FOUND};
pub use sparse_bitset::SparseBitSet;
pub use var_int::{FixedValueCache, NoCache, ValueCache, VariableIntArray};
