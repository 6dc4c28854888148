//! [VariableIntArray] is an append-mostly array of `i32` values that stores most values in a
//! single byte.
//!
//! Values are delta encoded against the first value of their section of [SECTION_SIZE]
//! values and written in groups of [GROUP_SIZE]. Each group starts with a header byte whose
//! bit `i` is set when value `i` of the group needs four bytes, all other values take a single
//! byte. Sequences with small local variation, like ascending indices, therefore need about
//! 1.125 bytes per value plus 8 bytes per section.
//!
//! Values are only encoded once a full group is available, until then they are kept as plain
//! integers. Overwriting an encoded value happens in place whenever the new delta fits into the
//! existing slot. Otherwise the new value is recorded in an overlay, and once that overlay
//! holds [OVERLAY_CAPACITY] edits, or on [`flush`](VariableIntArray::flush), the whole array is
//! re-encoded.
//!
//! An optional [ValueCache] can be plugged in to short-circuit decoding for frequently read
//! indices.
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

mod layout;

pub mod cache;
pub mod var_int_array;

pub use cache::{FixedValueCache, NoCache, ValueCache};
pub use var_int_array::VariableIntArray;

/// Number of values sharing a group header.
pub const GROUP_SIZE: usize = 8;

/// Number of values sharing a base value.
pub const SECTION_SIZE: usize = 64;

/// Minimum number of bytes reserved for encoded values.
pub const DEFAULT_DATA_CAPACITY: usize = 4096;

/// Number of edits that are collected in the overlay before the array is re-encoded.
pub const OVERLAY_CAPACITY: usize = 32 * 1024;

const GROUPS_PER_SECTION: usize = SECTION_SIZE / GROUP_SIZE;
