//! # Common
//!
//! Shared constants used throughout the library.

#![allow(dead_code)]

/// Maximum number of Values live on the VM's value stack at once.
///
/// Matches the book's `STACK_MAX`; overflowing it is a fatal VM error, not a
/// recoverable one (see `vm::Vm::push`).
pub const STACK_MAX: usize = 256;

/// Maximum number of local variables in scope at once. A constant-pool index
/// and a local slot are both single bytes, so both are capped at 256.
pub const LOCALS_MAX: usize = 256;

/// Load factor above which the hash table's backing array is grown.
pub const TABLE_MAX_LOAD: f64 = 0.75;

/// Minimum capacity a hash table grows into the first time it resizes.
pub const TABLE_MIN_CAPACITY: usize = 8;
