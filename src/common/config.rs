//! Structural constants for wordtree.
//!
//! These are compile-time parameters of the on-disk format. Changing any of
//! them changes the record geometry and makes existing files unreadable.

/// Order of the B-tree (T).
///
/// Every node holds at most `2T - 1` entries and `2T` children.
pub const ORDER: usize = 16;

/// Maximum number of entries in a node (`2T - 1`).
pub const MAX_ENTRIES: usize = 2 * ORDER - 1;

/// Maximum number of children of an internal node (`2T`).
pub const MAX_CHILDREN: usize = 2 * ORDER;

/// Width of one word slot on disk, padding included.
pub const WORD_FIELD_SIZE: usize = 32;

/// Longest word payload that fits in a slot.
///
/// One byte of every slot is reserved so a stored word is always followed
/// by at least one padding byte.
pub const MAX_WORD_LEN: usize = WORD_FIELD_SIZE - 1;

/// Number of materialized nodes kept by the page cache.
pub const CACHE_CAPACITY: usize = 100;
