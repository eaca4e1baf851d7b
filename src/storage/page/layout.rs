//! Record geometry for a node.
//!
//! # Layout (1388 bytes, big-endian)
//! ```text
//! Offset  Size      Field
//! ------  --------  -----
//! 0       8         id (i64)
//! 8       4         num_entries (i32)
//! 12      4         leaf (i32, 1 = leaf, 0 = internal)
//! 16      31 × 32   words (space padded, empty slot = "null")
//! 1008    31 × 4    counts (u32, empty slots never written)
//! 1132    32 × 8    children (i64, -2 = absent)
//! ```
//!
//! There is no header, magic number or checksum. The layout must stay
//! bit-exact to read files written by earlier versions.

use crate::common::config::{MAX_CHILDREN, MAX_ENTRIES, WORD_FIELD_SIZE};
use crate::common::NodeId;

/// Width of an `i32`/`u32` field.
pub const INT_WIDTH: usize = 4;

/// Width of an `i64` field.
pub const LONG_WIDTH: usize = 8;

pub const ID_SIZE: usize = LONG_WIDTH;
pub const NUM_ENTRIES_SIZE: usize = INT_WIDTH;
pub const LEAF_SIZE: usize = INT_WIDTH;
pub const WORDS_SIZE: usize = WORD_FIELD_SIZE * MAX_ENTRIES;
pub const COUNTS_SIZE: usize = INT_WIDTH * MAX_ENTRIES;
pub const CHILDREN_SIZE: usize = LONG_WIDTH * MAX_CHILDREN;

pub const OFFSET_ID: usize = 0;
pub const OFFSET_NUM_ENTRIES: usize = OFFSET_ID + ID_SIZE;
pub const OFFSET_LEAF: usize = OFFSET_NUM_ENTRIES + NUM_ENTRIES_SIZE;
pub const OFFSET_WORDS: usize = OFFSET_LEAF + LEAF_SIZE;
pub const OFFSET_COUNTS: usize = OFFSET_WORDS + WORDS_SIZE;
pub const OFFSET_CHILDREN: usize = OFFSET_COUNTS + COUNTS_SIZE;

/// Total size of one node record.
pub const RECORD_SIZE: usize = OFFSET_CHILDREN + CHILDREN_SIZE;

/// Child slot value meaning "no child".
pub const ABSENT_CHILD: i64 = -2;

/// Token written into an unoccupied word slot.
pub const EMPTY_SLOT: &[u8] = b"null";

/// Byte used to pad words to [`WORD_FIELD_SIZE`].
pub const PAD_BYTE: u8 = b' ';

/// File offset of the record for `id`.
#[inline]
pub fn record_offset(id: NodeId) -> u64 {
    id.0 * RECORD_SIZE as u64
}

/// Offset of word slot `slot` within a record.
#[inline]
pub const fn word_offset(slot: usize) -> usize {
    OFFSET_WORDS + slot * WORD_FIELD_SIZE
}

/// Offset of count slot `slot` within a record.
#[inline]
pub const fn count_offset(slot: usize) -> usize {
    OFFSET_COUNTS + slot * INT_WIDTH
}

/// Offset of child slot `slot` within a record.
#[inline]
pub const fn child_offset(slot: usize) -> usize {
    OFFSET_CHILDREN + slot * LONG_WIDTH
}
