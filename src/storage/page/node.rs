//! In-memory form of a node record.
//!
//! A [`Node`] refers to its children by [`NodeId`] only. Materializing a
//! child always goes through the page cache or the disk manager.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::common::config::{MAX_ENTRIES, MAX_WORD_LEN};
use crate::common::{Error, NodeId, Result};

use super::layout::EMPTY_SLOT;

/// A word and the number of times it has been inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The word as first inserted (case preserved).
    pub word: Vec<u8>,
    /// Cumulative frequency, at least 1.
    pub count: u32,
}

impl Entry {
    /// Create an entry seen once.
    pub fn new(word: impl Into<Vec<u8>>) -> Self {
        Self {
            word: word.into(),
            count: 1,
        }
    }

    /// The word as text, replacing invalid UTF-8.
    pub fn word_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.word)
    }

    /// Record one more occurrence.
    #[inline]
    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Check if this entry holds `word`, ignoring ASCII case.
    #[inline]
    pub fn matches(&self, word: &[u8]) -> bool {
        self.word.eq_ignore_ascii_case(word)
    }
}

/// Order two words the way they are ordered inside a node.
///
/// Comparison is byte-wise after ASCII lowercasing, so two spellings that
/// differ only in case are equal and sort to the same position.
pub fn compare_words(a: &[u8], b: &[u8]) -> Ordering {
    a.iter()
        .map(u8::to_ascii_lowercase)
        .cmp(b.iter().map(u8::to_ascii_lowercase))
}

/// Check that `word` survives a round trip through a word slot.
///
/// # Errors
/// Returns `Error::InvalidWord` if the word is empty, longer than
/// [`MAX_WORD_LEN`], contains whitespace or NUL (both terminate a word on
/// decode), or spells the empty-slot token.
pub fn check_word(word: &[u8]) -> Result<()> {
    let reason = if word.is_empty() {
        Some("empty")
    } else if word.len() > MAX_WORD_LEN {
        Some("longer than 31 bytes")
    } else if word.iter().any(|b| b.is_ascii_whitespace() || *b == 0) {
        Some("contains whitespace or NUL")
    } else if word.eq_ignore_ascii_case(EMPTY_SLOT) {
        Some("reserved for empty slots")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidWord {
            word: String::from_utf8_lossy(word).into_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

/// One node of the tree.
///
/// `entries` is left-packed and strictly ascending under
/// [`compare_words`]. An internal node has exactly `entries.len() + 1`
/// children; a leaf has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub leaf: bool,
    pub entries: Vec<Entry>,
    pub children: Vec<NodeId>,
}

impl Node {
    /// Create an empty leaf.
    pub fn new_leaf(id: NodeId) -> Self {
        Self {
            id,
            leaf: true,
            entries: Vec::with_capacity(MAX_ENTRIES),
            children: Vec::new(),
        }
    }

    /// Create an empty internal node.
    pub fn new_internal(id: NodeId) -> Self {
        Self {
            leaf: false,
            ..Self::new_leaf(id)
        }
    }

    /// Number of occupied entry slots.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// A full node must be split before anything is inserted below it.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_ENTRIES
    }

    /// Index of the first entry not less than `word`.
    ///
    /// For an internal node this is also the index of the child whose
    /// subtree would hold `word` when no entry matches.
    pub fn lower_bound(&self, word: &[u8]) -> usize {
        self.entries
            .iter()
            .position(|e| compare_words(&e.word, word) != Ordering::Less)
            .unwrap_or(self.entries.len())
    }

    /// Slot of the entry equal to `word`, if any.
    ///
    /// Scans every occupied slot rather than trusting the order.
    pub fn find(&self, word: &[u8]) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(word))
    }

    /// Child reference at `index`.
    ///
    /// # Errors
    /// Returns `Error::CorruptNode` if the slot holds no child.
    pub fn child(&self, index: usize) -> Result<NodeId> {
        self.children
            .get(index)
            .copied()
            .ok_or_else(|| Error::corrupt(self.id.0, "missing child reference"))
    }

    /// Insert a fresh entry for `word` at its ordered position.
    ///
    /// Larger entries shift one slot to the right.
    pub fn insert_entry(&mut self, word: &[u8]) {
        debug_assert!(!self.is_full(), "insert into full node");
        let idx = self.lower_bound(word);
        self.entries.insert(idx, Entry::new(word));
    }
}
