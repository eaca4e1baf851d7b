//! NodePage - the fixed-size binary record of one node.
//!
//! A [`NodePage`] is the byte image of a node as it sits on disk. Encoding
//! fills every field except the count slots of empty entries, which are
//! left untouched (they are never written to disk either).

use std::ops::Range;

use crate::common::config::{MAX_CHILDREN, MAX_ENTRIES, WORD_FIELD_SIZE};
use crate::common::{Error, NodeId, Result};

use super::layout::{
    child_offset, count_offset, word_offset, ABSENT_CHILD, EMPTY_SLOT, INT_WIDTH, LONG_WIDTH,
    OFFSET_ID, OFFSET_LEAF, OFFSET_NUM_ENTRIES, PAD_BYTE, RECORD_SIZE,
};
use super::node::{Entry, Node};

/// Raw bytes of one node record.
///
/// # Example
/// ```
/// use wordtree::storage::page::{Node, NodePage};
/// use wordtree::NodeId;
///
/// let mut node = Node::new_leaf(NodeId::new(3));
/// node.insert_entry(b"fox");
///
/// let page = NodePage::encode(&node);
/// assert_eq!(page.decode().unwrap(), node);
/// ```
pub struct NodePage {
    data: [u8; RECORD_SIZE],
}

impl NodePage {
    /// Create a zeroed record.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0u8; RECORD_SIZE],
        }
    }

    /// Get immutable slice of record data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable slice of record data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Encode `node` into a fresh record.
    pub fn encode(node: &Node) -> Self {
        debug_assert!(node.entries.len() <= MAX_ENTRIES);
        debug_assert!(node.children.len() <= MAX_CHILDREN);

        let mut page = Self::new();
        page.put_i64(OFFSET_ID, node.id.0 as i64);
        page.put_i32(OFFSET_NUM_ENTRIES, node.entries.len() as i32);
        page.put_i32(OFFSET_LEAF, i32::from(node.leaf));

        for slot in 0..MAX_ENTRIES {
            let word = node.entries.get(slot).map_or(EMPTY_SLOT, |e| &e.word[..]);
            page.put_word(slot, word);
        }

        for (slot, entry) in node.entries.iter().enumerate() {
            let at = count_offset(slot);
            page.data[at..at + INT_WIDTH].copy_from_slice(&entry.count.to_be_bytes());
        }

        for slot in 0..MAX_CHILDREN {
            let child = node.children.get(slot).map_or(ABSENT_CHILD, |c| c.0 as i64);
            page.put_i64(child_offset(slot), child);
        }

        page
    }

    /// Byte ranges of this record that must be written for `node`.
    ///
    /// Every field is covered except the count slots of empty entries.
    /// Adjacent fields are merged, so each range is one positioned write.
    pub fn write_spans(node: &Node) -> Vec<Range<usize>> {
        let mut fields = vec![
            OFFSET_ID..OFFSET_NUM_ENTRIES,
            OFFSET_NUM_ENTRIES..OFFSET_LEAF,
            OFFSET_LEAF..word_offset(0),
        ];
        fields.extend((0..MAX_ENTRIES).map(|s| word_offset(s)..word_offset(s) + WORD_FIELD_SIZE));
        fields.extend((0..node.entries.len()).map(|s| count_offset(s)..count_offset(s) + INT_WIDTH));
        fields.extend((0..MAX_CHILDREN).map(|s| child_offset(s)..child_offset(s) + LONG_WIDTH));

        let mut spans: Vec<Range<usize>> = Vec::new();
        for field in fields {
            match spans.last_mut() {
                Some(last) if last.end == field.start => last.end = field.end,
                _ => spans.push(field),
            }
        }
        spans
    }

    /// Decode the record back into a node.
    ///
    /// Children come back as bare ids; nothing below this node is read.
    ///
    /// # Errors
    /// Returns `Error::CorruptNode` if the id is negative, the entry count
    /// is out of range, or an occupied slot holds the empty-slot token.
    pub fn decode(&self) -> Result<Node> {
        let raw_id = self.get_i64(OFFSET_ID);
        if raw_id < 0 {
            return Err(Error::corrupt(raw_id as u64, "negative node id"));
        }
        let id = raw_id as u64;

        let num_entries = self.get_i32(OFFSET_NUM_ENTRIES);
        if num_entries < 0 || num_entries as usize > MAX_ENTRIES {
            return Err(Error::corrupt(id, "entry count out of range"));
        }
        let num_entries = num_entries as usize;
        let leaf = self.get_i32(OFFSET_LEAF) == 1;

        let mut entries = Vec::with_capacity(MAX_ENTRIES);
        for slot in 0..num_entries {
            let word = self
                .get_word(slot)
                .ok_or_else(|| Error::corrupt(id, "empty slot inside occupied range"))?;
            let at = count_offset(slot);
            let mut count = [0u8; INT_WIDTH];
            count.copy_from_slice(&self.data[at..at + INT_WIDTH]);
            entries.push(Entry {
                word: word.to_vec(),
                count: u32::from_be_bytes(count),
            });
        }

        let children = if leaf {
            Vec::new()
        } else {
            (0..=num_entries)
                .map(|slot| self.get_i64(child_offset(slot)))
                .take_while(|&child| child >= 0)
                .map(|child| NodeId::new(child as u64))
                .collect()
        };

        Ok(Node {
            id: NodeId::new(id),
            leaf,
            entries,
            children,
        })
    }

    /// Word stored in `slot`, or `None` for an empty slot.
    ///
    /// The word ends at the first padding, whitespace or NUL byte.
    pub fn get_word(&self, slot: usize) -> Option<&[u8]> {
        let at = word_offset(slot);
        let field = &self.data[at..at + WORD_FIELD_SIZE];
        let end = field
            .iter()
            .position(|b| b.is_ascii_whitespace() || *b == 0)
            .unwrap_or(WORD_FIELD_SIZE);
        let word = &field[..end];

        if word.is_empty() || word.eq_ignore_ascii_case(EMPTY_SLOT) {
            None
        } else {
            Some(word)
        }
    }

    fn put_word(&mut self, slot: usize, word: &[u8]) {
        let at = word_offset(slot);
        let field = &mut self.data[at..at + WORD_FIELD_SIZE];
        let len = word.len().min(WORD_FIELD_SIZE);
        field[..len].copy_from_slice(&word[..len]);
        field[len..].fill(PAD_BYTE);
    }

    fn put_i64(&mut self, at: usize, value: i64) {
        self.data[at..at + LONG_WIDTH].copy_from_slice(&value.to_be_bytes());
    }

    fn put_i32(&mut self, at: usize, value: i32) {
        self.data[at..at + INT_WIDTH].copy_from_slice(&value.to_be_bytes());
    }

    fn get_i64(&self, at: usize) -> i64 {
        let mut buf = [0u8; LONG_WIDTH];
        buf.copy_from_slice(&self.data[at..at + LONG_WIDTH]);
        i64::from_be_bytes(buf)
    }

    fn get_i32(&self, at: usize) -> i32 {
        let mut buf = [0u8; INT_WIDTH];
        buf.copy_from_slice(&self.data[at..at + INT_WIDTH]);
        i32::from_be_bytes(buf)
    }
}

impl Default for NodePage {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::page::layout::{OFFSET_CHILDREN, OFFSET_COUNTS, OFFSET_WORDS};
    use proptest::prelude::*;

    fn internal_node() -> Node {
        let mut node = Node::new_internal(NodeId::new(7));
        node.insert_entry(b"lynx");
        node.insert_entry(b"Cat");
        node.entries[0].count = 42;
        node.children = vec![NodeId::new(1), NodeId::new(2), NodeId::new(9)];
        node
    }

    #[test]
    fn test_record_size() {
        assert_eq!(std::mem::size_of::<NodePage>(), RECORD_SIZE);
    }

    #[test]
    fn test_roundtrip_empty_leaf() {
        let node = Node::new_leaf(NodeId::ROOT);
        let decoded = NodePage::encode(&node).decode().unwrap();
        assert_eq!(decoded, node);
        assert!(decoded.leaf);
    }

    #[test]
    fn test_roundtrip_internal() {
        let node = internal_node();
        let decoded = NodePage::encode(&node).decode().unwrap();
        assert_eq!(decoded, node);
        assert_eq!(decoded.entries[0].word, b"Cat");
        assert_eq!(decoded.entries[0].count, 42);
    }

    #[test]
    fn test_byte_layout() {
        let node = internal_node();
        let page = NodePage::encode(&node);
        let data = page.as_slice();

        // id = 7, big-endian
        assert_eq!(&data[0..8], &[0, 0, 0, 0, 0, 0, 0, 7]);
        // num_entries = 2, leaf = 0
        assert_eq!(&data[8..12], &[0, 0, 0, 2]);
        assert_eq!(&data[12..16], &[0, 0, 0, 0]);

        // first word slot: "Cat" + 29 spaces
        let slot0 = &data[OFFSET_WORDS..OFFSET_WORDS + 32];
        assert_eq!(&slot0[..3], b"Cat");
        assert!(slot0[3..].iter().all(|&b| b == b' '));

        // third word slot is empty: "null" + 28 spaces
        let slot2 = &data[word_offset(2)..word_offset(2) + 32];
        assert_eq!(&slot2[..4], b"null");
        assert!(slot2[4..].iter().all(|&b| b == b' '));

        // count of "lynx" is 1
        assert_eq!(&data[OFFSET_COUNTS + 4..OFFSET_COUNTS + 8], &[0, 0, 0, 1]);

        // child 2 = 9, child 3 absent (-2)
        assert_eq!(&data[child_offset(2)..child_offset(3)], &9i64.to_be_bytes());
        assert_eq!(&data[child_offset(3)..child_offset(4)], &(-2i64).to_be_bytes());
    }

    #[test]
    fn test_write_spans_skip_empty_counts() {
        let node = internal_node();
        let spans = NodePage::write_spans(&node);

        // header + words, the two occupied counts, then all children
        assert_eq!(
            spans,
            vec![
                0..OFFSET_COUNTS,
                OFFSET_COUNTS..OFFSET_COUNTS + 8,
                OFFSET_CHILDREN..RECORD_SIZE,
            ]
        );
    }

    #[test]
    fn test_write_spans_full_node_is_contiguous() {
        let mut node = Node::new_leaf(NodeId::new(1));
        for i in 0..MAX_ENTRIES {
            node.insert_entry(format!("w{:02}", i).as_bytes());
        }
        assert_eq!(NodePage::write_spans(&node), vec![0..RECORD_SIZE]);
    }

    #[test]
    fn test_decode_null_token_any_case() {
        let mut page = NodePage::encode(&Node::new_leaf(NodeId::ROOT));
        let at = word_offset(0);
        page.as_mut_slice()[at..at + 4].copy_from_slice(b"NULL");
        assert_eq!(page.get_word(0), None);

        page.as_mut_slice()[at..at + 4].copy_from_slice(b"tree");
        assert_eq!(page.get_word(0), Some(&b"tree"[..]));
    }

    #[test]
    fn test_decode_zeroed_slot_is_empty() {
        let page = NodePage::new();
        assert_eq!(page.get_word(0), None);
    }

    #[test]
    fn test_decode_bad_entry_count() {
        let mut page = NodePage::encode(&Node::new_leaf(NodeId::new(5)));
        page.as_mut_slice()[OFFSET_NUM_ENTRIES..OFFSET_LEAF].copy_from_slice(&32i32.to_be_bytes());

        match page.decode() {
            Err(Error::CorruptNode { id: 5, .. }) => {}
            other => panic!("Expected CorruptNode, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_slot_in_range() {
        let mut page = NodePage::encode(&Node::new_leaf(NodeId::new(5)));
        page.as_mut_slice()[OFFSET_NUM_ENTRIES..OFFSET_LEAF].copy_from_slice(&1i32.to_be_bytes());
        assert!(page.decode().is_err());
    }

    fn arb_node() -> impl Strategy<Value = Node> {
        let words = prop::collection::btree_set(
            "[a-z]{1,31}".prop_filter("reserved token", |w| w != "null"),
            0..=MAX_ENTRIES,
        );
        (words, any::<bool>(), 0u64..1_000_000, any::<u32>())
            .prop_map(|(words, leaf, id, salt)| {
                let entries: Vec<Entry> = words
                    .into_iter()
                    .enumerate()
                    .map(|(i, w)| Entry {
                        word: w.into_bytes(),
                        count: salt.wrapping_add(i as u32).max(1),
                    })
                    .collect();
                let children = if leaf {
                    Vec::new()
                } else {
                    (0..=entries.len() as u64).map(|c| NodeId::new(id + 1 + c)).collect()
                };
                Node {
                    id: NodeId::new(id),
                    leaf,
                    entries,
                    children,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_encode_decode_identity(node in arb_node()) {
            let decoded = NodePage::encode(&node).decode().unwrap();
            prop_assert_eq!(decoded, node);
        }
    }
}
