//! Whole-tree traversals: in-order listing and structural checks.

use std::cmp::Ordering;

use crate::common::config::ORDER;
use crate::common::{Error, NodeId, Result};
use crate::storage::page::{compare_words, Entry};

use super::BTree;

/// Key range a subtree must stay within (exclusive bounds).
#[derive(Clone, Copy)]
struct Bounds<'a> {
    lower: Option<&'a [u8]>,
    upper: Option<&'a [u8]>,
}

impl BTree {
    /// Every entry in ascending word order.
    ///
    /// Visits the whole tree; nodes pass through the cache like any other
    /// access.
    pub fn entries(&mut self) -> Result<Vec<Entry>> {
        let mut out = Vec::new();
        self.collect_entries(NodeId::ROOT, &mut out)?;
        Ok(out)
    }

    fn collect_entries(&mut self, id: NodeId, out: &mut Vec<Entry>) -> Result<()> {
        let node = self.fetch(id)?;
        if node.leaf {
            out.extend(node.entries);
            return Ok(());
        }

        for (i, entry) in node.entries.iter().enumerate() {
            self.collect_entries(node.child(i)?, out)?;
            out.push(entry.clone());
        }
        self.collect_entries(node.child(node.num_entries())?, out)
    }

    /// Walk the tree and verify its structure.
    ///
    /// Checks that every record sits at its own id, entries are strictly
    /// ascending and inside the range implied by the parent, counts are
    /// positive, internal nodes have one more child than entries, non-root
    /// nodes hold at least `T - 1` entries, and all leaves share one depth.
    ///
    /// # Errors
    /// Returns `Error::CorruptNode` naming the first offending node, or an
    /// I/O error if a node cannot be read.
    pub fn check_invariants(&mut self) -> Result<()> {
        let mut leaf_depth = None;
        let unbounded = Bounds {
            lower: None,
            upper: None,
        };
        self.check_subtree(NodeId::ROOT, unbounded, 0, &mut leaf_depth)
    }

    fn check_subtree(
        &mut self,
        id: NodeId,
        bounds: Bounds<'_>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> Result<()> {
        let node = self.fetch(id)?;
        let fail = |reason| Err(Error::corrupt(id.0, reason));

        if node.id != id {
            return fail("record id does not match its position");
        }
        if !id.is_root() && node.num_entries() < ORDER - 1 {
            return fail("non-root node below minimum occupancy");
        }
        if node.entries.iter().any(|e| e.count == 0) {
            return fail("entry with zero count");
        }
        let ascending = node
            .entries
            .windows(2)
            .all(|w| compare_words(&w[0].word, &w[1].word) == Ordering::Less);
        if !ascending {
            return fail("entries not strictly ascending");
        }
        if let (Some(lower), Some(first)) = (bounds.lower, node.entries.first()) {
            if compare_words(&first.word, lower) != Ordering::Greater {
                return fail("entry below parent separator");
            }
        }
        if let (Some(upper), Some(last)) = (bounds.upper, node.entries.last()) {
            if compare_words(&last.word, upper) != Ordering::Less {
                return fail("entry above parent separator");
            }
        }

        if node.leaf {
            return match *leaf_depth {
                Some(expected) if expected != depth => fail("leaves at different depths"),
                _ => {
                    *leaf_depth = Some(depth);
                    Ok(())
                }
            };
        }

        if node.entries.is_empty() {
            return fail("internal node without entries");
        }
        if node.children.len() != node.num_entries() + 1 {
            return fail("child count does not match entry count");
        }

        for (i, &child) in node.children.iter().enumerate() {
            let child_bounds = Bounds {
                lower: if i == 0 {
                    bounds.lower
                } else {
                    Some(&node.entries[i - 1].word)
                },
                upper: node
                    .entries
                    .get(i)
                    .map(|e| e.word.as_slice())
                    .or(bounds.upper),
            };
            self.check_subtree(child, child_bounds, depth + 1, leaf_depth)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::page::Node;
    use crate::storage::DiskManager;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_entries_in_order() {
        let dir = tempdir().unwrap();
        let dm = DiskManager::create(dir.path().join("test.db")).unwrap();
        let mut tree = BTree::new(dm).unwrap();

        let words: Vec<String> = (0..250).map(|i| format!("k{:03}", (i * 37) % 250)).collect();
        for w in &words {
            tree.insert(w).unwrap();
        }

        let listed: Vec<String> = tree
            .entries()
            .unwrap()
            .iter()
            .map(|e| e.word_str().into_owned())
            .collect();
        let mut expected = words.clone();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_empty_tree_is_valid() {
        let dir = tempdir().unwrap();
        let dm = DiskManager::create(dir.path().join("test.db")).unwrap();
        let mut tree = BTree::new(dm).unwrap();

        tree.check_invariants().unwrap();
        assert!(tree.entries().unwrap().is_empty());
    }

    #[test]
    fn test_detects_unsorted_leaf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut dm = DiskManager::create(&path).unwrap();
            let mut root = Node::new_leaf(NodeId::ROOT);
            root.entries.push(Entry::new(&b"pear"[..]));
            root.entries.push(Entry::new(&b"apple"[..]));
            dm.write_node(&root).unwrap();
        }

        let mut tree = BTree::new(DiskManager::open(&path).unwrap()).unwrap();
        match tree.check_invariants() {
            Err(Error::CorruptNode { id: 0, .. }) => {}
            other => panic!("Expected CorruptNode, got {:?}", other),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_counts_and_order_survive_any_insert_sequence(
            words in prop::collection::vec("[a-fA-F]{1,4}", 1..400)
        ) {
            let dir = tempdir().unwrap();
            let dm = DiskManager::create(dir.path().join("prop.db")).unwrap();
            let mut tree = BTree::with_cache_capacity(dm, 8).unwrap();

            let mut expected: HashMap<String, u32> = HashMap::new();
            for w in &words {
                tree.insert(w).unwrap();
                *expected.entry(w.to_ascii_lowercase()).or_default() += 1;
            }

            tree.check_invariants().unwrap();
            prop_assert!(tree.cached_nodes() <= 8);
            prop_assert_eq!(tree.entries().unwrap().len(), expected.len());
            for (w, count) in &expected {
                prop_assert_eq!(tree.frequency(w.to_ascii_uppercase()).unwrap(), Some(*count));
            }
        }
    }
}
