//! Tree Engine - search and top-down pre-splitting insert.
//!
//! Nodes reference each other by [`NodeId`] only. Every node the engine
//! touches is materialized through the page cache, falling back to the
//! disk manager on a miss, and every mutation is written to disk before the
//! node is handed back to the cache.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::atomic::Ordering as AtomicOrdering;

use tracing::debug;

use crate::buffer::{PageCache, StatsSnapshot};
use crate::common::config::{CACHE_CAPACITY, MAX_CHILDREN, ORDER};
use crate::common::{Error, NodeId, Result};
use crate::storage::page::{check_word, compare_words, Entry, Node};
use crate::storage::DiskManager;

/// A disk-resident B-tree of word frequencies.
///
/// # Structure
/// ```text
///                  ┌───────────────┐
///                  │ Node 0 (root) │
///                  └───┬───────┬───┘
///             children │       │ (ids, not pointers)
///              ┌───────┘       └───────┐
///        ┌─────▼─────┐           ┌─────▼─────┐
///        │  Node 1   │           │  Node 2   │
///        └───────────┘           └───────────┘
/// ```
/// The root always lives at id 0. Growing the tree moves the old root's
/// content to a fresh id and writes a new root in its place.
///
/// # Usage
/// ```no_run
/// use wordtree::BTree;
///
/// let mut tree = BTree::open_or_create("words.db")?;
/// tree.insert("the")?;
/// tree.insert("The")?;
/// assert_eq!(tree.frequency("THE")?, Some(2));
/// # Ok::<(), wordtree::Error>(())
/// ```
pub struct BTree {
    /// Backing file.
    store: DiskManager,

    /// Recently used nodes.
    cache: PageCache,

    /// Next id to hand out. Never decreases.
    next_id: u64,
}

impl BTree {
    /// Open a tree over `store` with the default cache capacity.
    ///
    /// An empty store gets a fresh, empty root written at id 0.
    ///
    /// # Errors
    /// Returns an I/O error if the initial root cannot be written.
    pub fn new(store: DiskManager) -> Result<Self> {
        Self::with_cache_capacity(store, CACHE_CAPACITY)
    }

    /// Open a tree over `store`, caching at most `capacity` nodes.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn with_cache_capacity(store: DiskManager, capacity: usize) -> Result<Self> {
        let next_id = store.node_count();
        let mut tree = Self {
            store,
            cache: PageCache::new(capacity),
            next_id,
        };

        if tree.next_id == 0 {
            let root = Node::new_leaf(tree.allocate_id());
            tree.persist(&root)?;
        }

        debug!(nodes = tree.next_id, capacity, "btree.open");
        Ok(tree)
    }

    /// Open the tree stored at `path`, creating the file if needed.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(DiskManager::open_or_create(path)?)
    }

    // ========================================================================
    // Public API: Insert and search
    // ========================================================================

    /// Insert `word`, or bump its count if it is already present.
    ///
    /// Matching ignores ASCII case; the first spelling seen is kept.
    ///
    /// # Errors
    /// - `Error::InvalidWord` if the word cannot be stored (see
    ///   [`check_word`])
    /// - `Error::Io` if a read or write fails. The file may then hold a
    ///   partially completed split.
    pub fn insert(&mut self, word: impl AsRef<[u8]>) -> Result<()> {
        let word = word.as_ref();
        check_word(word)?;

        let root = self.fetch(NodeId::ROOT)?;
        if !root.is_full() {
            return self.insert_non_full(root, word);
        }

        // Relocate the full root and hang it under a new, empty root
        let mut old_root = root;
        old_root.id = self.allocate_id();
        let mut new_root = Node::new_internal(NodeId::ROOT);
        new_root.children.push(old_root.id);
        debug!(relocated_to = old_root.id.0, "btree.root_split");

        self.split_child(&mut new_root, 0, &mut old_root)?;
        self.insert_non_full(new_root, word)
    }

    /// Find the entry for `word`.
    ///
    /// Returns `None` if the word was never inserted. Words that cannot be
    /// stored are reported absent.
    ///
    /// # Errors
    /// Returns `Error::Io` if a node cannot be read.
    pub fn search(&mut self, word: impl AsRef<[u8]>) -> Result<Option<Entry>> {
        let word = word.as_ref();
        if check_word(word).is_err() {
            return Ok(None);
        }

        let mut node = self.fetch(NodeId::ROOT)?;
        loop {
            // First entry >= word; past the end means the last child
            let idx = node.lower_bound(word);
            if let Some(entry) = node.entries.get(idx).filter(|e| e.matches(word)) {
                return Ok(Some(entry.clone()));
            }
            if node.leaf {
                return Ok(None);
            }
            node = self.fetch(node.child(idx)?)?;
        }
    }

    /// Number of times `word` was inserted, or `None` if never.
    pub fn frequency(&mut self, word: impl AsRef<[u8]>) -> Result<Option<u32>> {
        Ok(self.search(word)?.map(|entry| entry.count))
    }

    // ========================================================================
    // Public API: Inspection
    // ========================================================================

    /// Materialize the node with `id` (cache first, then disk).
    pub fn read_node(&mut self, id: NodeId) -> Result<Node> {
        self.fetch(id)
    }

    /// Materialize the root.
    pub fn root(&mut self) -> Result<Node> {
        self.fetch(NodeId::ROOT)
    }

    /// Number of node ids handed out so far.
    pub fn node_count(&self) -> u64 {
        self.next_id
    }

    /// Number of nodes currently held by the cache.
    pub fn cached_nodes(&self) -> usize {
        self.cache.len()
    }

    /// Maximum number of nodes the cache holds.
    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Check whether a node is cached, without touching recency.
    pub fn is_cached(&self, id: NodeId) -> bool {
        self.cache.contains(id)
    }

    /// Snapshot of cache and disk counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.cache.stats().snapshot()
    }

    /// Force written nodes to stable storage.
    pub fn sync(&mut self) -> Result<()> {
        self.store.sync()
    }

    // ========================================================================
    // Internal: Insert path
    // ========================================================================

    /// Insert into the subtree rooted at `node`, which is not full.
    fn insert_non_full(&mut self, mut node: Node, word: &[u8]) -> Result<()> {
        if let Some(slot) = node.find(word) {
            node.entries[slot].increment();
            return self.persist(&node);
        }

        if node.leaf {
            node.insert_entry(word);
            return self.persist(&node);
        }

        let idx = node.lower_bound(word);
        let mut child = self.fetch(node.child(idx)?)?;

        if child.is_full() {
            let sibling = self.split_child(&mut node, idx, &mut child)?;

            // The promoted median now sits at `idx` in this node
            match compare_words(word, &node.entries[idx].word) {
                Ordering::Equal => {
                    node.entries[idx].increment();
                    return self.persist(&node);
                }
                Ordering::Greater => child = sibling,
                Ordering::Less => {}
            }
        }

        self.insert_non_full(child, word)
    }

    /// Split the full `child`, found at `index` among `parent`'s children.
    ///
    /// The upper `T - 1` entries (and upper `T` children) move to a new
    /// right sibling, and the median moves up into `parent`. The parent,
    /// the child and the sibling are written in that order and cached.
    /// Returns the new sibling.
    fn split_child(&mut self, parent: &mut Node, index: usize, child: &mut Node) -> Result<Node> {
        debug_assert!(child.is_full(), "split of non-full node");

        if !child.leaf && child.children.len() != MAX_CHILDREN {
            return Err(Error::corrupt(child.id.0, "full node without all children"));
        }

        let sibling_id = self.allocate_id();
        let mut sibling = if child.leaf {
            Node::new_leaf(sibling_id)
        } else {
            Node::new_internal(sibling_id)
        };

        sibling.entries = child.entries.split_off(ORDER);
        let median = child
            .entries
            .pop()
            .ok_or_else(|| Error::corrupt(child.id.0, "split of empty node"))?;
        if !child.leaf {
            sibling.children = child.children.split_off(ORDER);
        }

        debug!(
            parent = parent.id.0,
            child = child.id.0,
            sibling = sibling.id.0,
            median = %median.word_str(),
            "btree.split"
        );

        parent.entries.insert(index, median);
        parent.children.insert(index + 1, sibling.id);

        self.persist(parent)?;
        self.persist(child)?;
        self.persist(&sibling)?;

        Ok(sibling)
    }

    // ========================================================================
    // Internal: Node access
    // ========================================================================

    /// Materialize a node: cache hit, or disk read followed by caching.
    pub(super) fn fetch(&mut self, id: NodeId) -> Result<Node> {
        if let Some(node) = self.cache.get(id) {
            return Ok(node.clone());
        }

        let node = self.store.read_node(id)?;
        self.cache
            .stats()
            .nodes_read
            .fetch_add(1, AtomicOrdering::Relaxed);
        self.cache.put(node.clone());
        Ok(node)
    }

    /// Write a node to disk, then refresh it in the cache.
    fn persist(&mut self, node: &Node) -> Result<()> {
        self.store.write_node(node)?;
        self.cache
            .stats()
            .nodes_written
            .fetch_add(1, AtomicOrdering::Relaxed);
        self.cache.put(node.clone());
        Ok(())
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }
}
