//! LRU (Least-Recently-Used) replacement policy.

use std::collections::{BTreeMap, HashMap};

use crate::common::NodeId;

/// Tracks access recency and picks the least recently used node to evict.
///
/// Every access stamps the node with a fresh logical tick. The ordered
/// `by_tick` map yields the oldest stamp first; `last_tick` finds a node's
/// current stamp so a re-access can move it to the back.
pub struct LruReplacer {
    /// Next logical timestamp.
    tick: u64,

    /// Tick → node, oldest first.
    by_tick: BTreeMap<u64, NodeId>,

    /// Node → its latest tick.
    last_tick: HashMap<NodeId, u64>,
}

impl LruReplacer {
    /// Create a new LRU replacer.
    pub fn new() -> Self {
        Self {
            tick: 0,
            by_tick: BTreeMap::new(),
            last_tick: HashMap::new(),
        }
    }

    /// Record that a node was used, making it the most recent.
    pub fn record_access(&mut self, id: NodeId) {
        if let Some(old) = self.last_tick.insert(id, self.tick) {
            self.by_tick.remove(&old);
        }
        self.by_tick.insert(self.tick, id);
        self.tick += 1;
    }

    /// Select and forget the least recently used node.
    ///
    /// Returns `None` if nothing is tracked.
    pub fn evict(&mut self) -> Option<NodeId> {
        let (_, id) = self.by_tick.pop_first()?;
        self.last_tick.remove(&id);
        Some(id)
    }

    /// Stop tracking a node.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(tick) = self.last_tick.remove(&id) {
            self.by_tick.remove(&tick);
        }
    }

    /// Number of tracked nodes.
    pub fn size(&self) -> usize {
        self.last_tick.len()
    }
}

impl Default for LruReplacer {
    fn default() -> Self {
        Self::new()
    }
}
