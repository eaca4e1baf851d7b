//! Page Cache - bounded mapping from node id to materialized node.
//!
//! The [`PageCache`] provides:
//! - Lookup of recently used nodes without touching disk
//! - Least-recently-used eviction past a fixed capacity
//! - Hit, miss and eviction counters
//!
//! The cache is write-through: callers persist a node through the
//! [`DiskManager`](crate::storage::DiskManager) before handing it to
//! [`PageCache::put`], so eviction never needs a write-back.

use std::collections::HashMap;
use std::sync::atomic::Ordering;

use tracing::trace;

use crate::buffer::replacer::LruReplacer;
use crate::buffer::CacheStats;
use crate::common::NodeId;
use crate::storage::page::Node;

/// Holds up to `capacity` nodes, evicting the least recently used.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │                    PageCache                     │
/// │  ┌─────────────────────┐   ┌──────────────────┐  │
/// │  │ nodes               │   │ replacer         │  │
/// │  │ NodeId → Node       │◀──│ LruReplacer      │  │
/// │  └─────────────────────┘   └──────────────────┘  │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// Both [`get`](PageCache::get) hits and [`put`](PageCache::put) count as a
/// use for recency purposes.
pub struct PageCache {
    /// Materialized nodes by id.
    nodes: HashMap<NodeId, Node>,

    /// Recency order for eviction.
    replacer: LruReplacer,

    /// Performance statistics.
    stats: CacheStats,

    /// Maximum number of cached nodes (immutable after construction).
    capacity: usize,
}

impl PageCache {
    /// Create an empty cache.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");

        Self {
            nodes: HashMap::with_capacity(capacity + 1),
            replacer: LruReplacer::new(),
            stats: CacheStats::new(),
            capacity,
        }
    }

    /// Look up a node, refreshing its recency on a hit.
    ///
    /// On a miss the caller reads the node from disk and [`put`](Self::put)s it.
    pub fn get(&mut self, id: NodeId) -> Option<&Node> {
        match self.nodes.get(&id) {
            Some(node) => {
                self.replacer.record_access(id);
                self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                Some(node)
            }
            None => {
                self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or replace a node under its id and mark it most recent.
    ///
    /// Evicts least-recently-used nodes until the cache is back within
    /// capacity.
    pub fn put(&mut self, node: Node) {
        let id = node.id;
        self.nodes.insert(id, node);
        self.replacer.record_access(id);

        while self.nodes.len() > self.capacity {
            match self.replacer.evict() {
                Some(victim) => {
                    self.nodes.remove(&victim);
                    self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                    trace!(node = victim.0, "cache.evict");
                }
                None => break,
            }
        }
    }

    /// Drop a node from the cache, if present.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.replacer.remove(id);
        self.nodes.remove(&id)
    }

    /// Check whether a node is cached, without touching recency or stats.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get the maximum number of cached nodes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of cached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the cache holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
