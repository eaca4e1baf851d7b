//! wordtree - a disk-resident B-tree of word frequencies.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           wordtree                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Tree Engine (index/btree/)                     │   │
//! │  │     insert(word) · search(word) · split · descent        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Page Cache (buffer/)                           │   │
//! │  │      NodeId → Node, LRU eviction past capacity           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Storage Layer (storage/)                       │   │
//! │  │     DiskManager + NodePage record format                 │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, constants)
//! - [`storage`] - Disk I/O and the node record format
//! - [`buffer`] - Node cache and eviction policy
//! - [`index`] - The B-tree engine
//!
//! # Quick Start
//! ```no_run
//! use wordtree::BTree;
//!
//! let mut tree = BTree::open_or_create("document.db").unwrap();
//! for word in "the quick brown fox jumps over the lazy dog".split_whitespace() {
//!     tree.insert(word).unwrap();
//! }
//! assert_eq!(tree.frequency("the").unwrap(), Some(2));
//! assert_eq!(tree.frequency("cat").unwrap(), None);
//! ```

pub mod buffer;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{CACHE_CAPACITY, ORDER};
pub use common::{Error, NodeId, Result};

pub use buffer::{CacheStats, PageCache, StatsSnapshot};
pub use index::BTree;
pub use storage::page::{Entry, Node, NodePage};
pub use storage::DiskManager;
