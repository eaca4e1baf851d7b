//! Node cache management.
//!
//! The page cache sits between the tree engine and disk. It keeps a
//! bounded set of materialized nodes and evicts the least recently used.
//!
//! # Components
//! - [`PageCache`] - The node cache
//! - [`CacheStats`] - Performance statistics
//! - [`replacer`] - Eviction policy implementations

mod page_cache;
pub mod replacer;
mod stats;

pub use page_cache::PageCache;
pub use stats::{CacheStats, StatsSnapshot};
