//! Eviction policy implementations (replacers).
//!
//! Currently implements:
//! - [`LruReplacer`] - Least-recently-used, used by the page cache

mod lru;

pub use lru::LruReplacer;
