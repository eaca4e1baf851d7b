//! B-tree index of word frequencies.
//!
//! - [`BTree`] - Search and top-down pre-splitting insert over
//!   id-addressed nodes
//! - In-order listing and structural checks for whole-tree inspection

mod inspect;
mod tree;

pub use tree::BTree;
