//! Node record types and layout.
//!
//! This module contains:
//! - [`layout`] - Field sizes, offsets and the id-to-offset mapping
//! - [`NodePage`] - The raw fixed-size record and its codec
//! - [`Node`] / [`Entry`] - The materialized form of a record

pub mod layout;
mod node;
#[allow(clippy::module_inception)]
mod page;

pub use node::{check_word, compare_words, Entry, Node};
pub use page::NodePage;
