//! Common types and utilities shared across wordtree.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Structural constants
//! - Error types
//! - Node identifiers

pub mod config;
pub mod error;
mod node_id;

pub use error::{Error, Result};
pub use node_id::NodeId;
