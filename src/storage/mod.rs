//! Storage layer - disk I/O and the node record format.
//!
//! This module handles persistent storage:
//! - [`DiskManager`] - Positioned reads and writes of node records
//! - [`page`] - Record layout and node types

mod disk_manager;
pub mod page;

pub use disk_manager::DiskManager;
