//! Disk Manager - positioned I/O of node records.
//!
//! The [`DiskManager`] handles all direct file operations:
//! - Reading a node record and decoding it
//! - Writing a node's fields at their fixed offsets
//! - Tracking how many records the file holds

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::trace;

use crate::common::{Error, NodeId, Result};
use crate::storage::page::layout::{record_offset, RECORD_SIZE};
use crate::storage::page::{Node, NodePage};

/// Manages disk I/O for a single tree file.
///
/// # File Layout
/// Records are laid out back to back, indexed by node id:
/// ```text
/// ┌──────────┬──────────┬──────────┬─────────┬──────────┐
/// │ Node 0   │ Node 1   │ Node 2   │  ...    │ Node N   │
/// │ (root)   │ (1388 B) │ (1388 B) │         │ (1388 B) │
/// └──────────┴──────────┴──────────┴─────────┴──────────┘
/// Offset:  0      1388       2776     ...     N×1388
/// ```
///
/// # Thread Safety
/// `DiskManager` is **single-threaded**. The tree engine owns it and is the
/// only writer.
///
/// # Durability
/// Writes go to the OS without `fsync()`. Call [`DiskManager::sync`] to
/// force them to stable storage.
pub struct DiskManager {
    file: File,
    /// Number of record slots the file covers.
    node_count: u64,
}

impl DiskManager {
    /// Create a new tree file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        Ok(Self {
            file,
            node_count: 0,
        })
    }

    /// Open an existing tree file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        // A trailing partial record still reserves its id
        let file_size = file.metadata()?.len();
        let node_count = file_size.div_ceil(RECORD_SIZE as u64);

        Ok(Self { file, node_count })
    }

    /// Open an existing tree file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Read and decode the record for `id`.
    ///
    /// # Errors
    /// - `Error::NodeNotFound` if the record lies past the end of the file
    /// - `Error::Io` on a short or failed read
    /// - `Error::CorruptNode` if the record cannot be decoded or carries
    ///   another node's id
    pub fn read_node(&mut self, id: NodeId) -> Result<Node> {
        if id.0 >= self.node_count {
            return Err(Error::NodeNotFound(id.0));
        }

        self.file.seek(SeekFrom::Start(record_offset(id)))?;

        let mut page = NodePage::new();
        self.file.read_exact(page.as_mut_slice())?;
        trace!(node = id.0, "disk.read_node");

        let node = page.decode()?;
        if node.id != id {
            return Err(Error::corrupt(id.0, "record id does not match its offset"));
        }
        Ok(node)
    }

    /// Write every field of `node` at its offset within the node's record.
    ///
    /// Fields are written independently; count slots of empty entries are
    /// skipped. A failure part way through leaves the record partially
    /// updated.
    ///
    /// # Errors
    /// Returns `Error::Io` if any positioned write fails.
    pub fn write_node(&mut self, node: &Node) -> Result<()> {
        let base = record_offset(node.id);
        let page = NodePage::encode(node);

        for span in NodePage::write_spans(node) {
            self.file.seek(SeekFrom::Start(base + span.start as u64))?;
            self.file.write_all(&page.as_slice()[span])?;
        }
        trace!(node = node.id.0, entries = node.num_entries(), "disk.write_node");

        self.node_count = self.node_count.max(node.id.0 + 1);
        Ok(())
    }

    /// Flush written records to stable storage.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Get the number of record slots in the file.
    #[inline]
    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    /// Get the size the file occupies in whole records.
    #[inline]
    pub fn file_size(&self) -> u64 {
        self.node_count * RECORD_SIZE as u64
    }
}
