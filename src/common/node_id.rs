//! Node identifier type.

use std::fmt;

/// Identifies a node of the tree, and through it the node's record on disk.
///
/// Ids are handed out by a strictly increasing counter and never reused.
/// Record `N` lives at file offset `N × RECORD_SIZE`.
///
/// # Example
/// ```
/// use wordtree::NodeId;
///
/// let id = NodeId::new(7);
/// assert_eq!(id.0, 7);
/// assert!(!id.is_root());
/// assert!(NodeId::ROOT.is_root());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The root always lives at id 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Create a new NodeId.
    #[inline]
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    /// Check if this is the root id.
    #[inline]
    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_new() {
        let id = NodeId::new(42);
        assert_eq!(id.0, 42);
        assert!(!id.is_root());
    }

    #[test]
    fn test_node_id_root() {
        assert!(NodeId::ROOT.is_root());
        assert_eq!(NodeId::ROOT, NodeId::new(0));
    }

    #[test]
    fn test_node_id_ordering() {
        assert!(NodeId::new(1) < NodeId::new(2));
        assert!(NodeId::new(5) > NodeId::new(3));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(format!("{}", NodeId::new(42)), "Node(42)");
        assert_eq!(format!("{}", NodeId::ROOT), "Node(0)");
    }
}
