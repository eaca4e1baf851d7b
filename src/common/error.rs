//! Error types for wordtree.

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in wordtree.
///
/// I/O failures are fatal to the operation in progress and are never
/// retried. A failed insert may leave a partially completed split on disk.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested node lies past the end of the file.
    #[error("Node {0} not found")]
    NodeNotFound(u64),

    /// A record could not be materialized into a node.
    ///
    /// Only raised where decoding or descent would otherwise index out of
    /// bounds. Records that decode cleanly are trusted as-is.
    #[error("Node {id} is corrupt: {reason}")]
    CorruptNode { id: u64, reason: &'static str },

    /// The word cannot be represented in a word slot.
    #[error("Invalid word {word:?}: {reason}")]
    InvalidWord { word: String, reason: &'static str },
}

impl Error {
    pub(crate) fn corrupt(id: u64, reason: &'static str) -> Self {
        Error::CorruptNode { id, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NodeNotFound(42);
        assert_eq!(format!("{}", err), "Node 42 not found");

        let err = Error::corrupt(3, "entry count out of range");
        assert_eq!(
            format!("{}", err),
            "Node 3 is corrupt: entry count out of range"
        );

        let err = Error::InvalidWord {
            word: "null".to_string(),
            reason: "reserved for empty slots",
        };
        assert_eq!(
            format!("{}", err),
            "Invalid word \"null\": reserved for empty slots"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err = Error::from(io_err);
        assert!(err.source().is_some());
        assert!(Error::NodeNotFound(1).source().is_none());
    }
}
