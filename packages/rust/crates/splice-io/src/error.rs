//! Error types for file-tree operations.
//!
//! Every variant names the tree path it concerns. An absent file is not an
//! error at this layer: `FileTree::read` reports it as `Ok(None)`.

use std::path::Path;

use thiserror::Error;

/// Error types for file-tree I/O.
#[derive(Error, Debug)]
pub enum IoError {
    /// Document exceeds the tree's size limit.
    #[error("{path} is too large: {size} bytes (limit: {limit})")]
    TooLarge {
        /// Tree path.
        path: String,
        /// Size on disk.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// Document contains NUL bytes and cannot be patched as text.
    #[error("{path} is a binary file")]
    Binary {
        /// Tree path.
        path: String,
    },

    /// Document is not UTF-8 and the tree decodes strictly.
    #[error("{path} is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 {
        /// Tree path.
        path: String,
        /// Length of the valid prefix.
        valid_up_to: usize,
    },

    /// Path escapes the root of the tree.
    #[error("Path outside of tree root: {0}")]
    OutsideRoot(String),

    /// The backing store failed to read a document.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Tree path.
        path: String,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The backing store failed to write a document.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Tree path.
        path: String,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl IoError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.display().to_string(),
            source,
        }
    }
}
