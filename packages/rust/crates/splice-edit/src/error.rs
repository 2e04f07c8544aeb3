//! Error types for patch operations.
//!
//! Library crates use `thiserror` for explicit error enums. None of these
//! are retried: every operation is a deterministic function of its input.

use std::path::Path;

use splice_ast::LocateError;
use splice_io::IoError;
use thiserror::Error;

/// Error types for edit batches and patch operations.
#[derive(Error, Debug)]
pub enum EditError {
    /// File-tree I/O error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// Locator error not yet attributed to a file.
    #[error("Locate error: {0}")]
    Locate(#[from] LocateError),

    /// The file to patch does not exist.
    #[error("Could not read file for path: {0}")]
    FileNotFound(String),

    /// A required anchor is missing from the file.
    #[error("Could not find {anchor} in {path}")]
    StructuralNotFound {
        /// File being patched.
        path: String,
        /// Missing construct.
        anchor: String,
    },

    /// The file could not be parsed.
    #[error("Malformed input in {path}: {source}")]
    MalformedInput {
        /// File being patched.
        path: String,
        /// Parser failure.
        #[source]
        source: LocateError,
    },

    /// An operation targets an offset outside the snapshot, or inside a
    /// multi-byte character.
    #[error("Offset {offset} out of range for document of {len} bytes")]
    OffsetOutOfRange {
        /// Requested offset.
        offset: usize,
        /// Snapshot length.
        len: usize,
    },

    /// `commit` was called on a batch that was already committed.
    #[error("Edit batch already committed")]
    DoubleCommit,

    /// The batch was mutated after commit.
    #[error("Edit batch is closed")]
    BatchClosed,

    /// Operations in one batch overlap: whole-file removal mixed with other
    /// edits, or a range removal that overlaps another edit.
    #[error("Conflicting operations in one edit batch")]
    ConflictingOperations,

    /// Workspace configuration could not be read or written.
    #[error("Invalid workspace config {path}: {reason}")]
    Config {
        /// Config file.
        path: String,
        /// Parser or serializer message.
        reason: String,
    },

    /// Patch plan could not be parsed.
    #[error("Invalid patch plan: {0}")]
    Plan(String),
}

impl EditError {
    /// Attribute a locator failure to `path`.
    #[must_use]
    pub fn in_file(self, path: &Path) -> Self {
        let path = path.display().to_string();
        match self {
            Self::Locate(LocateError::StructuralNotFound(anchor)) => {
                Self::StructuralNotFound { path, anchor }
            }
            Self::Locate(source) => Self::MalformedInput { path, source },
            other => other,
        }
    }
}
