#![allow(clippy::doc_markdown)]

//! splice-io - File-tree access for the splice patch engine
//!
//! The patch engine never touches the filesystem directly. It reads one
//! document and writes it back at most once through the [`FileTree`] seam.
//!
//! # Features
//!
//! - **FileTree seam**: `read` / `overwrite` / `exists` over any backing store
//! - **MemoryTree**: ordered in-memory tree for staging and tests
//! - **DiskTree**: rooted directory tree with size limits, binary sniffing
//!   and a lossy or strict UTF-8 policy
//!
//! # Architecture
//!
//! ```text
//! splice-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── decode.rs   # Binary sniffing, DecodePolicy
//! └── tree.rs     # FileTree trait, MemoryTree, DiskTree
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use splice_io::{FileTree, MemoryTree};
//!
//! let mut tree = MemoryTree::new();
//! tree.insert("src/index.html", "<body></body>");
//! assert!(tree.exists(Path::new("/src/index.html")));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod decode;
mod error;
mod tree;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use decode::{BINARY_SNIFF_LEN, DecodePolicy, decode_document, looks_binary};
pub use error::IoError;
pub use tree::{DEFAULT_MAX_FILE_SIZE, DiskTree, FileTree, MemoryTree, normalize_tree_path};
