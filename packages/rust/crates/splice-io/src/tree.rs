//! File-tree seam used by the patch engine.
//!
//! A tree hands out whole-document snapshots and accepts whole-document
//! replacements. Positional edits are computed by the caller against a
//! snapshot and materialized before `overwrite` is called.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::decode::{DecodePolicy, decode_document};
use crate::error::IoError;

/// Default size limit for documents read from disk (1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Storage behind a patch pass.
pub trait FileTree {
    /// Current content of `path`, or `None` when the file is absent.
    ///
    /// # Errors
    /// Backend failures (unreadable, binary, oversized) are reported as
    /// `IoError`; absence is not an error.
    fn read(&self, path: &Path) -> Result<Option<String>, IoError>;

    /// Replace the whole content of `path`, creating it when absent.
    ///
    /// # Errors
    /// Returns `IoError` when the backend cannot store the content.
    fn overwrite(&mut self, path: &Path, content: &str) -> Result<(), IoError>;

    /// Whether `path` currently holds a readable document.
    fn exists(&self, path: &Path) -> bool {
        matches!(self.read(path), Ok(Some(_)))
    }
}

/// Normalize a tree path: a leading `/` means the tree root, `.` segments are
/// dropped and `..` segments are resolved lexically.
///
/// # Errors
/// Returns `IoError::OutsideRoot` when `..` climbs above the root.
pub fn normalize_tree_path(path: &Path) -> Result<PathBuf, IoError> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(IoError::OutsideRoot(path.display().to_string()));
                }
            }
            Component::Normal(part) => parts.push(part),
        }
    }
    Ok(parts.iter().collect())
}

/// In-memory tree keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a file, returning the previous content if any.
    ///
    /// Paths that escape the root are stored verbatim.
    pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Option<String> {
        let path = path.as_ref();
        let key = normalize_tree_path(path).unwrap_or_else(|_| path.to_path_buf());
        self.files.insert(key, content.into())
    }

    /// Borrow the content of a staged file.
    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        let key = normalize_tree_path(path.as_ref()).ok()?;
        self.files.get(&key).map(String::as_str)
    }

    /// Staged paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Number of staged files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileTree for MemoryTree {
    fn read(&self, path: &Path) -> Result<Option<String>, IoError> {
        let key = normalize_tree_path(path)?;
        Ok(self.files.get(&key).cloned())
    }

    fn overwrite(&mut self, path: &Path, content: &str) -> Result<(), IoError> {
        let key = normalize_tree_path(path)?;
        self.files.insert(key, content.to_string());
        Ok(())
    }
}

/// Tree backed by a directory on disk.
///
/// Reads refuse documents over the size limit and documents that look
/// binary; non-UTF-8 content is handled by the tree's [`DecodePolicy`].
#[derive(Debug, Clone)]
pub struct DiskTree {
    root: PathBuf,
    max_file_size: u64,
    decode: DecodePolicy,
}

impl DiskTree {
    /// Create a tree rooted at `root` with the default size limit and lossy
    /// decoding.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            decode: DecodePolicy::default(),
        }
    }

    /// Override the size limit applied to reads.
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Override how non-UTF-8 documents are decoded.
    #[must_use]
    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    /// Root directory of the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<(PathBuf, PathBuf), IoError> {
        let relative = normalize_tree_path(path)?;
        let full = self.root.join(&relative);
        Ok((relative, full))
    }
}

impl FileTree for DiskTree {
    fn read(&self, path: &Path) -> Result<Option<String>, IoError> {
        let (relative, full) = self.resolve(path)?;
        let metadata = match std::fs::metadata(&full) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IoError::read(&relative, e)),
        };

        if metadata.len() > self.max_file_size {
            return Err(IoError::TooLarge {
                path: relative.display().to_string(),
                size: metadata.len(),
                limit: self.max_file_size,
            });
        }

        let bytes = std::fs::read(&full).map_err(|e| IoError::read(&relative, e))?;
        decode_document(&relative, bytes, self.decode).map(Some)
    }

    fn overwrite(&mut self, path: &Path, content: &str) -> Result<(), IoError> {
        let (relative, full) = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| IoError::write(&relative, e))?;
        }
        std::fs::write(&full, content).map_err(|e| IoError::write(&relative, e))?;
        tracing::debug!(path = %relative.display(), bytes = content.len(), "file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tree_path() {
        assert_eq!(
            normalize_tree_path(Path::new("/src/./app/../index.html")).unwrap(),
            PathBuf::from("src/index.html")
        );
        assert!(matches!(
            normalize_tree_path(Path::new("../outside.ts")),
            Err(IoError::OutsideRoot(_))
        ));
    }

    #[test]
    fn test_memory_tree_roundtrip() {
        let mut tree = MemoryTree::new();
        assert!(tree.read(Path::new("a.ts")).unwrap().is_none());
        tree.overwrite(Path::new("/a.ts"), "export {};").unwrap();
        assert_eq!(tree.get("a.ts"), Some("export {};"));
        assert!(tree.exists(Path::new("./a.ts")));
        assert_eq!(tree.len(), 1);
    }
}
