//! Patch configuration.
//!
//! Loaded from YAML; a missing or unreadable file falls back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use splice_ast::QuoteStyle;
use splice_io::{DecodePolicy, DiskTree};

use crate::error::EditError;

/// Default workspace configuration file.
pub const DEFAULT_WORKSPACE_CONFIG: &str = "angular.json";

/// Configuration for patch operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Maximum file size in bytes for disk-backed trees (default 1MB).
    pub max_file_size: u64,
    /// Refuse non-UTF-8 documents instead of replacing invalid bytes.
    pub strict_utf8: bool,
    /// Compute results and diffs without writing them back.
    pub preview_only: bool,
    /// Quote style for generated imports when the file has none to copy.
    pub quote: QuoteStyle,
    /// Workspace configuration file patched by `add_style`.
    pub workspace_config_path: PathBuf,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024, // 1MB
            strict_utf8: false,
            preview_only: false,
            quote: QuoteStyle::Single,
            workspace_config_path: PathBuf::from(DEFAULT_WORKSPACE_CONFIG),
        }
    }
}

impl PatchConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    /// `EditError::Config` when the YAML does not describe a `PatchConfig`.
    pub fn from_yaml_str(raw: &str) -> Result<Self, EditError> {
        serde_yaml::from_str(raw).map_err(|e| EditError::Config {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Disk tree rooted at `root` that honors `max_file_size` and
    /// `strict_utf8`.
    #[must_use]
    pub fn disk_tree(&self, root: impl Into<PathBuf>) -> DiskTree {
        let decode = if self.strict_utf8 {
            DecodePolicy::Strict
        } else {
            DecodePolicy::Lossy
        };
        DiskTree::new(root)
            .with_max_file_size(self.max_file_size)
            .with_decode_policy(decode)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or invalid.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to read patch config; using defaults"
                );
                return Self::default();
            }
        };
        match serde_yaml::from_str::<Self>(&raw) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to parse patch config yaml; using defaults"
                );
                Self::default()
            }
        }
    }
}
