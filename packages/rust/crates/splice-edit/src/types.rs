//! Core types for patch operations.

use serde::{Deserialize, Serialize};

/// What a patch operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    /// New content was inserted.
    Inserted,
    /// The effect was already present; nothing changed.
    AlreadyPresent,
    /// The optional target was absent; nothing changed.
    NotFound,
    /// The whole file content was removed.
    Cleared,
}

impl PatchOutcome {
    /// Whether the file content changed.
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Inserted | Self::Cleared)
    }
}

/// Result of a patch operation on one file.
#[derive(Debug, Clone, Serialize)]
pub struct PatchResult {
    /// Patched file.
    pub path: String,
    /// What happened.
    pub outcome: PatchOutcome,
    /// Content after the patch (equal to the original when unchanged).
    pub modified: String,
    /// Unified diff of the change; empty when unchanged.
    pub diff: String,
    /// Number of edit operations committed.
    pub edits: usize,
    /// Whether the content was written back to the tree.
    pub written: bool,
}

/// Where markup is appended inside an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySide {
    /// Right after the start tag.
    Left,
    /// Right before the end tag.
    #[default]
    Right,
}
