//! Edit batches.
//!
//! A batch records insertions and range removals against one immutable
//! snapshot and materializes them once. Offsets always refer to the
//! original snapshot: operations are spliced from the highest offset down,
//! so an edit never moves an offset that has not been applied yet.

use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Tie-break for insertions planned at the same offset.
///
/// At one offset every `Left` text precedes every `Right` text; equal bias
/// keeps append order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    /// Before other insertions at the same offset.
    Left,
    /// After other insertions at the same offset.
    #[default]
    Right,
}

/// A planned edit: `removed` bytes at `offset` are replaced by `text`.
///
/// Insertions remove nothing; removals insert nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOperation {
    /// Byte offset into the original snapshot.
    pub offset: usize,
    /// Ordering among insertions at `offset`.
    pub bias: Bias,
    /// Text to insert.
    pub text: String,
    /// Number of snapshot bytes removed from `offset`.
    pub removed: usize,
}

impl EditOperation {
    fn end(&self) -> usize {
        self.offset + self.removed
    }

    // An insertion may touch either end of a removal but not its inside;
    // two removals may only share an endpoint.
    fn conflicts_with(&self, other: &Self) -> bool {
        match (self.removed, other.removed) {
            (0, 0) => false,
            (0, _) => other.offset < self.offset && self.offset < other.end(),
            (_, 0) => self.offset < other.offset && other.offset < self.end(),
            _ => self.offset < other.end() && other.offset < self.end(),
        }
    }
}

/// Append-only list of edits against one snapshot, committed exactly once.
#[derive(Debug, Clone)]
pub struct EditBatch {
    original: String,
    operations: Vec<EditOperation>,
    remove_all: bool,
    committed: bool,
}

impl EditBatch {
    /// Open a batch against `content`.
    pub fn open(content: impl Into<String>) -> Self {
        Self {
            original: content.into(),
            operations: Vec::new(),
            remove_all: false,
            committed: false,
        }
    }

    /// Record an insertion of `text` at `offset`.
    ///
    /// # Errors
    /// `BatchClosed` after commit, `ConflictingOperations` when the batch
    /// already removes the whole file or a range around `offset`.
    pub fn insert(
        &mut self,
        offset: usize,
        text: impl Into<String>,
        bias: Bias,
    ) -> Result<&mut Self, EditError> {
        self.record(EditOperation {
            offset,
            bias,
            text: text.into(),
            removed: 0,
        })
    }

    /// Record the removal of the snapshot bytes `start..end`.
    ///
    /// Insertions at `start` or `end` stay outside the removed range.
    ///
    /// # Errors
    /// `BatchClosed` after commit, `OffsetOutOfRange` when `end < start`,
    /// `ConflictingOperations` when the range overlaps another removal or
    /// encloses an insertion.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<&mut Self, EditError> {
        if end < start {
            return Err(EditError::OffsetOutOfRange {
                offset: end,
                len: self.original.len(),
            });
        }
        self.record(EditOperation {
            offset: start,
            bias: Bias::Right,
            text: String::new(),
            removed: end - start,
        })
    }

    fn record(&mut self, operation: EditOperation) -> Result<&mut Self, EditError> {
        self.ensure_open()?;
        if self.remove_all || self.operations.iter().any(|op| op.conflicts_with(&operation)) {
            return Err(EditError::ConflictingOperations);
        }
        self.operations.push(operation);
        Ok(self)
    }

    /// Record a `Bias::Left` insertion.
    ///
    /// # Errors
    /// See [`EditBatch::insert`].
    pub fn insert_left(&mut self, offset: usize, text: impl Into<String>) -> Result<&mut Self, EditError> {
        self.insert(offset, text, Bias::Left)
    }

    /// Record a `Bias::Right` insertion.
    ///
    /// # Errors
    /// See [`EditBatch::insert`].
    pub fn insert_right(&mut self, offset: usize, text: impl Into<String>) -> Result<&mut Self, EditError> {
        self.insert(offset, text, Bias::Right)
    }

    /// Replace the whole document with empty content.
    ///
    /// # Errors
    /// `BatchClosed` after commit, `ConflictingOperations` when insertions
    /// were already recorded.
    pub fn remove_all(&mut self) -> Result<&mut Self, EditError> {
        self.ensure_open()?;
        if !self.operations.is_empty() {
            return Err(EditError::ConflictingOperations);
        }
        self.remove_all = true;
        Ok(self)
    }

    /// Recorded operations in append order.
    #[must_use]
    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    /// The snapshot the batch was opened against.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Number of recorded operations (a whole-file removal counts as one).
    #[must_use]
    pub fn len(&self) -> usize {
        if self.remove_all {
            1
        } else {
            self.operations.len()
        }
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `commit` has succeeded.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Materialize the batch.
    ///
    /// A failed commit leaves the batch open and unchanged.
    ///
    /// # Errors
    /// `DoubleCommit` on a second call, `OffsetOutOfRange` when an offset or
    /// the end of a removal is past the end of the snapshot or not on a
    /// character boundary.
    pub fn commit(&mut self) -> Result<String, EditError> {
        if self.committed {
            return Err(EditError::DoubleCommit);
        }

        if self.remove_all {
            self.committed = true;
            return Ok(String::new());
        }

        let len = self.original.len();
        let bad = self
            .operations
            .iter()
            .flat_map(|op| [op.offset, op.end()])
            .find(|&offset| offset > len || !self.original.is_char_boundary(offset));
        if let Some(offset) = bad {
            return Err(EditError::OffsetOutOfRange { offset, len });
        }

        // A removal sorts after the insertions at its offset so that it is
        // spliced before them and never swallows their text.
        let mut order: Vec<usize> = (0..self.operations.len()).collect();
        order.sort_by_key(|&i| {
            let op = &self.operations[i];
            (op.offset, op.removed > 0, op.bias, i)
        });

        let extra: usize = self.operations.iter().map(|op| op.text.len()).sum();
        let mut content = String::with_capacity(len + extra);
        content.push_str(&self.original);

        // Highest offset first; within an offset the last in final order
        // goes in first so that earlier ones end up in front of it.
        for &i in order.iter().rev() {
            let op = &self.operations[i];
            content.replace_range(op.offset..op.end(), &op.text);
        }

        self.committed = true;
        Ok(content)
    }

    fn ensure_open(&self) -> Result<(), EditError> {
        if self.committed {
            Err(EditError::BatchClosed)
        } else {
            Ok(())
        }
    }
}
