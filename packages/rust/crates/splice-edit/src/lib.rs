#![allow(clippy::doc_markdown)]

//! splice-edit - Structural source patching for Angular-style workspaces
//!
//! Locates constructs with `splice-ast`, plans insertions into an
//! [`EditBatch`] against one immutable snapshot, and writes each file back
//! at most once through a `splice-io` [`FileTree`](splice_io::FileTree).
//!
//! # Features
//!
//! - **Edit batches**: offsets keyed to the original snapshot, LEFT/RIGHT bias, single commit
//! - **Idempotency guards**: re-running any operation on patched content is a no-op
//! - **Patch operations**: body markup, body classes, `@NgModule` symbols, environment vars, styles
//! - **Workspace transforms**: pure `(config, intent) -> config` functions over `angular.json`
//! - **Patch plans**: YAML rule lists with per-file error collection
//! - **Diff Preview**: unified diffs for every change, optional preview-only mode
//!
//! # Architecture
//!
//! ```text
//! splice-edit/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # EditError enum (thiserror)
//! ├── types.rs     # PatchOutcome, PatchResult, BodySide
//! ├── config.rs    # PatchConfig (serde_yaml)
//! ├── batch.rs     # EditBatch, Bias
//! ├── guards.rs    # Idempotency guards
//! ├── html.rs      # Markup planners
//! ├── module.rs    # Module source planners
//! ├── workspace.rs # angular.json transforms
//! ├── diff.rs      # Diff generation utilities
//! ├── patcher.rs   # Patcher over a FileTree
//! └── rules.rs     # PatchRule, PatchPlan, apply_plan
//! ```
//!
//! # Example
//!
//! ```rust
//! use splice_edit::{PatchOutcome, Patcher};
//! use splice_io::MemoryTree;
//!
//! let mut tree = MemoryTree::new();
//! tree.insert("src/index.html", r#"<body class="a"></body>"#);
//!
//! let mut patcher = Patcher::new(&mut tree);
//! let first = patcher.add_body_class("src/index.html", "b").unwrap();
//! let again = patcher.add_body_class("src/index.html", "b").unwrap();
//!
//! assert_eq!(first.outcome, PatchOutcome::Inserted);
//! assert_eq!(again.outcome, PatchOutcome::AlreadyPresent);
//! assert_eq!(tree.get("src/index.html"), Some(r#"<body class="a b"></body>"#));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod batch;
mod config;
mod diff;
mod error;
mod guards;
mod html;
mod module;
mod patcher;
mod rules;
mod types;
pub mod workspace;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use batch::{Bias, EditBatch, EditOperation};
pub use config::{DEFAULT_WORKSPACE_CONFIG, PatchConfig};
pub use error::EditError;
pub use patcher::Patcher;
pub use rules::{PatchPlan, PatchRule, PatchRunStats, SymbolSource};
pub use types::{BodySide, PatchOutcome, PatchResult};

// Planners for callers that stage their own batches
pub use html::{plan_add_body_class, plan_add_class, plan_append_to_body, plan_append_to_element};
pub use module::{
    ENVIRONMENT_VARIABLE, environment_file_path, plan_add_environment_var, plan_add_symbol,
};

// Guards
pub use guards::{
    PATH_DELIMITERS, contains_fragment, has_delimited_token, has_path_token, has_whitespace_token,
    json_array_contains, style_input,
};

// Re-export diff utility for external use
pub use diff::generate_unified_diff;
